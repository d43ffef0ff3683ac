//! Storage layer
//!
//! Each collection is a single JSON blob in a key-value backend: files
//! under the data directory in normal use, an in-memory map in tests.

pub mod backend;
pub mod budgets;
pub mod expenses;
pub mod file_io;
pub mod slot;

pub use backend::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
pub use budgets::{BudgetRepository, BUDGETS_KEY};
pub use expenses::{ExpenseRepository, EXPENSES_KEY};

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::audit::{generate_diff, AuditEntry, AuditLogger, EntityType};
use crate::config::{ExpensePaths, Settings};
use crate::error::ExpenseError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    pub expenses: ExpenseRepository,
    pub budgets: BudgetRepository,
    audit: Option<AuditLogger>,
}

impl Storage {
    /// Open file-backed storage under the configured directories
    pub fn open(paths: &ExpensePaths, settings: &Settings) -> Result<Self, ExpenseError> {
        paths.ensure_directories()?;
        debug!(dir = %paths.data_dir().display(), "opening storage");

        let backend: Arc<dyn KeyValueStore> = Arc::new(FileKeyValueStore::new(paths.data_dir()));
        let audit = settings
            .audit_enabled
            .then(|| AuditLogger::new(paths.audit_log()));

        Ok(Self::with_backend(backend, audit))
    }

    /// Throwaway storage with no audit log
    pub fn in_memory() -> Self {
        Self::with_backend(Arc::new(MemoryKeyValueStore::new()), None)
    }

    /// Storage over an arbitrary backend
    pub fn with_backend(backend: Arc<dyn KeyValueStore>, audit: Option<AuditLogger>) -> Self {
        Self {
            expenses: ExpenseRepository::new(backend.clone()),
            budgets: BudgetRepository::new(backend),
            audit,
        }
    }

    /// The audit logger, if auditing is enabled
    pub fn audit(&self) -> Option<&AuditLogger> {
        self.audit.as_ref()
    }

    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), ExpenseError> {
        match &self.audit {
            Some(logger) => logger.log(&AuditEntry::create(
                entity_type,
                entity_id,
                entity_name,
                entity,
            )),
            None => Ok(()),
        }
    }

    /// Log an update; the diff is computed from the serialized states
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> Result<(), ExpenseError> {
        let Some(logger) = &self.audit else {
            return Ok(());
        };

        let diff = generate_diff(&serde_json::to_value(before)?, &serde_json::to_value(after)?);
        logger.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
            diff,
        ))
    }

    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), ExpenseError> {
        match &self.audit {
            Some(logger) => logger.log(&AuditEntry::delete(
                entity_type,
                entity_id,
                entity_name,
                entity,
            )),
            None => Ok(()),
        }
    }
}
