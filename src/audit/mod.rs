//! Audit logging
//!
//! Records every create, update and delete of an expense or budget with
//! before/after values in an append-only log.
//!
//! - `AuditEntry`: one operation on one entity, with optional before/after
//!   JSON.
//! - `AuditLogger`: appends entries to the log as line-delimited JSON.
//! - `generate_diff`: summarizes top-level field changes between two states.
//!
//! ```rust,ignore
//! use expense_tracker::audit::{AuditEntry, AuditLogger, EntityType};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! let entry = AuditEntry::create(
//!     EntityType::Expense,
//!     expense.id.to_string(),
//!     Some(expense.to_string()),
//!     &expense,
//! );
//! logger.log(&entry)?;
//! ```

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
