//! Budget repository
//!
//! The whole budget collection lives in the `budgets` slot. At most one
//! budget exists per (category, month).

use std::sync::Arc;

use crate::error::ExpenseError;
use crate::models::{Budget, BudgetId, Category, Month};

use super::backend::KeyValueStore;
use super::slot::{read_collection, write_collection};

/// Slot key holding the budget collection
pub const BUDGETS_KEY: &str = "budgets";

/// Repository for budget persistence
pub struct BudgetRepository {
    store: Arc<dyn KeyValueStore>,
}

impl BudgetRepository {
    /// Create a repository over a backend
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// All budgets in stored order
    pub fn list(&self) -> Result<Vec<Budget>, ExpenseError> {
        read_collection(self.store.as_ref(), BUDGETS_KEY)
    }

    fn save(&self, budgets: &[Budget]) -> Result<(), ExpenseError> {
        write_collection(self.store.as_ref(), BUDGETS_KEY, budgets)
    }

    /// Get a budget by ID
    pub fn get(&self, id: BudgetId) -> Result<Option<Budget>, ExpenseError> {
        Ok(self.list()?.into_iter().find(|b| b.id == id))
    }

    /// Get the budget for a category in a month
    pub fn find(&self, category: Category, month: Month) -> Result<Option<Budget>, ExpenseError> {
        Ok(self
            .list()?
            .into_iter()
            .find(|b| b.covers(category, month)))
    }

    /// Add a new budget
    pub fn add(&self, budget: Budget) -> Result<(), ExpenseError> {
        budget
            .validate()
            .map_err(|e| ExpenseError::Validation(e.to_string()))?;

        let mut budgets = self.list()?;
        if budgets.iter().any(|b| b.id == budget.id) {
            return Err(ExpenseError::Duplicate {
                entity_type: "Budget",
                identifier: budget.id.to_string(),
            });
        }
        ensure_unique(&budgets, &budget)?;

        budgets.push(budget);
        self.save(&budgets)
    }

    /// Replace the budget with the same ID
    ///
    /// Returns `false` without writing if no such budget exists.
    pub fn update(&self, budget: Budget) -> Result<bool, ExpenseError> {
        budget
            .validate()
            .map_err(|e| ExpenseError::Validation(e.to_string()))?;

        let mut budgets = self.list()?;
        if !budgets.iter().any(|b| b.id == budget.id) {
            return Ok(false);
        }
        ensure_unique(&budgets, &budget)?;

        for slot in budgets.iter_mut().filter(|b| b.id == budget.id) {
            *slot = budget.clone();
        }
        self.save(&budgets)?;
        Ok(true)
    }

    /// Remove a budget, `false` if it was not there
    pub fn remove(&self, id: BudgetId) -> Result<bool, ExpenseError> {
        let mut budgets = self.list()?;
        let before = budgets.len();
        budgets.retain(|b| b.id != id);

        if budgets.len() == before {
            return Ok(false);
        }

        self.save(&budgets)?;
        Ok(true)
    }

    /// Budgets for a month
    pub fn for_month(&self, month: Month) -> Result<Vec<Budget>, ExpenseError> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|b| b.month == month)
            .collect())
    }
}

/// Fail if another budget already covers the same category and month
fn ensure_unique(existing: &[Budget], candidate: &Budget) -> Result<(), ExpenseError> {
    let clash = existing
        .iter()
        .any(|b| b.id != candidate.id && b.covers(candidate.category, candidate.month));

    if clash {
        return Err(ExpenseError::Duplicate {
            entity_type: "Budget",
            identifier: format!("{} {}", candidate.category, candidate.month),
        });
    }

    Ok(())
}
