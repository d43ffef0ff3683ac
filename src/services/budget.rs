//! Budget evaluation service
//!
//! Compares per-month category budgets against what the expense aggregator
//! reports as spent. A category without a budget has nothing remaining and
//! no progress; use [`BudgetEvaluator::find`] to tell "no budget" apart from
//! "budget exactly used up".

use tracing::{debug, warn};

use crate::audit::EntityType;
use crate::error::ExpenseResult;
use crate::models::{progress_ratio, Budget, BudgetId, BudgetStatus, Category, Money, Month};
use crate::services::expenses::{DataState, ExpenseAggregator};
use crate::storage::Storage;
use crate::time::Clock;

/// Service for budget management
pub struct BudgetEvaluator<'a> {
    storage: &'a Storage,
    clock: &'a dyn Clock,
    budgets: Vec<Budget>,
    data_state: DataState,
}

impl<'a> BudgetEvaluator<'a> {
    /// Create an evaluator and load the stored budgets
    ///
    /// A corrupt store leaves the evaluator with no budgets and
    /// [`DataState::Unavailable`].
    pub fn new(storage: &'a Storage, clock: &'a dyn Clock) -> Self {
        let mut evaluator = Self {
            storage,
            clock,
            budgets: Vec::new(),
            data_state: DataState::Ready,
        };
        // Failure is recorded in data_state
        let _ = evaluator.load();
        evaluator
    }

    /// Re-read the store
    pub fn load(&mut self) -> ExpenseResult<()> {
        match self.storage.budgets.list() {
            Ok(budgets) => {
                debug!(count = budgets.len(), "budgets loaded");
                self.budgets = budgets;
                self.data_state = DataState::Ready;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "budgets unavailable");
                self.budgets.clear();
                self.data_state = DataState::Unavailable {
                    reason: e.to_string(),
                };
                Err(e)
            }
        }
    }

    /// Create a budget; fails if the category already has one that month
    pub fn add(&mut self, budget: Budget) -> ExpenseResult<()> {
        self.storage.budgets.add(budget.clone())?;
        if let Err(e) = self.storage.log_create(
            EntityType::Budget,
            budget.id.to_string(),
            Some(format!("{} {}", budget.category, budget.month)),
            &budget,
        ) {
            warn!(error = %e, "audit entry not written");
        }
        self.load()
    }

    /// Replace the budget with the same id, `false` if there is none
    pub fn update(&mut self, budget: Budget) -> ExpenseResult<bool> {
        let Some(before) = self.storage.budgets.get(budget.id)? else {
            return Ok(false);
        };
        if !self.storage.budgets.update(budget.clone())? {
            return Ok(false);
        }

        if let Err(e) = self.storage.log_update(
            EntityType::Budget,
            budget.id.to_string(),
            Some(format!("{} {}", budget.category, budget.month)),
            &before,
            &budget,
        ) {
            warn!(error = %e, "audit entry not written");
        }
        self.load()?;
        Ok(true)
    }

    /// Delete a budget, `false` if it was not there
    pub fn delete(&mut self, id: BudgetId) -> ExpenseResult<bool> {
        let Some(existing) = self.storage.budgets.get(id)? else {
            return Ok(false);
        };
        if !self.storage.budgets.remove(id)? {
            return Ok(false);
        }

        if let Err(e) = self.storage.log_delete(
            EntityType::Budget,
            id.to_string(),
            Some(format!("{} {}", existing.category, existing.month)),
            &existing,
        ) {
            warn!(error = %e, "audit entry not written");
        }
        self.load()?;
        Ok(true)
    }

    pub fn budgets(&self) -> &[Budget] {
        &self.budgets
    }

    /// Whether the last load succeeded
    pub fn data_state(&self) -> &DataState {
        &self.data_state
    }

    /// The clock's month
    pub fn current_month(&self) -> Month {
        self.clock.current_month()
    }

    pub fn find(&self, category: Category, month: Month) -> Option<&Budget> {
        self.budgets.iter().find(|b| b.covers(category, month))
    }

    /// Find a budget from user input (full id, display id or prefix)
    pub fn find_by_id(&self, input: &str) -> Vec<&Budget> {
        self.budgets.iter().filter(|b| b.id.matches(input)).collect()
    }

    /// Amount spent in the category that month
    pub fn spent(&self, spending: &ExpenseAggregator, category: Category, month: Month) -> Money {
        spending.total_for_category(category, month)
    }

    /// `limit - spent`, or zero when no budget exists
    pub fn remaining(
        &self,
        spending: &ExpenseAggregator,
        category: Category,
        month: Month,
    ) -> Money {
        match self.find(category, month) {
            Some(budget) => budget.limit - self.spent(spending, category, month),
            None => Money::zero(),
        }
    }

    /// Fraction of the limit used, clamped to `[0, 1]`; zero when no budget exists
    pub fn progress(&self, spending: &ExpenseAggregator, category: Category, month: Month) -> f64 {
        match self.find(category, month) {
            Some(budget) => progress_ratio(self.spent(spending, category, month), budget.limit),
            None => 0.0,
        }
    }

    pub fn is_over_budget(
        &self,
        spending: &ExpenseAggregator,
        category: Category,
        month: Month,
    ) -> bool {
        self.remaining(spending, category, month).is_negative()
    }

    /// Budgets for the clock's month
    pub fn current_month_budgets(&self) -> Vec<&Budget> {
        self.budgets_for_month(self.current_month())
    }

    /// Budgets for a month, ordered by category
    pub fn budgets_for_month(&self, month: Month) -> Vec<&Budget> {
        let mut budgets: Vec<_> = self.budgets.iter().filter(|b| b.month == month).collect();
        budgets.sort_by_key(|b| b.category);
        budgets
    }

    /// Status row for one category, `None` when it has no budget
    pub fn status(
        &self,
        spending: &ExpenseAggregator,
        category: Category,
        month: Month,
    ) -> Option<BudgetStatus> {
        self.find(category, month)
            .map(|budget| BudgetStatus::new(budget, self.spent(spending, category, month)))
    }

    /// One status row per budget of the month, ordered by category
    pub fn overview(&self, spending: &ExpenseAggregator, month: Month) -> Vec<BudgetStatus> {
        self.budgets_for_month(month)
            .into_iter()
            .map(|budget| BudgetStatus::new(budget, self.spent(spending, budget.category, month)))
            .collect()
    }
}
