//! Budget model
//!
//! A spending limit for one category in one calendar month, plus the
//! per-budget status row computed against actual spending.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::category::Category;
use super::ids::BudgetId;
use super::money::Money;
use super::month::Month;

/// A monthly spending limit for a category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    /// Unique identifier, fixed at creation
    pub id: BudgetId,

    pub category: Category,

    /// Spending limit (strictly positive)
    pub limit: Money,

    /// The month this limit applies to
    pub month: Month,
}

impl Budget {
    /// Create a new budget with a fresh id
    pub fn new(category: Category, limit: Money, month: Month) -> Self {
        Self {
            id: BudgetId::new(),
            category,
            limit,
            month,
        }
    }

    /// Check if this budget covers the given category and month
    pub fn covers(&self, category: Category, month: Month) -> bool {
        self.category == category && self.month == month
    }

    /// Validate the budget
    pub fn validate(&self) -> Result<(), BudgetValidationError> {
        if !self.limit.is_positive() {
            return Err(BudgetValidationError::NonPositiveLimit(self.limit));
        }

        if !self.limit.is_storable() {
            return Err(BudgetValidationError::LimitTooLarge(self.limit));
        }

        Ok(())
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} limit: {}", self.month, self.category, self.limit)
    }
}

/// Validation errors for budgets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetValidationError {
    NonPositiveLimit(Money),
    LimitTooLarge(Money),
}

impl fmt::Display for BudgetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveLimit(limit) => {
                write!(f, "Budget limit must be greater than zero: {}", limit)
            }
            Self::LimitTooLarge(limit) => write!(
                f,
                "Budget limit {} exceeds the maximum of {}",
                limit,
                Money::MAX_AMOUNT
            ),
        }
    }
}

impl std::error::Error for BudgetValidationError {}

/// A budget compared against actual spending for its month
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetStatus {
    pub budget_id: BudgetId,
    pub category: Category,
    pub month: Month,
    pub limit: Money,
    pub spent: Money,
    /// `limit - spent`; negative once overspent
    pub remaining: Money,
    /// `spent / limit`, clamped to `[0, 1]`
    pub progress: f64,
}

impl BudgetStatus {
    /// Build a status row from a budget and the amount spent against it
    pub fn new(budget: &Budget, spent: Money) -> Self {
        Self {
            budget_id: budget.id,
            category: budget.category,
            month: budget.month,
            limit: budget.limit,
            spent,
            remaining: budget.limit - spent,
            progress: progress_ratio(spent, budget.limit),
        }
    }

    pub fn is_over_budget(&self) -> bool {
        self.remaining.is_negative()
    }
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Limit: {} | Spent: {} | Remaining: {}",
            self.limit, self.spent, self.remaining
        )
    }
}

/// Fraction of `limit` consumed by `spent`, clamped to `[0, 1]`
///
/// A zero limit counts as fully consumed as soon as anything is spent.
pub fn progress_ratio(spent: Money, limit: Money) -> f64 {
    match spent.ratio_of(limit) {
        Some(ratio) => ratio.clamp(0.0, 1.0),
        None if spent.is_positive() => 1.0,
        None => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jan() -> Month {
        Month::new(2025, 1).unwrap()
    }

    #[test]
    fn test_validation() {
        assert!(Budget::new(Category::Food, Money::from_cents(50000), jan())
            .validate()
            .is_ok());
        assert_eq!(
            Budget::new(Category::Food, Money::zero(), jan()).validate(),
            Err(BudgetValidationError::NonPositiveLimit(Money::zero()))
        );
        assert!(Budget::new(Category::Food, Money::from_cents(-100), jan())
            .validate()
            .is_err());

        let huge = Money::MAX_AMOUNT + Money::from_cents(1);
        assert_eq!(
            Budget::new(Category::Food, huge, jan()).validate(),
            Err(BudgetValidationError::LimitTooLarge(huge))
        );
    }

    #[test]
    fn test_covers() {
        let budget = Budget::new(Category::Food, Money::from_cents(50000), jan());
        assert!(budget.covers(Category::Food, jan()));
        assert!(!budget.covers(Category::Transport, jan()));
        assert!(!budget.covers(Category::Food, jan().next()));
    }

    #[test]
    fn test_status_under_budget() {
        let budget = Budget::new(Category::Food, Money::from_cents(50000), jan());
        let status = BudgetStatus::new(&budget, Money::from_cents(15000));
        assert_eq!(status.remaining, Money::from_cents(35000));
        assert!((status.progress - 0.3).abs() < 1e-9);
        assert!(!status.is_over_budget());
    }

    #[test]
    fn test_status_over_budget() {
        let budget = Budget::new(Category::Food, Money::from_cents(50000), jan());
        let status = BudgetStatus::new(&budget, Money::from_cents(60000));
        assert_eq!(status.remaining, Money::from_cents(-10000));
        assert_eq!(status.progress, 1.0);
        assert!(status.is_over_budget());
    }

    #[test]
    fn test_progress_ratio_with_zero_limit() {
        assert_eq!(progress_ratio(Money::from_cents(1), Money::zero()), 1.0);
        assert_eq!(progress_ratio(Money::zero(), Money::zero()), 0.0);
    }

    #[test]
    fn test_wire_format() {
        let budget = Budget::new(Category::Food, Money::from_cents(50000), jan());
        let value = serde_json::to_value(&budget).unwrap();
        assert_eq!(value["category"], "Food");
        assert_eq!(value["limit"], serde_json::json!(500.0));
        assert_eq!(value["month"], "2025-01");

        let back: Budget = serde_json::from_value(value).unwrap();
        assert_eq!(back, budget);
    }
}
