//! Core data models for the expense tracker
//!
//! Expenses, budgets, the fixed category set, and the value types they are
//! built from (money, calendar months, ids).

pub mod budget;
pub mod category;
pub mod expense;
pub mod ids;
pub mod money;
pub mod month;

pub use budget::{progress_ratio, Budget, BudgetStatus, BudgetValidationError};
pub use category::{Category, UnknownCategory};
pub use expense::{parse_tags, Expense, ExpenseValidationError};
pub use ids::{BudgetId, ExpenseId};
pub use money::{Money, MoneyParseError};
pub use month::{Month, MonthParseError};
