//! Service layer
//!
//! Aggregation and budget evaluation on top of the storage layer. Both
//! services keep an in-memory mirror that is reloaded after every mutation.
//! Audit entries are best-effort: a failed audit write is logged and the
//! mutation still stands.

pub mod budget;
pub mod expenses;

pub use budget::BudgetEvaluator;
pub use expenses::{DataState, ExpenseAggregator, ExpenseSnapshot};
