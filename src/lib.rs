//! Expense Tracker - personal spending with monthly category budgets
//!
//! Expenses are recorded against a fixed set of categories and browsed one
//! month at a time. Each category can carry a spending limit per month, and
//! budget status compares that limit with what the month's expenses add up to.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (money, months, categories, expenses, budgets)
//! - `storage`: Key-value JSON storage layer
//! - `services`: Expense aggregation and budget evaluation
//! - `audit`: Audit logging system
//! - `cli` / `display`: Command handlers and terminal formatting
//! - `time`: Clock abstraction
//!
//! # Example
//!
//! ```rust,ignore
//! use expense_tracker::config::{ExpensePaths, Settings};
//! use expense_tracker::services::ExpenseAggregator;
//! use expense_tracker::storage::Storage;
//! use expense_tracker::time::SystemClock;
//!
//! let paths = ExpensePaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::open(&paths, &settings)?;
//! let clock = SystemClock;
//! let expenses = ExpenseAggregator::new(&storage, &clock);
//! println!("{}", expenses.monthly_total());
//! ```

use std::sync::Once;

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;
pub mod time;

pub use error::{ExpenseError, ExpenseResult};

static TRACING_INIT: Once = Once::new();

/// Install the global tracing subscriber, writing to stderr
///
/// `RUST_LOG` overrides the default of warnings only.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("expense_tracker=warn"));

        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    });
}
