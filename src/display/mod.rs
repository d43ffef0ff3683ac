//! Display formatting for terminal output

pub mod budget;
pub mod expense;
pub mod format;

pub use budget::{format_budget_list, format_budget_status_row, format_budget_table};
pub use expense::{
    format_category_list, format_expense_details, format_expense_register, format_expense_row,
    format_month_summary,
};
