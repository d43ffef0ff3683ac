//! Expense display formatting
//!
//! Register views, single-expense details and the monthly summary.

use crate::config::Settings;
use crate::models::{Category, Expense};
use crate::services::ExpenseSnapshot;

use super::format::{format_bar, format_percentage, separator, truncate};

/// Format a single expense as a register row
pub fn format_expense_row(expense: &Expense, settings: &Settings) -> String {
    let note = if expense.note.is_empty() {
        "-"
    } else {
        expense.note.as_str()
    };

    format!(
        "{:12} {:10} {:13} {:>12}  {}",
        expense.id,
        expense.date.format(&settings.date_format),
        expense.category,
        expense.amount.format_with_symbol(&settings.currency_symbol),
        truncate(note, 30).trim_end()
    )
}

/// Format a list of expenses as a register
pub fn format_expense_register(expenses: &[&Expense], settings: &Settings) -> String {
    if expenses.is_empty() {
        return "No expenses found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:12} {:10} {:13} {:>12}  {}\n",
        "ID", "Date", "Category", "Amount", "Note"
    ));
    output.push_str(&separator(64));
    output.push('\n');

    for expense in expenses {
        output.push_str(&format_expense_row(expense, settings));
        output.push('\n');
    }

    output
}

/// Format one expense in full
pub fn format_expense_details(expense: &Expense, settings: &Settings) -> String {
    let mut output = String::new();

    output.push_str(&format!("Expense:  {}\n", expense.id));
    output.push_str(&format!(
        "Date:     {}\n",
        expense.date.format(&format!("{} %H:%M", settings.date_format))
    ));
    output.push_str(&format!(
        "Amount:   {}\n",
        expense.amount.format_with_symbol(&settings.currency_symbol)
    ));
    output.push_str(&format!("Category: {}\n", expense.category));

    if !expense.note.is_empty() {
        output.push_str(&format!("Note:     {}\n", expense.note));
    }
    if !expense.tags.is_empty() {
        output.push_str(&format!("Tags:     {}\n", expense.tags.join(", ")));
    }

    output
}

/// Format the totals of the selected month, one line per category
pub fn format_month_summary(snapshot: &ExpenseSnapshot, settings: &Settings) -> String {
    let symbol = settings.currency_symbol.as_str();
    let total = snapshot.total_for_selected_month;
    let count = snapshot
        .expenses
        .iter()
        .filter(|e| e.is_in_month(snapshot.selected_month))
        .count();

    let mut output = String::new();
    output.push_str(&format!("Spending for {}\n", snapshot.selected_month.label()));
    output.push_str(&separator(52));
    output.push('\n');

    for (category, amount) in &snapshot.totals_by_category {
        let share = amount.ratio_of(total).unwrap_or(0.0);
        output.push_str(&format!(
            "{:13} {:>12} {:>5} {}\n",
            category,
            amount.format_with_symbol(symbol),
            format_percentage(share),
            format_bar(share, 16)
        ));
    }

    output.push_str(&separator(52));
    output.push('\n');
    output.push_str(&format!(
        "{:13} {:>12}\n",
        "Total",
        total.format_with_symbol(symbol)
    ));
    output.push_str(&format!("Expenses: {}\n", count));

    output
}

/// Format the fixed category list
pub fn format_category_list() -> String {
    let mut output = String::new();
    output.push_str(&format!("{:13} {:22} {}\n", "Category", "Icon", "Color"));
    output.push_str(&separator(44));
    output.push('\n');

    for category in Category::ALL {
        output.push_str(&format!(
            "{:13} {:22} {}\n",
            category,
            category.icon(),
            category.color()
        ));
    }

    output
}
