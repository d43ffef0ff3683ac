//! Budget display formatting

use crate::config::Settings;
use crate::models::{Budget, BudgetStatus, Month};

use super::format::{format_bar, format_money_colored, format_percentage, separator};

/// Format the budgets of a month as a list
pub fn format_budget_list(budgets: &[&Budget], month: Month, settings: &Settings) -> String {
    if budgets.is_empty() {
        return format!("No budgets for {}.\n", month.label());
    }

    let mut output = String::new();
    output.push_str(&format!("Budgets for {}\n", month.label()));
    output.push_str(&format!("{:12} {:13} {:>12}\n", "ID", "Category", "Limit"));
    output.push_str(&separator(39));
    output.push('\n');

    for budget in budgets {
        output.push_str(&format!(
            "{:12} {:13} {:>12}\n",
            budget.id,
            budget.category,
            budget.limit.format_with_symbol(&settings.currency_symbol)
        ));
    }

    output
}

/// Format one status row
pub fn format_budget_status_row(status: &BudgetStatus, settings: &Settings) -> String {
    let symbol = settings.currency_symbol.as_str();
    let flag = if status.is_over_budget() { " OVER" } else { "" };

    format!(
        "{:13} {:>12} {:>12} {:>12} {:>5} {}{}",
        status.category,
        status.limit.format_with_symbol(symbol),
        status.spent.format_with_symbol(symbol),
        format_money_colored(status.remaining, symbol),
        format_percentage(status.progress),
        format_bar(status.progress, 12),
        flag
    )
}

/// Format a month's budget-vs-spending table
pub fn format_budget_table(statuses: &[BudgetStatus], month: Month, settings: &Settings) -> String {
    if statuses.is_empty() {
        return format!("No budgets for {}.\n", month.label());
    }

    let mut output = String::new();
    output.push_str(&format!("Budget status for {}\n", month.label()));
    output.push_str(&format!(
        "{:13} {:>12} {:>12} {:>12} {:>5}\n",
        "Category", "Limit", "Spent", "Remaining", "Used"
    ));
    output.push_str(&separator(70));
    output.push('\n');

    for status in statuses {
        output.push_str(&format_budget_status_row(status, settings));
        output.push('\n');
    }

    let over = statuses.iter().filter(|s| s.is_over_budget()).count();
    if over > 0 {
        let noun = if over == 1 { "category" } else { "categories" };
        output.push_str(&format!("\n{} {} over budget\n", over, noun));
    }

    output
}
