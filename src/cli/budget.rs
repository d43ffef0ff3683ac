//! Budget CLI commands
//!
//! Setting monthly category limits and checking spending against them.

use clap::Subcommand;

use crate::config::Settings;
use crate::display::{format_budget_list, format_budget_table};
use crate::error::{ExpenseError, ExpenseResult};
use crate::models::Budget;
use crate::services::{BudgetEvaluator, ExpenseAggregator};
use crate::storage::Storage;
use crate::time::Clock;

use super::input::InputParser;

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Create a budget for a category and month
    Set {
        /// Category name
        category: String,
        /// Monthly limit (e.g., "300" or "300.00")
        limit: String,
        /// Month (e.g., "2025-01", "January", "current", "next"); defaults to the current month
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Change the limit of an existing budget
    Edit {
        /// Budget ID or unique prefix
        id: String,
        /// New monthly limit
        limit: String,
    },

    /// Delete a budget
    #[command(alias = "rm")]
    Delete {
        /// Budget ID or unique prefix
        id: String,
    },

    /// List budgets for a month
    #[command(alias = "ls")]
    List {
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Show spending against each budget for a month
    Status {
        #[arg(short, long)]
        month: Option<String>,
    },
}

/// Handle a budget command
pub fn handle_budget_command(
    storage: &Storage,
    settings: &Settings,
    clock: &dyn Clock,
    cmd: BudgetCommands,
) -> ExpenseResult<()> {
    let input = InputParser::new(clock);
    let mut budgets = BudgetEvaluator::new(storage, clock);
    budgets.load()?;

    match cmd {
        BudgetCommands::Set {
            category,
            limit,
            month,
        } => {
            let category = input.category(&category)?;
            let month = input.month_or_current(month.as_deref())?;
            let budget = Budget::new(category, input.amount(&limit)?, month);

            budgets.add(budget.clone())?;

            println!(
                "Budget set: {} {} limit {}",
                budget.category,
                budget.month.label(),
                budget.limit.format_with_symbol(&settings.currency_symbol)
            );
            println!("  ID: {}", budget.id);
        }

        BudgetCommands::Edit { id, limit } => {
            let mut budget = resolve_budget(&budgets, &id)?;
            let before = budget.limit;
            budget.limit = input.amount(&limit)?;

            if !budgets.update(budget.clone())? {
                return Err(ExpenseError::budget_not_found(id));
            }

            println!(
                "Budget for {} {}: {} -> {}",
                budget.category,
                budget.month.label(),
                before.format_with_symbol(&settings.currency_symbol),
                budget.limit.format_with_symbol(&settings.currency_symbol)
            );
        }

        BudgetCommands::Delete { id } => {
            let budget = resolve_budget(&budgets, &id)?;

            if !budgets.delete(budget.id)? {
                return Err(ExpenseError::budget_not_found(id));
            }

            println!(
                "Deleted budget {} ({} {})",
                budget.id,
                budget.category,
                budget.month.label()
            );
        }

        BudgetCommands::List { month } => {
            let month = input.month_or_current(month.as_deref())?;
            print!(
                "{}",
                format_budget_list(&budgets.budgets_for_month(month), month, settings)
            );
        }

        BudgetCommands::Status { month } => {
            let month = input.month_or_current(month.as_deref())?;
            let mut spending = ExpenseAggregator::new(storage, clock);
            spending.load()?;

            let overview = budgets.overview(&spending, month);
            print!("{}", format_budget_table(&overview, month, settings));
        }
    }

    Ok(())
}

/// Find exactly one budget matching user input
fn resolve_budget(budgets: &BudgetEvaluator, input: &str) -> ExpenseResult<Budget> {
    match budgets.find_by_id(input).as_slice() {
        [] => Err(ExpenseError::budget_not_found(input)),
        [budget] => Ok((*budget).clone()),
        matches => Err(ExpenseError::Validation(format!(
            "'{}' matches {} budgets; use more characters of the ID",
            input,
            matches.len()
        ))),
    }
}
