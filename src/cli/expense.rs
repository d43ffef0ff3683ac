//! Expense CLI commands
//!
//! Recording, editing and browsing expenses.

use clap::Subcommand;

use crate::config::Settings;
use crate::display::{
    format_expense_details, format_expense_register, format_month_summary,
};
use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{parse_tags, Expense, Money};
use crate::services::ExpenseAggregator;
use crate::storage::Storage;
use crate::time::Clock;

use super::input::InputParser;

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record a new expense
    Add {
        /// Amount (e.g., "45.99" or "$45.99")
        amount: String,
        /// Category (Food, Transport, Shopping, Entertainment, Bills, Health, Education, Other)
        category: String,
        /// When it happened (YYYY-MM-DD or YYYY-MM-DDTHH:MM[:SS]); defaults to now
        #[arg(short, long)]
        date: Option<String>,
        /// Free-text note
        #[arg(short, long)]
        note: Option<String>,
        /// Comma-separated tags
        #[arg(short, long)]
        tags: Option<String>,
    },

    /// List expenses for a month
    #[command(alias = "ls")]
    List {
        /// Month (e.g., "2025-01", "last", "March"); defaults to the current month
        #[arg(short, long)]
        month: Option<String>,
        /// Only this category
        #[arg(short, long)]
        category: Option<String>,
        /// Only this day (YYYY-MM-DD); selects its month
        #[arg(long)]
        day: Option<String>,
    },

    /// Show one expense in full
    Show {
        /// Expense ID or unique prefix
        id: String,
    },

    /// Edit an existing expense
    Edit {
        /// Expense ID or unique prefix
        id: String,
        #[arg(short, long)]
        amount: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        date: Option<String>,
        /// New note (empty string clears it)
        #[arg(short, long)]
        note: Option<String>,
        /// New comma-separated tags (empty string clears them)
        #[arg(short, long)]
        tags: Option<String>,
    },

    /// Delete an expense
    #[command(alias = "rm")]
    Delete {
        /// Expense ID or unique prefix
        id: String,
    },

    /// Per-category totals for a month
    Summary {
        #[arg(short, long)]
        month: Option<String>,
    },

    /// The most recent expenses across all months
    Recent {
        /// Number of expenses to show (defaults to the configured count)
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },
}

/// Handle an expense command
pub fn handle_expense_command(
    storage: &Storage,
    settings: &Settings,
    clock: &dyn Clock,
    cmd: ExpenseCommands,
) -> ExpenseResult<()> {
    let input = InputParser::new(clock);
    let mut expenses = ExpenseAggregator::new(storage, clock);
    expenses.load()?;

    match cmd {
        ExpenseCommands::Add {
            amount,
            category,
            date,
            note,
            tags,
        } => {
            let expense = Expense::new(
                input.amount(&amount)?,
                input.category(&category)?,
                input.timestamp_or_now(date.as_deref())?,
            )
            .with_note(note.unwrap_or_default())
            .with_tags(tags.as_deref().map(parse_tags).unwrap_or_default());

            expenses.add(expense.clone())?;

            println!(
                "Recorded {} ({}) on {}",
                expense.amount.format_with_symbol(&settings.currency_symbol),
                expense.category,
                expense.date.format(&settings.date_format)
            );
            println!("  ID: {}", expense.id);
        }

        ExpenseCommands::List {
            month,
            category,
            day,
        } => {
            expenses.set_selected_month(input.month_or_current(month.as_deref())?);
            if let Some(category) = category {
                expenses.select_category(Some(input.category(&category)?));
            }
            if let Some(day) = day {
                expenses.select_date(Some(input.day(&day)?));
            }

            let listed = expenses.filtered();
            let total: Money = listed.iter().map(|e| e.amount).sum();

            println!("Expenses for {}", expenses.selected_month_label());
            println!();
            print!("{}", format_expense_register(&listed, settings));
            if !listed.is_empty() {
                println!();
                println!(
                    "{} expense(s), total {}",
                    listed.len(),
                    total.format_with_symbol(&settings.currency_symbol)
                );
            }
        }

        ExpenseCommands::Show { id } => {
            let expense = resolve_expense(&expenses, &id)?;
            print!("{}", format_expense_details(&expense, settings));
        }

        ExpenseCommands::Edit {
            id,
            amount,
            category,
            date,
            note,
            tags,
        } => {
            let mut expense = resolve_expense(&expenses, &id)?;

            if let Some(amount) = amount {
                expense.amount = input.amount(&amount)?;
            }
            if let Some(category) = category {
                expense.category = input.category(&category)?;
            }
            if let Some(date) = date {
                expense.date = input.timestamp_or_now(Some(&date))?;
            }
            if let Some(note) = note {
                expense.note = note;
            }
            if let Some(tags) = tags {
                expense.tags = parse_tags(&tags);
            }

            if !expenses.update(expense.clone())? {
                return Err(ExpenseError::expense_not_found(id));
            }

            println!("Updated expense {}", expense.id);
            print!("{}", format_expense_details(&expense, settings));
        }

        ExpenseCommands::Delete { id } => {
            let expense = resolve_expense(&expenses, &id)?;

            if !expenses.delete(expense.id)? {
                return Err(ExpenseError::expense_not_found(id));
            }

            println!(
                "Deleted expense {} ({} {})",
                expense.id,
                expense.category,
                expense.amount.format_with_symbol(&settings.currency_symbol)
            );
        }

        ExpenseCommands::Summary { month } => {
            expenses.set_selected_month(input.month_or_current(month.as_deref())?);
            print!("{}", format_month_summary(&expenses.snapshot(), settings));
        }

        ExpenseCommands::Recent { count } => {
            let count = count.unwrap_or(settings.recent_count);
            let recent = expenses.recent(count);

            println!("Recent expenses");
            println!();
            print!("{}", format_expense_register(&recent, settings));
        }
    }

    Ok(())
}

/// Find exactly one expense matching user input
fn resolve_expense(expenses: &ExpenseAggregator, input: &str) -> ExpenseResult<Expense> {
    match expenses.find(input).as_slice() {
        [] => Err(ExpenseError::expense_not_found(input)),
        [expense] => Ok((*expense).clone()),
        matches => Err(ExpenseError::Validation(format!(
            "'{}' matches {} expenses; use more characters of the ID",
            input,
            matches.len()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use crate::time::FixedClock;
    use chrono::NaiveDate;

    #[test]
    fn test_resolve_expense() {
        let storage = Storage::in_memory();
        let clock = FixedClock::on(2025, 1, 15).unwrap();
        let mut expenses = ExpenseAggregator::new(&storage, &clock);

        let date = NaiveDate::from_ymd_opt(2025, 1, 2)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let expense = Expense::new(Money::from_cents(100), Category::Food, date);
        expenses.add(expense.clone()).unwrap();

        assert_eq!(
            resolve_expense(&expenses, &expense.id.to_string()).unwrap(),
            expense
        );
        assert!(resolve_expense(&expenses, "ffffffff-0000")
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_add_then_edit_through_handler() {
        let storage = Storage::in_memory();
        let clock = FixedClock::on(2025, 1, 15).unwrap();
        let settings = Settings::default();

        handle_expense_command(
            &storage,
            &settings,
            &clock,
            ExpenseCommands::Add {
                amount: "45.99".into(),
                category: "food".into(),
                date: None,
                note: Some("Lunch".into()),
                tags: Some("dining, work".into()),
            },
        )
        .unwrap();

        let stored = storage.expenses.list().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].tags, vec!["dining", "work"]);
        assert_eq!(stored[0].date, clock.now());

        handle_expense_command(
            &storage,
            &settings,
            &clock,
            ExpenseCommands::Edit {
                id: stored[0].id.to_string(),
                amount: Some("50".into()),
                category: None,
                date: None,
                note: Some(String::new()),
                tags: None,
            },
        )
        .unwrap();

        let edited = storage.expenses.get(stored[0].id).unwrap().unwrap();
        assert_eq!(edited.amount, Money::from_cents(5000));
        assert!(edited.note.is_empty());
        assert_eq!(edited.tags, stored[0].tags);
    }

    #[test]
    fn test_unknown_category_rejected() {
        let storage = Storage::in_memory();
        let clock = FixedClock::on(2025, 1, 15).unwrap();

        let err = handle_expense_command(
            &storage,
            &Settings::default(),
            &clock,
            ExpenseCommands::Add {
                amount: "10".into(),
                category: "rent".into(),
                date: None,
                note: None,
                tags: None,
            },
        )
        .unwrap_err();

        assert!(err.is_validation());
        assert!(storage.expenses.list().unwrap().is_empty());
    }
}
