use anyhow::Result;
use clap::{Parser, Subcommand};

use expense_tracker::cli::{
    handle_budget_command, handle_expense_command, BudgetCommands, ExpenseCommands,
};
use expense_tracker::config::{ExpensePaths, Settings};
use expense_tracker::display::format_category_list;
use expense_tracker::storage::Storage;
use expense_tracker::time::SystemClock;

#[derive(Parser)]
#[command(
    name = "expense",
    version,
    about = "Track personal expenses against monthly category budgets",
    long_about = "Record what you spend, browse it month by month, and set a \
                  spending limit per category to see where the month stands."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Expense(ExpenseCommands),

    /// Budget management commands
    #[command(subcommand)]
    Budget(BudgetCommands),

    /// List the expense categories
    Categories,

    /// Show recent entries from the audit log
    Audit {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "20")]
        count: usize,
    },

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    expense_tracker::init_tracing();

    let paths = ExpensePaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    let storage = Storage::open(&paths, &settings)?;
    let clock = SystemClock;

    match cli.command {
        Some(Commands::Expense(cmd)) => {
            handle_expense_command(&storage, &settings, &clock, cmd)?;
        }
        Some(Commands::Budget(cmd)) => {
            handle_budget_command(&storage, &settings, &clock, cmd)?;
        }
        Some(Commands::Categories) => {
            print!("{}", format_category_list());
        }
        Some(Commands::Audit { count }) => match storage.audit() {
            Some(logger) => {
                let entries = logger.read_recent(count)?;
                if entries.is_empty() {
                    println!("No audit entries yet.");
                }
                for entry in entries {
                    println!("{}", entry.format_human_readable());
                }
            }
            None => println!("Audit logging is disabled in {}", paths.settings_file().display()),
        },
        Some(Commands::Config) => {
            println!("Expense Tracker Configuration");
            println!("=============================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Data directory: {}", paths.data_dir().display());
            println!("Settings file:  {}", paths.settings_file().display());
            println!("Audit log:      {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol: {}", settings.currency_symbol);
            println!("  Date format:     {}", settings.date_format);
            println!("  Recent count:    {}", settings.recent_count);
            println!("  Audit enabled:   {}", settings.audit_enabled);
        }
        None => {
            println!("Expense Tracker - monthly spending and budgets");
            println!();
            println!("Run 'expense --help' for usage information.");
            println!("Run 'expense add 12.50 food' to record your first expense.");
        }
    }

    Ok(())
}
