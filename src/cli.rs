//! Command-line interface definitions using clap
//!
//! This module defines the CLI structure for budgetly using clap's derive macros.

use clap::{Parser, Subcommand};

use crate::ledger::Period;
use crate::storage::TransactionType;

/// Budgetly - personal finance backend
#[derive(Parser)]
#[command(name = "budgetly")]
#[command(version)]
#[command(about = "Track income, expenses and monthly budgets", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default when no command is given)
    Serve,

    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserCommands,
    },

    /// Manage transactions
    Tx {
        #[command(subcommand)]
        action: TxCommands,
    },

    /// Manage monthly category budgets
    Budget {
        #[command(subcommand)]
        action: BudgetCommands,
    },

    /// Show income, expenses and balance for a period
    Summary {
        /// Account email
        email: String,

        /// week | month | year | all
        #[arg(long, default_value = "month")]
        period: Period,
    },

    /// Show this month's spending insights
    Insights {
        /// Account email
        email: String,
    },

    /// Configuration file helpers
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Register a new account
    ///
    /// The password is read interactively unless --password is given.
    Add {
        email: String,

        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        #[arg(long, default_value = "0")]
        monthly_budget: String,

        #[arg(long, default_value = "-")]
        address: String,

        #[arg(long, default_value = "-")]
        phone: String,

        #[arg(long)]
        password: Option<String>,
    },

    /// Show an account and its profile
    Show { email: String },
}

#[derive(Subcommand)]
pub enum TxCommands {
    /// Record a transaction
    Add {
        /// Account email
        email: String,

        /// income | expense
        kind: TransactionType,

        amount: String,

        /// Category id (e.g. food, salary)
        category: String,

        description: String,

        /// When it happened (RFC3339, default: now)
        #[arg(long)]
        at: Option<String>,
    },

    /// List transactions, newest first
    List {
        email: String,

        #[arg(long = "type")]
        kind: Option<TransactionType>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        period: Option<Period>,
    },

    /// Delete a transaction by id
    Remove { email: String, id: String },

    /// Export all transactions as CSV
    Export {
        email: String,

        /// Output file path (default: stdout)
        file_path: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Create a budget for a category and month
    Set {
        email: String,

        category: String,

        amount: String,

        /// 1-12 (default: current month)
        #[arg(long)]
        month: Option<u32>,

        /// default: current year
        #[arg(long)]
        year: Option<i32>,
    },

    /// List budgets with their spent amount
    List {
        email: String,

        #[arg(long)]
        month: Option<u32>,

        #[arg(long)]
        year: Option<i32>,
    },

    /// Delete a budget by id
    Remove { email: String, id: String },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Generate a sample configuration file
    Generate {
        /// Output file path (default: config.example.toml)
        output_path: Option<String>,

        /// Force overwrite without confirmation
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_tx_add() {
        let cli = Cli::try_parse_from([
            "budgetly", "tx", "add", "ada@example.com", "expense", "12.5", "food", "Lunch",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Tx {
                action:
                    TxCommands::Add {
                        kind,
                        amount,
                        category,
                        at,
                        ..
                    },
            }) => {
                assert_eq!(kind, TransactionType::Expense);
                assert_eq!(amount, "12.5");
                assert_eq!(category, "food");
                assert!(at.is_none());
            }
            _ => panic!("expected tx add"),
        }
    }

    #[test]
    fn test_parse_summary_period_and_global_config() {
        let cli = Cli::try_parse_from([
            "budgetly",
            "summary",
            "ada@example.com",
            "--period",
            "year",
            "-c",
            "custom.toml",
        ])
        .unwrap();

        assert_eq!(cli.config.as_deref(), Some("custom.toml"));
        assert!(matches!(
            cli.command,
            Some(Commands::Summary {
                period: Period::Year,
                ..
            })
        ));
    }

    #[test]
    fn test_parse_rejects_unknown_kind() {
        let result = Cli::try_parse_from([
            "budgetly", "tx", "add", "a@b.c", "gift", "1", "other", "x",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_no_command_means_server() {
        let cli = Cli::try_parse_from(["budgetly"]).unwrap();
        assert!(cli.command.is_none());
    }
}
