//! CLI interface module
//!
//! This module provides command-line interface functionality for budgetly.
//! Commands talk to the database directly through the service layer, so
//! they work whether or not a server is running.

pub mod commands;

use std::fmt;
use std::sync::Arc;

use crate::api::jwt::JwtService;
use crate::cli::{BudgetCommands, Commands, ConfigCommands, TxCommands, UserCommands};
use crate::errors::BudgetlyError;
use crate::events::ChangeFeed;
use crate::services::AppServices;
use crate::storage::StorageFactory;
use commands::{
    budget_list, budget_remove, budget_set, config_generate, show_insights, show_summary,
    tx_add, tx_export, tx_list, tx_remove, user_add, user_show,
};

#[derive(Debug)]
pub enum CliError {
    StorageError(String),
    ParseError(String),
    CommandError(String),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::StorageError(msg) => format!("Storage error: {}", msg),
            CliError::ParseError(msg) => format!("Parse error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    /// Format as colored output
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::StorageError(msg) => {
                format!("{} {}", "Storage error:".red().bold(), msg.white())
            }
            CliError::ParseError(msg) => {
                format!("{} {}", "Parse error:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<BudgetlyError> for CliError {
    fn from(err: BudgetlyError) -> Self {
        match err {
            BudgetlyError::DatabaseConfig(_)
            | BudgetlyError::DatabaseConnection(_)
            | BudgetlyError::DatabaseOperation(_) => CliError::StorageError(err.message().to_string()),
            BudgetlyError::DateParse(_) => CliError::ParseError(err.message().to_string()),
            // 校验类错误直接展示原文
            _ => CliError::CommandError(err.message().to_string()),
        }
    }
}

/// 构建 CLI 使用的服务集合
///
/// CLI 进程内没有订阅者，变更广播只是空转。
async fn build_services() -> Result<AppServices, CliError> {
    let config = crate::config::get_config();
    let storage = StorageFactory::create()
        .await
        .map_err(|e| CliError::StorageError(e.to_string()))?;
    let feed = ChangeFeed::new(config.events.channel_capacity);
    let jwt = Arc::new(JwtService::from_config(&config.auth));
    Ok(AppServices::new(storage, feed, jwt))
}

/// Run a CLI command from clap-parsed input
pub async fn run_cli_command(cmd: Commands) -> Result<(), CliError> {
    // Generate doesn't need DB connection, handle it separately
    if let Commands::Config {
        action: ConfigCommands::Generate { output_path, force },
    } = cmd
    {
        return config_generate(output_path, force).await;
    }

    let services = build_services().await?;

    let result = match cmd {
        Commands::User { action } => match action {
            UserCommands::Add {
                email,
                first_name,
                last_name,
                monthly_budget,
                address,
                phone,
                password,
            } => {
                user_add(
                    &services,
                    commands::NewUserArgs {
                        email,
                        first_name,
                        last_name,
                        monthly_budget,
                        address,
                        phone,
                        password,
                    },
                )
                .await
            }
            UserCommands::Show { email } => user_show(&services, &email).await,
        },

        Commands::Tx { action } => match action {
            TxCommands::Add {
                email,
                kind,
                amount,
                category,
                description,
                at,
            } => tx_add(&services, &email, kind, amount, category, description, at).await,
            TxCommands::List {
                email,
                kind,
                category,
                period,
            } => tx_list(&services, &email, kind, category, period).await,
            TxCommands::Remove { email, id } => tx_remove(&services, &email, &id).await,
            TxCommands::Export { email, file_path } => {
                tx_export(&services, &email, file_path).await
            }
        },

        Commands::Budget { action } => match action {
            BudgetCommands::Set {
                email,
                category,
                amount,
                month,
                year,
            } => budget_set(&services, &email, category, amount, month, year).await,
            BudgetCommands::List { email, month, year } => {
                budget_list(&services, &email, month, year).await
            }
            BudgetCommands::Remove { email, id } => budget_remove(&services, &email, &id).await,
        },

        Commands::Summary { email, period } => show_summary(&services, &email, period).await,

        Commands::Insights { email } => show_insights(&services, &email).await,

        Commands::Config { .. } => unreachable!("handled above"),

        Commands::Serve => unreachable!("Serve handled in main"),
    };

    if let Err(e) = services.storage.close().await {
        tracing::debug!("Failed to close storage after CLI command: {}", e);
    }
    result
}
