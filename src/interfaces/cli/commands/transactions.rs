//! Transaction commands

use colored::Colorize;
use std::fs::File;
use std::io::{self, BufWriter};

use chrono::Utc;

use super::helpers::{money, parse_timestamp, resolve_account};
use crate::interfaces::cli::CliError;
use crate::ledger::{
    AmountInput, Period, TransactionFilter, TransactionForm, category_name, sum_amounts,
};
use crate::services::AppServices;
use crate::storage::TransactionType;

pub async fn tx_add(
    services: &AppServices,
    email: &str,
    kind: TransactionType,
    amount: String,
    category: String,
    description: String,
    at: Option<String>,
) -> Result<(), CliError> {
    let account = resolve_account(services, email).await?;
    let form = TransactionForm {
        kind,
        amount: AmountInput::Text(amount),
        description,
        category,
        timestamp: parse_timestamp(at.as_deref())?,
    };

    let tx = services
        .transactions
        .add_transaction(&account.id, &form)
        .await?;
    println!(
        "{} Added {} {} {} ({}) -> {}",
        "✓".bold().green(),
        tx.kind,
        money(tx.amount).yellow(),
        tx.description,
        category_name(&tx.category).cyan(),
        tx.id.dimmed()
    );
    Ok(())
}

pub async fn tx_list(
    services: &AppServices,
    email: &str,
    kind: Option<TransactionType>,
    category: Option<String>,
    period: Option<Period>,
) -> Result<(), CliError> {
    let account = resolve_account(services, email).await?;
    let filter = TransactionFilter {
        kind,
        category,
        period,
    };
    let txs = services
        .transactions
        .list_filtered(&account.id, &filter, Utc::now())
        .await?;

    if txs.is_empty() {
        println!("{} No transactions found", "ℹ".bold().blue());
        return Ok(());
    }

    println!("{}", "Transactions:".bold().green());
    println!();
    for tx in &txs {
        let amount = match tx.kind {
            TransactionType::Income => format!("+{}", money(tx.amount)).green(),
            TransactionType::Expense => format!("-{}", money(tx.amount)).red(),
        };
        println!(
            "  {} {:>12} {} {} {}",
            tx.timestamp.format("%Y-%m-%d").to_string().dimmed(),
            amount,
            category_name(&tx.category).cyan(),
            tx.description,
            format!("[{}]", tx.id).dimmed()
        );
    }
    println!();

    let net = sum_amounts(txs.iter().map(|tx| match tx.kind {
        TransactionType::Income => tx.amount,
        TransactionType::Expense => -tx.amount,
    }));
    println!(
        "{} Total {} transactions, net {}",
        "ℹ".bold().blue(),
        txs.len().to_string().green(),
        money(net).yellow()
    );
    Ok(())
}

pub async fn tx_remove(services: &AppServices, email: &str, id: &str) -> Result<(), CliError> {
    let account = resolve_account(services, email).await?;
    services
        .transactions
        .delete_transaction(&account.id, id)
        .await?;
    println!("{} Deleted transaction {}", "✓".bold().green(), id.cyan());
    Ok(())
}

pub async fn tx_export(
    services: &AppServices,
    email: &str,
    file_path: Option<String>,
) -> Result<(), CliError> {
    let account = resolve_account(services, email).await?;

    match file_path {
        Some(path) => {
            let file = File::create(&path)
                .map_err(|e| CliError::CommandError(format!("Failed to create {}: {}", path, e)))?;
            let count = services
                .transactions
                .export_csv(&account.id, BufWriter::new(file))
                .await?;
            println!(
                "{} Exported {} transactions to {}",
                "✓".bold().green(),
                count.to_string().green(),
                path.blue()
            );
        }
        None => {
            services
                .transactions
                .export_csv(&account.id, io::stdout().lock())
                .await?;
        }
    }
    Ok(())
}
