//! Summary and insights commands

use colored::Colorize;

use super::helpers::{money, resolve_account};
use crate::interfaces::cli::CliError;
use crate::ledger::Period;
use crate::services::AppServices;

pub async fn show_summary(services: &AppServices, email: &str, period: Period) -> Result<(), CliError> {
    let account = resolve_account(services, email).await?;
    let summary = services.transactions.summary(&account.id, period).await?;

    println!(
        "{} {}",
        "Summary for the last".bold().green(),
        period.as_ref().bold().green()
    );
    println!("  {} {}", "income:".dimmed(), money(summary.totals.income).green());
    println!("  {} {}", "expenses:".dimmed(), money(summary.totals.expenses).red());
    println!("  {} {}", "balance:".dimmed(), money(summary.totals.balance).yellow());
    println!(
        "  {} {}",
        "all-time balance:".dimmed(),
        money(summary.all_time.balance)
    );

    if !summary.expense_categories.is_empty() {
        println!();
        println!("{}", "Spending by category:".bold());
        for spend in &summary.expense_categories {
            println!("  {:<20} {}", spend.name.cyan(), money(spend.amount));
        }
    }
    println!();
    println!(
        "{} {} transactions in period",
        "ℹ".bold().blue(),
        summary.count.to_string().green()
    );
    Ok(())
}

pub async fn show_insights(services: &AppServices, email: &str) -> Result<(), CliError> {
    let account = resolve_account(services, email).await?;
    let insights = services.insights.insights(&account.id).await?;

    println!(
        "{}",
        format!("Insights for {:02}/{}", insights.month, insights.year)
            .bold()
            .green()
    );
    println!("  {}", insights.summary);

    if !insights.top_categories.is_empty() {
        println!();
        println!("{}", "Top categories:".bold());
        for spend in &insights.top_categories {
            println!("  {:<20} {}", spend.name.cyan(), money(spend.amount));
        }
    }

    println!();
    println!("{}", "Recommendations:".bold());
    for tip in &insights.recommendations {
        println!("  {} {}", "•".yellow(), tip);
    }
    Ok(())
}
