//! Budget commands

use colored::Colorize;

use super::helpers::{money, month_or_current, resolve_account};
use crate::interfaces::cli::CliError;
use crate::ledger::{AmountInput, BudgetForm, BudgetStatus, category_name};
use crate::services::AppServices;

pub async fn budget_set(
    services: &AppServices,
    email: &str,
    category: String,
    amount: String,
    month: Option<u32>,
    year: Option<i32>,
) -> Result<(), CliError> {
    let account = resolve_account(services, email).await?;
    let (month, year) = month_or_current(month, year);
    let form = BudgetForm {
        category,
        amount: AmountInput::Text(amount),
        month,
        year,
    };

    let budget = services.budgets.add_budget(&account.id, &form).await?;
    println!(
        "{} Budget {} {} for {:02}/{} -> {}",
        "✓".bold().green(),
        category_name(&budget.category).cyan(),
        money(budget.amount).yellow(),
        budget.month,
        budget.year,
        budget.id.dimmed()
    );
    Ok(())
}

pub async fn budget_list(
    services: &AppServices,
    email: &str,
    month: Option<u32>,
    year: Option<i32>,
) -> Result<(), CliError> {
    let account = resolve_account(services, email).await?;
    let (month, year) = month_or_current(month, year);
    let overview = services.budgets.overview(&account.id, month, year).await?;

    if overview.budgets.is_empty() {
        println!(
            "{} No budgets for {:02}/{}",
            "ℹ".bold().blue(),
            month,
            year
        );
        return Ok(());
    }

    println!("{}", format!("Budgets for {:02}/{}:", month, year).bold().green());
    println!();
    for item in &overview.budgets {
        let pct = format!("{:>5.1}%", item.progress * 100.0);
        let pct = match item.status {
            BudgetStatus::OnTrack => pct.green(),
            BudgetStatus::Warning => pct.yellow(),
            BudgetStatus::Over => pct.red().bold(),
        };
        println!(
            "  {} {} / {} {} {}",
            category_name(&item.budget.category).cyan(),
            money(item.budget.spent),
            money(item.budget.amount),
            pct,
            format!("[{}]", item.budget.id).dimmed()
        );
    }
    println!();
    println!(
        "{} Spent {} of {}, {} remaining",
        "ℹ".bold().blue(),
        money(overview.total_spent).magenta(),
        money(overview.total_budget),
        money(overview.remaining).yellow()
    );
    Ok(())
}

pub async fn budget_remove(services: &AppServices, email: &str, id: &str) -> Result<(), CliError> {
    let account = resolve_account(services, email).await?;
    services.budgets.delete_budget(&account.id, id).await?;
    println!("{} Deleted budget {}", "✓".bold().green(), id.cyan());
    Ok(())
}
