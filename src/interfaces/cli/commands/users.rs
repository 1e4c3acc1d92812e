//! Account commands

use colored::Colorize;
use std::io::{self, IsTerminal, Write};

use super::helpers::{money, month_or_current, resolve_account};
use crate::interfaces::cli::CliError;
use crate::ledger::SignUpForm;
use crate::services::{AppServices, display_name, full_name, initials};

pub struct NewUserArgs {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub monthly_budget: String,
    pub address: String,
    pub phone: String,
    pub password: Option<String>,
}

/// 交互式输入密码（带确认）
fn prompt_password_with_confirm() -> Result<(String, String), CliError> {
    if !io::stdin().is_terminal() {
        return Err(CliError::CommandError(
            "No password provided. Use --password or run interactively.".to_string(),
        ));
    }

    let read = |prompt: &str| -> Result<String, CliError> {
        print!("{}", prompt);
        io::stdout()
            .flush()
            .map_err(|e| CliError::CommandError(e.to_string()))?;
        rpassword::read_password()
            .map_err(|e| CliError::CommandError(format!("Failed to read password: {}", e)))
    };

    let password = read("Password: ")?;
    let confirm = read("Confirm password: ")?;
    Ok((password, confirm))
}

pub async fn user_add(services: &AppServices, args: NewUserArgs) -> Result<(), CliError> {
    let (password, confirm_password) = match args.password {
        Some(pwd) => (pwd.clone(), pwd),
        None => prompt_password_with_confirm()?,
    };

    let form = SignUpForm {
        first_name: args.first_name,
        last_name: args.last_name,
        email: args.email,
        password,
        confirm_password,
        monthly_budget: args.monthly_budget,
        address: args.address,
        phone_number: args.phone,
    };

    let session = services.auth.sign_up(&form).await?;
    println!(
        "{} Registered {} (id: {})",
        "✓".bold().green(),
        session.email.cyan(),
        session.user_id.dimmed()
    );
    Ok(())
}

pub async fn user_show(services: &AppServices, email: &str) -> Result<(), CliError> {
    let account = resolve_account(services, email).await?;
    let details = services.users.get_user_details(&account.id).await?;

    println!(
        "{} {}",
        display_name(details.as_ref(), Some(&account.email)).bold().green(),
        format!("<{}>", account.email).cyan()
    );
    println!("  {} {}", "id:".dimmed(), account.id);
    println!(
        "  {} {}",
        "member since:".dimmed(),
        account.created_at.format("%Y-%m-%d")
    );

    match details {
        Some(d) => {
            println!("  {} {} ({})", "name:".dimmed(), full_name(&d), initials(&d));
            println!("  {} {}", "phone:".dimmed(), d.phone_number);
            println!("  {} {}", "address:".dimmed(), d.address);
            println!("  {} {}", "monthly budget:".dimmed(), d.monthly_budget.yellow());
        }
        None => println!("  {}", "No profile details saved".yellow()),
    }

    let (month, year) = month_or_current(None, None);
    let overview = services.budgets.overview(&account.id, month, year).await?;
    println!(
        "  {} {} of {} across {} budgets",
        format!("{:02}/{} spent:", month, year).dimmed(),
        money(overview.total_spent).magenta(),
        money(overview.total_budget),
        overview.budgets.len()
    );
    Ok(())
}
