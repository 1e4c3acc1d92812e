use chrono::{DateTime, Datelike, Utc};

use crate::interfaces::cli::CliError;
use crate::services::AppServices;
use crate::storage::UserAccount;
use crate::utils::normalize_email;

/// 按邮箱查找账号
pub(super) async fn resolve_account(
    services: &AppServices,
    email: &str,
) -> Result<UserAccount, CliError> {
    let email = normalize_email(email);
    services
        .storage
        .find_account_by_email(&email)
        .await?
        .ok_or_else(|| CliError::CommandError(format!("No account registered for '{}'", email)))
}

/// RFC3339 时间；缺省为 None
pub(super) fn parse_timestamp(input: Option<&str>) -> Result<Option<DateTime<Utc>>, CliError> {
    input
        .map(|s| {
            DateTime::parse_from_rfc3339(s.trim())
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| CliError::ParseError(format!("Invalid timestamp '{}': {}", s, e)))
        })
        .transpose()
}

/// 未指定的月/年取当前月
pub(super) fn month_or_current(month: Option<u32>, year: Option<i32>) -> (u32, i32) {
    let now = Utc::now();
    (month.unwrap_or(now.month()), year.unwrap_or(now.year()))
}

pub(super) fn money(amount: f64) -> String {
    format!("{:.2}", amount)
}
