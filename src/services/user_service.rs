//! User profile service

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use crate::errors::{BudgetlyError, Result};
use crate::ledger::AmountInput;
use crate::storage::{SeaOrmStorage, UserDetails};

const MSG_MONTHLY_BUDGET: &str = "Please enter your monthly budget";

/// 新建资料时的字段
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewUserDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub address: String,
    pub monthly_budget: String,
    pub photo_url: Option<String>,
}

/// 部分更新，缺省字段保持原值
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserDetailsPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub monthly_budget: Option<String>,
    pub photo_url: Option<String>,
}

fn check_monthly_budget(value: &str) -> Result<()> {
    match AmountInput::Text(value.to_string()).parse() {
        Some(v) if v >= 0.0 => Ok(()),
        _ => Err(BudgetlyError::validation(MSG_MONTHLY_BUDGET)),
    }
}

fn non_blank(value: String, message: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(BudgetlyError::validation(message));
    }
    Ok(trimmed.to_string())
}

#[derive(Clone)]
pub struct UserService {
    storage: Arc<SeaOrmStorage>,
}

impl UserService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    pub async fn get_user_details(&self, user_id: &str) -> Result<Option<UserDetails>> {
        self.storage.get_user_details(user_id).await
    }

    /// 写入（覆盖）用户资料
    pub async fn create_user_details(&self, user_id: &str, input: NewUserDetails) -> Result<UserDetails> {
        check_monthly_budget(&input.monthly_budget)?;
        let now = Utc::now();
        let created_at = self
            .storage
            .get_user_details(user_id)
            .await?
            .map_or(now, |existing| existing.created_at);

        let details = UserDetails {
            user_id: user_id.to_string(),
            first_name: input.first_name.trim().to_string(),
            last_name: input.last_name.trim().to_string(),
            email: crate::utils::normalize_email(&input.email),
            phone_number: input.phone_number.trim().to_string(),
            address: input.address.trim().to_string(),
            monthly_budget: input.monthly_budget.trim().to_string(),
            photo_url: input.photo_url.filter(|u| !u.trim().is_empty()),
            created_at,
            updated_at: now,
        };

        self.storage.upsert_user_details(&details).await?;
        info!("User details saved for {}", user_id);
        Ok(details)
    }

    pub async fn update_user_details(&self, user_id: &str, patch: UserDetailsPatch) -> Result<UserDetails> {
        let mut details = self
            .storage
            .get_user_details(user_id)
            .await?
            .ok_or_else(|| BudgetlyError::not_found(format!("User details for '{}' not found", user_id)))?;

        if let Some(first_name) = patch.first_name {
            details.first_name = non_blank(first_name, "Please enter your first name")?;
        }
        if let Some(last_name) = patch.last_name {
            details.last_name = non_blank(last_name, "Please enter your last name")?;
        }
        if let Some(phone) = patch.phone_number {
            details.phone_number = non_blank(phone, "Please enter your phone number")?;
        }
        if let Some(address) = patch.address {
            details.address = non_blank(address, "Please enter your address")?;
        }
        if let Some(budget) = patch.monthly_budget {
            check_monthly_budget(&budget)?;
            details.monthly_budget = budget.trim().to_string();
        }
        if let Some(photo_url) = patch.photo_url {
            // 空串表示移除头像
            details.photo_url = Some(photo_url).filter(|u| !u.trim().is_empty());
        }
        details.updated_at = Utc::now();

        self.storage.upsert_user_details(&details).await?;
        info!("User details updated for {}", user_id);
        Ok(details)
    }
}

/// 称呼：名字，否则邮箱 @ 前部分，否则 "User"
pub fn display_name(details: Option<&UserDetails>, email: Option<&str>) -> String {
    if let Some(first) = details.map(|d| d.first_name.trim()).filter(|s| !s.is_empty()) {
        return first.to_string();
    }
    email
        .and_then(|e| e.split('@').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map_or_else(|| "User".to_string(), str::to_string)
}

pub fn full_name(details: &UserDetails) -> String {
    [details.first_name.trim(), details.last_name.trim()]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// 名和姓的首字母，大写
pub fn initials(details: &UserDetails) -> String {
    [&details.first_name, &details.last_name]
        .into_iter()
        .filter_map(|s| s.trim().chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}
