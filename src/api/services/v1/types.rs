//! API 类型定义

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::ledger::Period;
use crate::storage::{TransactionType, UserDetails};

/// 统一响应包装 `{code, message, data}`
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// `?month=&year=`，缺省为当前月
#[derive(Deserialize, Clone, Copy, Debug, Default)]
pub struct MonthQuery {
    pub month: Option<u32>,
    pub year: Option<i32>,
}

impl MonthQuery {
    pub fn resolve(&self) -> (u32, i32) {
        let now = Utc::now();
        (
            self.month.unwrap_or_else(|| now.month()),
            self.year.unwrap_or_else(|| now.year()),
        )
    }
}

#[derive(Deserialize, Clone, Copy, Debug, Default)]
pub struct PeriodQuery {
    #[serde(default)]
    pub period: Period,
}

#[derive(Deserialize, Clone, Copy, Debug, Default)]
pub struct CategoryQuery {
    #[serde(default, rename = "type")]
    pub kind: Option<TransactionType>,
}

#[derive(Serialize, Clone, Debug)]
pub struct MeResponse {
    pub user_id: String,
    pub email: String,
    pub display_name: String,
}

#[derive(Serialize, Clone, Debug)]
pub struct ProfileResponse {
    pub user_id: String,
    pub email: String,
    pub display_name: String,
    pub full_name: Option<String>,
    pub initials: Option<String>,
    pub details: Option<UserDetails>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_query_explicit_values() {
        assert_eq!(
            MonthQuery {
                month: Some(2),
                year: Some(2025)
            }
            .resolve(),
            (2, 2025)
        );
    }

    #[test]
    fn test_api_response_omits_empty_data() {
        let resp = ApiResponse::<()> {
            code: 1000,
            message: "bad".into(),
            data: None,
        };
        assert_eq!(
            serde_json::to_string(&resp).unwrap(),
            r#"{"code":1000,"message":"bad"}"#
        );
    }
}
