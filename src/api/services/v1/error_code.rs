//! 统一 API 错误码定义

use jsonwebtoken::errors::ErrorKind;
use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::errors::BudgetlyError;

/// API 错误码枚举
///
/// 使用 serde_repr 序列化为数字。按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 2000-2099: 认证错误
/// - 3000-3099: 交易错误
/// - 4000-4099: 预算错误
/// - 5000-5099: 用户资料错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(i32)]
pub enum ErrorCode {
    // 成功
    Success = 0,

    // 通用错误 1000-1099
    BadRequest = 1000,
    Unauthorized = 1001,
    NotFound = 1004,
    InternalServerError = 1005,
    Conflict = 1009,
    InvalidDateFormat = 1012,
    ServiceUnavailable = 1030,

    // 认证错误 2000-2099
    AuthFailed = 2000,
    TokenExpired = 2001,
    TokenInvalid = 2002,
    EmailAlreadyRegistered = 2005,
    PasswordHashError = 2006,

    // 交易错误 3000-3099
    TransactionNotFound = 3000,
    TransactionInvalid = 3001,
    TransactionDatabaseError = 3002,

    // 预算错误 4000-4099
    BudgetNotFound = 4000,
    BudgetInvalid = 4001,
    BudgetDatabaseError = 4002,

    // 用户资料错误 5000-5099
    ProfileNotFound = 5000,
    ProfileInvalid = 5001,
}

/// 错误发生的业务域，决定 NotFound / 校验失败等映射到哪个号段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorDomain {
    General,
    Auth,
    Transaction,
    Budget,
    Profile,
}

impl ErrorCode {
    pub fn for_error(err: &BudgetlyError, domain: ErrorDomain) -> Self {
        use ErrorDomain as D;

        match (err, domain) {
            (BudgetlyError::NotFound(_), D::Transaction) => ErrorCode::TransactionNotFound,
            (BudgetlyError::NotFound(_), D::Budget) => ErrorCode::BudgetNotFound,
            (BudgetlyError::NotFound(_), D::Profile) => ErrorCode::ProfileNotFound,
            (BudgetlyError::Validation(_), D::Transaction) => ErrorCode::TransactionInvalid,
            (BudgetlyError::Validation(_), D::Budget) => ErrorCode::BudgetInvalid,
            (BudgetlyError::Validation(_), D::Profile) => ErrorCode::ProfileInvalid,
            (BudgetlyError::DatabaseOperation(_), D::Transaction) => {
                ErrorCode::TransactionDatabaseError
            }
            (BudgetlyError::DatabaseOperation(_), D::Budget) => ErrorCode::BudgetDatabaseError,
            (BudgetlyError::Conflict(_), D::Auth) => ErrorCode::EmailAlreadyRegistered,
            _ => ErrorCode::from(err),
        }
    }

    pub fn from_jwt_error(err: &jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => ErrorCode::TokenExpired,
            _ => ErrorCode::TokenInvalid,
        }
    }
}

impl From<&BudgetlyError> for ErrorCode {
    fn from(err: &BudgetlyError) -> Self {
        match err {
            BudgetlyError::Validation(_) => ErrorCode::BadRequest,
            BudgetlyError::NotFound(_) => ErrorCode::NotFound,
            BudgetlyError::DateParse(_) => ErrorCode::InvalidDateFormat,
            BudgetlyError::AuthFailed(_) => ErrorCode::AuthFailed,
            BudgetlyError::TokenInvalid(_) => ErrorCode::TokenInvalid,
            BudgetlyError::Conflict(_) => ErrorCode::Conflict,
            BudgetlyError::PasswordHash(_) => ErrorCode::PasswordHashError,
            BudgetlyError::DatabaseConnection(_) => ErrorCode::ServiceUnavailable,
            BudgetlyError::DatabaseConfig(_)
            | BudgetlyError::DatabaseOperation(_)
            | BudgetlyError::FileOperation(_)
            | BudgetlyError::Serialization(_) => ErrorCode::InternalServerError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_number() {
        assert_eq!(serde_json::to_string(&ErrorCode::Success).unwrap(), "0");
        assert_eq!(
            serde_json::to_string(&ErrorCode::BudgetNotFound).unwrap(),
            "4000"
        );
        let code: ErrorCode = serde_json::from_str("3001").unwrap();
        assert_eq!(code, ErrorCode::TransactionInvalid);
    }

    #[test]
    fn test_domain_specific_mapping() {
        let missing = BudgetlyError::not_found("x");
        assert_eq!(
            ErrorCode::for_error(&missing, ErrorDomain::Transaction),
            ErrorCode::TransactionNotFound
        );
        assert_eq!(
            ErrorCode::for_error(&missing, ErrorDomain::Profile),
            ErrorCode::ProfileNotFound
        );
        assert_eq!(
            ErrorCode::for_error(&missing, ErrorDomain::General),
            ErrorCode::NotFound
        );

        let dup = BudgetlyError::conflict("dup");
        assert_eq!(
            ErrorCode::for_error(&dup, ErrorDomain::Auth),
            ErrorCode::EmailAlreadyRegistered
        );
        assert_eq!(
            ErrorCode::for_error(&BudgetlyError::auth_failed("no"), ErrorDomain::Budget),
            ErrorCode::AuthFailed
        );
    }

    #[test]
    fn test_jwt_error_mapping() {
        let expired = jsonwebtoken::errors::Error::from(ErrorKind::ExpiredSignature);
        assert_eq!(ErrorCode::from_jwt_error(&expired), ErrorCode::TokenExpired);
        let bad = jsonwebtoken::errors::Error::from(ErrorKind::InvalidToken);
        assert_eq!(ErrorCode::from_jwt_error(&bad), ErrorCode::TokenInvalid);
    }
}
