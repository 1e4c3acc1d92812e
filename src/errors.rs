use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone)]
pub enum BudgetlyError {
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    FileOperation(String),
    Validation(String),
    NotFound(String),
    Serialization(String),
    DateParse(String),
    AuthFailed(String),
    TokenInvalid(String),
    Conflict(String),
    PasswordHash(String),
}

impl BudgetlyError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            BudgetlyError::DatabaseConfig(_) => "E001",
            BudgetlyError::DatabaseConnection(_) => "E002",
            BudgetlyError::DatabaseOperation(_) => "E003",
            BudgetlyError::FileOperation(_) => "E004",
            BudgetlyError::Validation(_) => "E005",
            BudgetlyError::NotFound(_) => "E006",
            BudgetlyError::Serialization(_) => "E007",
            BudgetlyError::DateParse(_) => "E008",
            BudgetlyError::AuthFailed(_) => "E009",
            BudgetlyError::TokenInvalid(_) => "E010",
            BudgetlyError::Conflict(_) => "E011",
            BudgetlyError::PasswordHash(_) => "E012",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            BudgetlyError::DatabaseConfig(_) => "Database Configuration Error",
            BudgetlyError::DatabaseConnection(_) => "Database Connection Error",
            BudgetlyError::DatabaseOperation(_) => "Database Operation Error",
            BudgetlyError::FileOperation(_) => "File Operation Error",
            BudgetlyError::Validation(_) => "Validation Error",
            BudgetlyError::NotFound(_) => "Resource Not Found",
            BudgetlyError::Serialization(_) => "Serialization Error",
            BudgetlyError::DateParse(_) => "Date Parse Error",
            BudgetlyError::AuthFailed(_) => "Authentication Failed",
            BudgetlyError::TokenInvalid(_) => "Invalid Token",
            BudgetlyError::Conflict(_) => "Conflict",
            BudgetlyError::PasswordHash(_) => "Password Hash Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            BudgetlyError::DatabaseConfig(msg)
            | BudgetlyError::DatabaseConnection(msg)
            | BudgetlyError::DatabaseOperation(msg)
            | BudgetlyError::FileOperation(msg)
            | BudgetlyError::Validation(msg)
            | BudgetlyError::NotFound(msg)
            | BudgetlyError::Serialization(msg)
            | BudgetlyError::DateParse(msg)
            | BudgetlyError::AuthFailed(msg)
            | BudgetlyError::TokenInvalid(msg)
            | BudgetlyError::Conflict(msg)
            | BudgetlyError::PasswordHash(msg) => msg,
        }
    }

    /// 映射到 HTTP 状态码
    pub fn http_status(&self) -> StatusCode {
        match self {
            BudgetlyError::Validation(_) | BudgetlyError::DateParse(_) => StatusCode::BAD_REQUEST,
            BudgetlyError::NotFound(_) => StatusCode::NOT_FOUND,
            BudgetlyError::AuthFailed(_) | BudgetlyError::TokenInvalid(_) => {
                StatusCode::UNAUTHORIZED
            }
            BudgetlyError::Conflict(_) => StatusCode::CONFLICT,
            BudgetlyError::DatabaseConfig(_)
            | BudgetlyError::DatabaseConnection(_)
            | BudgetlyError::DatabaseOperation(_)
            | BudgetlyError::FileOperation(_)
            | BudgetlyError::Serialization(_)
            | BudgetlyError::PasswordHash(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 是否属于调用方输入错误（日志降级为 warn）
    pub fn is_client_error(&self) -> bool {
        self.http_status().is_client_error()
    }

    /// 格式化为彩色输出（用于 Server 模式）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出（用于 CLI 模式）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for BudgetlyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for BudgetlyError {}

// 便捷的构造函数
impl BudgetlyError {
    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        BudgetlyError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        BudgetlyError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        BudgetlyError::DatabaseOperation(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        BudgetlyError::FileOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        BudgetlyError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        BudgetlyError::NotFound(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        BudgetlyError::Serialization(msg.into())
    }

    pub fn date_parse<T: Into<String>>(msg: T) -> Self {
        BudgetlyError::DateParse(msg.into())
    }

    pub fn auth_failed<T: Into<String>>(msg: T) -> Self {
        BudgetlyError::AuthFailed(msg.into())
    }

    pub fn token_invalid<T: Into<String>>(msg: T) -> Self {
        BudgetlyError::TokenInvalid(msg.into())
    }

    pub fn conflict<T: Into<String>>(msg: T) -> Self {
        BudgetlyError::Conflict(msg.into())
    }

    pub fn password_hash<T: Into<String>>(msg: T) -> Self {
        BudgetlyError::PasswordHash(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for BudgetlyError {
    fn from(err: sea_orm::DbErr) -> Self {
        BudgetlyError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for BudgetlyError {
    fn from(err: std::io::Error) -> Self {
        BudgetlyError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for BudgetlyError {
    fn from(err: serde_json::Error) -> Self {
        BudgetlyError::Serialization(err.to_string())
    }
}

impl From<csv::Error> for BudgetlyError {
    fn from(err: csv::Error) -> Self {
        BudgetlyError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for BudgetlyError {
    fn from(err: chrono::ParseError) -> Self {
        BudgetlyError::DateParse(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for BudgetlyError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        BudgetlyError::TokenInvalid(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BudgetlyError>;
