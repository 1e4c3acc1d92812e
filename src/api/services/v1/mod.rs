//! REST API v1
//!
//! - 认证（注册、登录、刷新、登出）
//! - 交易 CRUD、汇总、导出、分类目录
//! - 预算 CRUD、概览、SSE 实时推送
//! - 用户资料
//! - 消费洞察

pub mod auth;
mod budgets;
pub mod error_code;
mod helpers;
mod insights;
mod profile;
pub mod routes;
mod transactions;
mod types;

// 重新导出类型
pub use types::*;

// 重新导出帮助函数
pub use helpers::{
    api_result, error_from_budgetly, error_response, json_config, query_config, success_response,
};

// 重新导出错误码
pub use error_code::{ErrorCode, ErrorDomain};

pub use routes::api_v1_routes;
