//! API 帮助函数

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, error::InternalError, web};
use serde::Serialize;
use tracing::{debug, error};

use crate::errors::BudgetlyError;

use super::error_code::{ErrorCode, ErrorDomain};
use super::types::ApiResponse;

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
    data: Option<T>,
) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code: code as i32,
            message: message.into(),
            data,
        })
}

/// 构建成功响应
pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::OK, ErrorCode::Success, "OK", Some(data))
}

pub fn created_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::CREATED, ErrorCode::Success, "Created", Some(data))
}

/// 构建错误响应
pub fn error_response(status: StatusCode, error_code: ErrorCode, message: &str) -> HttpResponse {
    json_response::<()>(status, error_code, message, None)
}

/// 从 BudgetlyError 构建错误响应（自动映射 HTTP 状态码和 ErrorCode）
///
/// 服务端错误记 error 日志，客户端错误只记 debug。
pub fn error_from_budgetly(err: &BudgetlyError, domain: ErrorDomain) -> HttpResponse {
    if err.is_client_error() {
        debug!("Request rejected: {}", err);
    } else {
        error!("Request failed: {}", err);
    }
    let status = err.http_status();
    let error_code = ErrorCode::for_error(err, domain);
    error_response(status, error_code, err.message())
}

/// 统一 Result → HttpResponse 转换
///
/// 成功时返回 200 OK + JSON 数据，失败时自动映射 BudgetlyError。
pub fn api_result<T, E>(domain: ErrorDomain, result: Result<T, E>) -> HttpResponse
where
    T: Serialize,
    E: Into<BudgetlyError>,
{
    match result {
        Ok(data) => success_response(data),
        Err(e) => error_from_budgetly(&e.into(), domain),
    }
}

/// JSON 请求体解析失败也返回统一格式
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(|err, _req| {
            let message = format!("Invalid request body: {}", err);
            debug!("{}", message);
            let response = error_response(StatusCode::BAD_REQUEST, ErrorCode::BadRequest, &message);
            InternalError::from_response(err, response).into()
        })
}

/// 查询串解析失败同上
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let message = format!("Invalid query: {}", err);
        debug!("{}", message);
        let response = error_response(StatusCode::BAD_REQUEST, ErrorCode::BadRequest, &message);
        InternalError::from_response(err, response).into()
    })
}
