//! API 模块常量定义

/// REST API 前缀
pub const API_PREFIX: &str = "/api";

/// 健康检查路由前缀
pub const HEALTH_PREFIX: &str = "/health";

/// Authorization header 前缀
pub const BEARER_PREFIX: &str = "Bearer ";

/// SSE 响应类型
pub const EVENT_STREAM: &str = "text/event-stream";
