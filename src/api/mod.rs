//! HTTP API
//!
//! `/api/v1/...` JSON endpoints plus `/health` checks.

pub mod constants;
pub mod jwt;
pub mod middleware;
pub mod services;

use std::sync::Arc;

use actix_web::web;

use crate::services::AppServices;
use services::{AppStartTime, health_routes};

/// 注册全部路由和共享数据
///
/// 服务器和集成测试共用同一套装配。
pub fn configure(
    app_services: AppServices,
    start_time: AppStartTime,
) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        let jwt: Arc<jwt::JwtService> = app_services.auth.jwt_arc();
        cfg.app_data(web::Data::new(jwt))
            .app_data(web::Data::new(start_time))
            .app_data(web::Data::new(app_services))
            .app_data(services::v1::json_config())
            .app_data(services::v1::query_config())
            .service(health_routes())
            .service(web::scope(constants::API_PREFIX).service(services::v1::api_v1_routes()));
    }
}
