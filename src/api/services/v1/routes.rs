//! API v1 路由配置
//!
//! 将 /v1 下的路由按功能模块拆分。除认证入口外都要求 Bearer token。

use actix_web::web;

use crate::api::middleware::UserAuth;

use super::auth::{login, login_rate_limiter, logout, me, refresh_token, sign_up};
use super::budgets::{
    budget_overview, budget_stream, delete_budget, get_budget, get_budgets, post_budget,
    update_budget,
};
use super::insights::get_insights;
use super::profile::{change_password, get_profile, update_profile};
use super::transactions::{
    delete_transaction, export_transactions, get_categories, get_transaction, get_transactions,
    post_transaction, transactions_summary, update_transaction,
};

/// 认证路由 `/auth`
///
/// - POST /auth/signup - 注册
/// - POST /auth/login - 登录（带限流）
/// - POST /auth/refresh - 刷新 token
/// - POST /auth/logout - 登出
/// - GET /auth/me - 当前用户（需认证）
pub fn auth_routes() -> actix_web::Scope {
    web::scope("/auth")
        .route("/signup", web::post().to(sign_up))
        .route("/login", web::post().to(login).wrap(login_rate_limiter()))
        .route("/refresh", web::post().to(refresh_token))
        .route("/logout", web::post().to(logout))
        .route("/me", web::get().to(me).wrap(UserAuth))
}

/// 交易路由 `/transactions`
pub fn transactions_routes() -> actix_web::Scope {
    web::scope("/transactions")
        .route("", web::get().to(get_transactions))
        .route("", web::post().to(post_transaction))
        // 固定路径必须在 /{id} 之前
        .route("/summary", web::get().to(transactions_summary))
        .route("/export", web::get().to(export_transactions))
        .route("/{id}", web::get().to(get_transaction))
        .route("/{id}", web::put().to(update_transaction))
        .route("/{id}", web::delete().to(delete_transaction))
}

/// 分类目录 `/categories`
pub fn categories_routes() -> actix_web::Scope {
    web::scope("/categories")
        .route("", web::get().to(get_categories))
}

/// 预算路由 `/budgets`
pub fn budgets_routes() -> actix_web::Scope {
    web::scope("/budgets")
        .route("", web::get().to(get_budgets))
        .route("", web::post().to(post_budget))
        .route("/overview", web::get().to(budget_overview))
        .route("/stream", web::get().to(budget_stream))
        .route("/{id}", web::get().to(get_budget))
        .route("/{id}", web::put().to(update_budget))
        .route("/{id}", web::delete().to(delete_budget))
}

/// 用户资料路由 `/profile`
pub fn profile_routes() -> actix_web::Scope {
    web::scope("/profile")
        .route("", web::get().to(get_profile))
        .route("", web::put().to(update_profile))
        .route("/password", web::put().to(change_password))
}

pub fn insights_routes() -> actix_web::Scope {
    web::scope("/insights")
        .route("", web::get().to(get_insights))
}

/// API v1 路由，组合所有子模块
///
/// `/auth` 先注册且不经过认证中间件；其余模块放在同一个空前缀 scope 下统一鉴权。
pub fn api_v1_routes() -> actix_web::Scope {
    web::scope("/v1").service(auth_routes()).service(
        web::scope("")
            .wrap(UserAuth)
            .service(transactions_routes())
            .service(categories_routes())
            .service(budgets_routes())
            .service(profile_routes())
            .service(insights_routes()),
    )
}
