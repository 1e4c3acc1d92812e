//! 认证相关端点

use actix_governor::{Governor, GovernorConfigBuilder, KeyExtractor, SimpleKeyExtractionError};
use actix_web::dev::ServiceRequest;
use actix_web::{Responder, web};
use governor::middleware::NoOpMiddleware;
use tracing::debug;

use crate::api::middleware::AuthenticatedUser;
use crate::ledger::{SignInForm, SignUpForm};
use crate::services::{AppServices, display_name};

use super::error_code::ErrorDomain;
use super::helpers::{api_result, created_response, error_from_budgetly, success_response};
use super::types::{MeResponse, MessageResponse, RefreshRequest};

/// 基于连接 IP 的限流 key 提取器
#[derive(Clone, Copy)]
pub struct PeerIpKeyExtractor;

impl KeyExtractor for PeerIpKeyExtractor {
    type Key = String;
    type KeyExtractionError = SimpleKeyExtractionError<&'static str>;

    fn extract(&self, req: &ServiceRequest) -> Result<Self::Key, Self::KeyExtractionError> {
        // TCP peer address，无法伪造
        req.connection_info()
            .peer_addr()
            .map(str::to_string)
            .ok_or_else(|| SimpleKeyExtractionError::new("Unable to extract peer IP"))
    }
}

/// 创建登录限流器
///
/// 配置：每秒补充 1 个令牌，突发最多 5 次请求
/// 超限返回 HTTP 429 Too Many Requests
pub fn login_rate_limiter() -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let config = GovernorConfigBuilder::default()
        .seconds_per_request(1)
        .burst_size(5)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .expect("Invalid rate limit config");

    debug!("Login rate limiter created: 1 req/s, burst 5");
    Governor::new(&config)
}

pub async fn sign_up(
    services: web::Data<AppServices>,
    form: web::Json<SignUpForm>,
) -> impl Responder {
    match services.auth.sign_up(&form).await {
        Ok(session) => created_response(session),
        Err(e) => error_from_budgetly(&e, ErrorDomain::Auth),
    }
}

pub async fn login(
    services: web::Data<AppServices>,
    form: web::Json<SignInForm>,
) -> impl Responder {
    api_result(ErrorDomain::Auth, services.auth.sign_in(&form).await)
}

pub async fn refresh_token(
    services: web::Data<AppServices>,
    body: web::Json<RefreshRequest>,
) -> impl Responder {
    api_result(
        ErrorDomain::Auth,
        services.auth.refresh(&body.refresh_token).await,
    )
}

/// 无状态会话，客户端丢弃 token 即登出
pub async fn logout() -> impl Responder {
    success_response(MessageResponse {
        message: "Logged out".to_string(),
    })
}

pub async fn me(services: web::Data<AppServices>, user: AuthenticatedUser) -> impl Responder {
    let result = async {
        let account = services.auth.get_account(&user.user_id).await?;
        let details = services.users.get_user_details(&user.user_id).await?;
        Ok::<_, crate::errors::BudgetlyError>(MeResponse {
            display_name: display_name(details.as_ref(), Some(&account.email)),
            user_id: account.id,
            email: account.email,
        })
    }
    .await;

    api_result(ErrorDomain::Auth, result)
}
