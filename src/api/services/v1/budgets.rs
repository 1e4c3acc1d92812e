//! 预算端点，包括 SSE 实时推送

use actix_web::{HttpResponse, Responder, web};
use bytes::Bytes;
use futures_util::stream;
use serde_json::json;
use std::time::Duration;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::info;

use crate::api::constants;
use crate::api::middleware::AuthenticatedUser;
use crate::config::get_config;
use crate::errors::BudgetlyError;
use crate::ledger::{BudgetForm, BudgetOverview};
use crate::services::{AppServices, BudgetPatch};

use super::error_code::{ErrorCode, ErrorDomain};
use super::helpers::{api_result, created_response, error_from_budgetly};
use super::types::MonthQuery;

const DOMAIN: ErrorDomain = ErrorDomain::Budget;

/// GET /budgets?month=&year=
pub async fn get_budgets(
    services: web::Data<AppServices>,
    user: AuthenticatedUser,
    query: web::Query<MonthQuery>,
) -> impl Responder {
    let (month, year) = query.resolve();
    api_result(
        DOMAIN,
        services.budgets.get_budgets(&user.user_id, month, year).await,
    )
}

pub async fn get_budget(
    services: web::Data<AppServices>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> impl Responder {
    api_result(DOMAIN, services.budgets.get_budget(&user.user_id, &path).await)
}

pub async fn post_budget(
    services: web::Data<AppServices>,
    user: AuthenticatedUser,
    form: web::Json<BudgetForm>,
) -> impl Responder {
    match services.budgets.add_budget(&user.user_id, &form).await {
        Ok(budget) => created_response(budget),
        Err(e) => error_from_budgetly(&e, DOMAIN),
    }
}

pub async fn update_budget(
    services: web::Data<AppServices>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    patch: web::Json<BudgetPatch>,
) -> impl Responder {
    api_result(
        DOMAIN,
        services
            .budgets
            .update_budget(&user.user_id, &path, patch.into_inner())
            .await,
    )
}

pub async fn delete_budget(
    services: web::Data<AppServices>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> impl Responder {
    let id = path.into_inner();
    api_result(
        DOMAIN,
        services
            .budgets
            .delete_budget(&user.user_id, &id)
            .await
            .map(|_| json!({ "id": id })),
    )
}

/// GET /budgets/overview?month=&year=
pub async fn budget_overview(
    services: web::Data<AppServices>,
    user: AuthenticatedUser,
    query: web::Query<MonthQuery>,
) -> impl Responder {
    let (month, year) = query.resolve();
    api_result(
        DOMAIN,
        services.budgets.overview(&user.user_id, month, year).await,
    )
}

/// SSE 注释帧，客户端忽略；写失败时 actix 才会发现连接已断开
const KEEP_ALIVE_FRAME: &[u8] = b": keep-alive\n\n";

/// 单个 SSE 帧
fn sse_frame(result: Result<BudgetOverview, BudgetlyError>) -> Bytes {
    let (event, payload) = match result {
        Ok(overview) => ("budgets", serde_json::to_string(&overview)),
        Err(e) => (
            "error",
            serde_json::to_string(&json!({
                "code": ErrorCode::for_error(&e, DOMAIN) as i32,
                "message": e.message(),
            })),
        ),
    };
    let data = payload.unwrap_or_else(|e| format!(r#"{{"message":"{}"}}"#, e));
    Bytes::from(format!("event: {}\ndata: {}\n\n", event, data))
}

/// GET /budgets/stream?month=&year=
///
/// 每个快照一个 `data:` 帧，空闲时按 `events.keep_alive_secs` 发送心跳，
/// 连接断开即取消订阅。
pub async fn budget_stream(
    services: web::Data<AppServices>,
    user: AuthenticatedUser,
    query: web::Query<MonthQuery>,
) -> impl Responder {
    let (month, year) = query.resolve();
    let watch = match services.budgets.watch(&user.user_id, month, year) {
        Ok(watch) => watch,
        Err(e) => return error_from_budgetly(&e, DOMAIN),
    };
    info!("SSE budget stream opened for user {}", user.user_id);

    let period = Duration::from_secs(get_config().events.keep_alive_secs.max(1));
    let mut keep_alive = time::interval_at(Instant::now() + period, period);
    keep_alive.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let frames = stream::unfold(
        (watch, keep_alive),
        move |(mut watch, mut keep_alive)| async move {
            let frame = tokio::select! {
                snapshot = watch.next() => {
                    sse_frame(snapshot?.map(|budgets| BudgetOverview::new(month, year, budgets)))
                }
                _ = keep_alive.tick() => Bytes::from_static(KEEP_ALIVE_FRAME),
            };
            Some((Ok::<_, actix_web::Error>(frame), (watch, keep_alive)))
        },
    );

    HttpResponse::Ok()
        .content_type(constants::EVENT_STREAM)
        .insert_header(("Cache-Control", "no-cache"))
        .insert_header(("X-Accel-Buffering", "no"))
        .streaming(frames)
}
