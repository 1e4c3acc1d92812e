//! `/health` 健康检查
//!
//! 直接探测数据库，不经过业务服务；`/health` 额外报告变更流的订阅数。

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, error, trace};

use crate::api::constants::HEALTH_PREFIX;
use crate::api::services::v1::{ApiResponse, ErrorCode};
use crate::services::AppServices;
use crate::storage::SeaOrmStorage;

const DATABASE_PING_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

#[derive(Serialize, Clone, Debug)]
pub struct DatabaseHealth {
    pub status: HealthStatus,
    pub backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize, Clone, Debug)]
pub struct ChangeFeedHealth {
    /// 当前打开的 budget watch / SSE 连接数
    pub subscribers: usize,
}

#[derive(Serialize, Clone, Debug)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub timestamp: String,
    pub uptime: u64,
    pub database: DatabaseHealth,
    pub change_feed: ChangeFeedHealth,
    pub response_time_ms: u64,
}

pub struct HealthService;

impl HealthService {
    async fn check_database(storage: &SeaOrmStorage) -> DatabaseHealth {
        let backend = storage.get_backend_config().storage_type;

        let error = match tokio::time::timeout(DATABASE_PING_TIMEOUT, storage.ping()).await {
            Ok(Ok(())) => None,
            Ok(Err(e)) => {
                error!("Database health check failed: {}", e);
                Some(e.to_string())
            }
            Err(_) => {
                error!("Database health check timed out after {:?}", DATABASE_PING_TIMEOUT);
                Some("timeout".to_string())
            }
        };

        DatabaseHealth {
            status: if error.is_none() {
                HealthStatus::Healthy
            } else {
                HealthStatus::Unhealthy
            },
            backend,
            error,
        }
    }

    pub async fn health_check(
        services: web::Data<AppServices>,
        app_start_time: web::Data<AppStartTime>,
    ) -> impl Responder {
        let started = Instant::now();
        let database = Self::check_database(&services.storage).await;
        let status = database.status;
        let now = chrono::Utc::now();
        let uptime = (now - app_start_time.start_datetime).num_seconds().max(0) as u64;

        let report = HealthReport {
            status,
            timestamp: now.to_rfc3339(),
            uptime,
            database,
            change_feed: ChangeFeedHealth {
                subscribers: services.feed.receiver_count(),
            },
            response_time_ms: started.elapsed().as_millis() as u64,
        };
        debug!("Health check: {:?} in {:?}", status, started.elapsed());

        let (http_status, code, message) = match status {
            HealthStatus::Healthy => (StatusCode::OK, ErrorCode::Success, "OK"),
            HealthStatus::Unhealthy => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorCode::ServiceUnavailable,
                "Service Unavailable",
            ),
        };

        HttpResponse::build(http_status).json(ApiResponse {
            code: code as i32,
            message: message.to_string(),
            data: Some(report),
        })
    }

    /// 数据库可达才算就绪
    pub async fn readiness_check(services: web::Data<AppServices>) -> impl Responder {
        trace!("Readiness check");
        match Self::check_database(&services.storage).await.status {
            HealthStatus::Healthy => HttpResponse::Ok().content_type("text/plain").body("OK"),
            HealthStatus::Unhealthy => HttpResponse::ServiceUnavailable()
                .content_type("text/plain")
                .body("Service Unavailable"),
        }
    }

    pub async fn liveness_check() -> impl Responder {
        HttpResponse::NoContent().finish()
    }
}

pub fn health_routes() -> actix_web::Scope {
    web::scope(HEALTH_PREFIX)
        .route("", web::get().to(HealthService::health_check))
        .route("/ready", web::get().to(HealthService::readiness_check))
        .route("/live", web::get().to(HealthService::liveness_check))
}
