//! Service layer for business logic
//!
//! Shared by the HTTP API and the CLI. Services own no state beyond the
//! storage handle and the change feed, so they are cheap to clone.

mod auth_service;
mod budget_service;
mod insights_service;
mod transaction_service;
mod user_service;

use std::sync::Arc;

use crate::api::jwt::JwtService;
use crate::events::ChangeFeed;
use crate::storage::SeaOrmStorage;

pub use auth_service::*;
pub use budget_service::*;
pub use insights_service::*;
pub use transaction_service::*;
pub use user_service::*;

/// 所有服务的集合，由启动流程构建并注入到 HTTP 层
#[derive(Clone)]
pub struct AppServices {
    pub storage: Arc<SeaOrmStorage>,
    pub feed: ChangeFeed,
    pub auth: AuthService,
    pub users: UserService,
    pub transactions: TransactionService,
    pub budgets: BudgetService,
    pub insights: InsightsService,
}

impl AppServices {
    pub fn new(storage: Arc<SeaOrmStorage>, feed: ChangeFeed, jwt: Arc<JwtService>) -> Self {
        Self {
            auth: AuthService::new(storage.clone(), jwt),
            users: UserService::new(storage.clone()),
            transactions: TransactionService::new(storage.clone(), feed.clone()),
            budgets: BudgetService::new(storage.clone(), feed.clone()),
            insights: InsightsService::new(storage.clone()),
            storage,
            feed,
        }
    }
}
