use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::api::jwt::JwtService;
use crate::events::ChangeFeed;
use crate::services::AppServices;
use crate::storage::{SeaOrmStorage, StorageFactory};

pub struct StartupContext {
    pub storage: Arc<SeaOrmStorage>,
    pub services: AppServices,
}

/// 准备服务器启动的上下文
/// 包括存储、变更广播和各业务服务
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let config = crate::config::get_config();

    let storage = StorageFactory::create()
        .await
        .context("Failed to create storage backend")?;
    info!(
        "Using storage backend: {}",
        storage.get_backend_config().storage_type
    );

    if config.auth.jwt_secret.is_empty() {
        warn!("auth.jwt_secret is not set, using a random secret; tokens will not survive a restart");
    }
    let jwt = Arc::new(JwtService::from_config(&config.auth));

    let feed = ChangeFeed::new(config.events.channel_capacity);
    debug!(
        "Change feed initialized with capacity {}",
        config.events.channel_capacity
    );

    let services = AppServices::new(storage.clone(), feed, jwt);

    info!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );

    Ok(StartupContext { storage, services })
}
