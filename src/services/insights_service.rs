use std::sync::Arc;

use chrono::{DateTime, Datelike, Utc};
use tracing::debug;

use crate::errors::Result;
use crate::ledger::{Insights, generate_insights};
use crate::storage::SeaOrmStorage;

#[derive(Clone)]
pub struct InsightsService {
    storage: Arc<SeaOrmStorage>,
}

impl InsightsService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    pub async fn insights(&self, user_id: &str) -> Result<Insights> {
        self.insights_at(user_id, Utc::now()).await
    }

    pub async fn insights_at(&self, user_id: &str, now: DateTime<Utc>) -> Result<Insights> {
        let txs = self.storage.list_transactions(user_id).await?;
        let budgets = self
            .storage
            .list_budgets(user_id, now.month(), now.year())
            .await?;

        debug!(
            "Generating insights for {} from {} transactions and {} budgets",
            user_id,
            txs.len(),
            budgets.len()
        );
        Ok(generate_insights(&txs, &budgets, now))
    }
}
