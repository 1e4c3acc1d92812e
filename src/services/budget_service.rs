//! Budget management service
//!
//! Budgets are stored without their `spent` value; every read loads the
//! user's transactions and recomputes it.

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, error, info};

use crate::errors::{BudgetlyError, Result};
use crate::events::{ChangeFeed, LedgerEvent, LedgerEventKind};
use crate::ledger::validation::validate_period;
use crate::ledger::{AmountInput, BudgetForm, BudgetOverview, apply_spent, spent_for};
use crate::storage::{Budget, SeaOrmStorage};

/// 部分更新，缺省字段保持原值
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BudgetPatch {
    pub category: Option<String>,
    pub amount: Option<AmountInput>,
    pub month: Option<u32>,
    pub year: Option<i32>,
}

#[derive(Clone)]
pub struct BudgetService {
    storage: Arc<SeaOrmStorage>,
    feed: ChangeFeed,
}

impl BudgetService {
    pub fn new(storage: Arc<SeaOrmStorage>, feed: ChangeFeed) -> Self {
        Self { storage, feed }
    }

    /// 某用户某月的预算，spent 已按交易重新计算
    pub async fn get_budgets(&self, user_id: &str, month: u32, year: i32) -> Result<Vec<Budget>> {
        validate_period(month, year)?;

        let mut budgets = self.storage.list_budgets(user_id, month, year).await?;
        if budgets.is_empty() {
            return Ok(budgets);
        }
        let txs = self.storage.list_transactions(user_id).await?;
        apply_spent(&mut budgets, &txs);

        debug!(
            "Loaded {} budgets for user {} ({}/{})",
            budgets.len(),
            user_id,
            month,
            year
        );
        Ok(budgets)
    }

    pub async fn get_budget(&self, user_id: &str, id: &str) -> Result<Budget> {
        let mut budget = self
            .storage
            .get_budget(user_id, id)
            .await?
            .ok_or_else(|| BudgetlyError::not_found(format!("Budget '{}' not found", id)))?;
        self.fill_spent(&mut budget).await?;
        Ok(budget)
    }

    pub async fn add_budget(&self, user_id: &str, form: &BudgetForm) -> Result<Budget> {
        let amount = form.validate()?;
        let now = Utc::now();

        let budget = Budget {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            category: form.category.trim().to_string(),
            amount,
            spent: 0.0,
            month: form.month,
            year: form.year,
            created_at: now,
            updated_at: now,
        };

        self.storage.insert_budget(&budget).await.inspect_err(|e| {
            error!("Failed to add budget for user {}: {}", user_id, e);
        })?;

        self.publish(user_id);
        Ok(budget)
    }

    pub async fn update_budget(&self, user_id: &str, id: &str, patch: BudgetPatch) -> Result<Budget> {
        let existing = self
            .storage
            .get_budget(user_id, id)
            .await?
            .ok_or_else(|| BudgetlyError::not_found(format!("Budget '{}' not found", id)))?;

        let merged = BudgetForm {
            category: patch.category.unwrap_or_else(|| existing.category.clone()),
            amount: patch.amount.unwrap_or(AmountInput::Number(existing.amount)),
            month: patch.month.unwrap_or(existing.month),
            year: patch.year.unwrap_or(existing.year),
        };
        let amount = merged.validate()?;

        let mut budget = Budget {
            category: merged.category.trim().to_string(),
            amount,
            month: merged.month,
            year: merged.year,
            updated_at: Utc::now(),
            ..existing
        };

        self.storage.update_budget(&budget).await.inspect_err(|e| {
            error!("Failed to update budget {}: {}", id, e);
        })?;

        self.publish(user_id);
        self.fill_spent(&mut budget).await?;
        Ok(budget)
    }

    pub async fn delete_budget(&self, user_id: &str, id: &str) -> Result<()> {
        self.storage.delete_budget(user_id, id).await?;
        self.publish(user_id);
        Ok(())
    }

    pub async fn overview(&self, user_id: &str, month: u32, year: i32) -> Result<BudgetOverview> {
        let budgets = self.get_budgets(user_id, month, year).await?;
        Ok(BudgetOverview::new(month, year, budgets))
    }

    /// 订阅某用户某月预算的实时快照
    ///
    /// 先订阅再取首个快照，订阅与首次读取之间的写入不会丢失。
    pub fn watch(&self, user_id: &str, month: u32, year: i32) -> Result<BudgetWatch> {
        validate_period(month, year)?;
        let rx = self.feed.subscribe();
        info!("Budget watch opened for user {} ({}/{})", user_id, month, year);

        Ok(BudgetWatch {
            service: self.clone(),
            user_id: user_id.to_string(),
            month,
            year,
            rx,
            dirty: true,
        })
    }

    async fn fill_spent(&self, budget: &mut Budget) -> Result<()> {
        let txs = self.storage.list_transactions(&budget.user_id).await?;
        budget.spent = spent_for(budget, &txs);
        Ok(())
    }

    fn publish(&self, user_id: &str) {
        self.feed
            .publish(LedgerEvent::new(user_id, LedgerEventKind::BudgetChanged));
    }
}

/// 预算实时视图
///
/// 第一次 `next` 返回当前快照，之后每当该用户有变更就返回新快照。
/// 落后于广播时直接重新计算；广播关闭时返回 `None`。drop 即取消订阅。
///
/// `next` 可以在 `select!` 中被取消：待处理的变更会保留到下一次调用。
pub struct BudgetWatch {
    service: BudgetService,
    user_id: String,
    month: u32,
    year: i32,
    rx: broadcast::Receiver<LedgerEvent>,
    /// 有尚未交付的快照
    dirty: bool,
}

impl BudgetWatch {
    pub async fn next(&mut self) -> Option<Result<Vec<Budget>>> {
        while !self.dirty {
            match self.rx.recv().await {
                Ok(event) if event.user_id == self.user_id => {
                    debug!("Budget watch for {} woke on {:?}", self.user_id, event.kind);
                    self.dirty = true;
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    debug!(
                        "Budget watch for {} lagged by {} events, recomputing",
                        self.user_id, skipped
                    );
                    self.dirty = true;
                }
                Err(RecvError::Closed) => return None,
            }
        }

        let snapshot = self.snapshot().await;
        self.dirty = false;
        Some(snapshot)
    }

    async fn snapshot(&self) -> Result<Vec<Budget>> {
        self.service
            .get_budgets(&self.user_id, self.month, self.year)
            .await
            .inspect_err(|e| error!("Budget watch snapshot failed for {}: {}", self.user_id, e))
    }
}

impl Drop for BudgetWatch {
    fn drop(&mut self) {
        debug!("Budget watch closed for user {}", self.user_id);
    }
}
