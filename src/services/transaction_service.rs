//! Transaction management service
//!
//! CRUD over the user's transactions plus the aggregation entry points.
//! Every mutation publishes a [`LedgerEvent`] so live budget views refresh.

use std::io::Write;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error, info};

use crate::errors::{BudgetlyError, Result};
use crate::events::{ChangeFeed, LedgerEvent, LedgerEventKind};
use crate::ledger::{
    CategorySpend, Period, Totals, TransactionFilter, TransactionForm, category_breakdown,
    category_name, filter_period, totals,
};
use crate::storage::{SeaOrmStorage, Transaction, TransactionType};

/// 周期汇总
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionSummary {
    pub period: Period,
    /// 周期内
    pub totals: Totals,
    /// 全部时间
    pub all_time: Totals,
    pub expense_categories: Vec<CategorySpend>,
    pub income_categories: Vec<CategorySpend>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    id: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
    amount: f64,
    description: &'a str,
    category: &'a str,
    category_name: &'a str,
    timestamp: String,
    created_at: String,
}

#[derive(Clone)]
pub struct TransactionService {
    storage: Arc<SeaOrmStorage>,
    feed: ChangeFeed,
}

impl TransactionService {
    pub fn new(storage: Arc<SeaOrmStorage>, feed: ChangeFeed) -> Self {
        Self { storage, feed }
    }

    /// 按 timestamp 倒序
    pub async fn get_transactions(&self, user_id: &str) -> Result<Vec<Transaction>> {
        self.storage.list_transactions(user_id).await
    }

    pub async fn get_transaction(&self, user_id: &str, id: &str) -> Result<Transaction> {
        self.storage
            .get_transaction(user_id, id)
            .await?
            .ok_or_else(|| BudgetlyError::not_found(format!("Transaction '{}' not found", id)))
    }

    pub async fn list_filtered(
        &self,
        user_id: &str,
        filter: &TransactionFilter,
        now: DateTime<Utc>,
    ) -> Result<Vec<Transaction>> {
        let txs = self.get_transactions(user_id).await?;
        Ok(txs.into_iter().filter(|tx| filter.matches(tx, now)).collect())
    }

    pub async fn add_transaction(&self, user_id: &str, form: &TransactionForm) -> Result<Transaction> {
        let valid = form.validate()?;
        let now = Utc::now();

        let tx = Transaction {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            kind: valid.kind,
            amount: valid.amount,
            description: valid.description,
            category: valid.category,
            timestamp: valid.timestamp.unwrap_or(now),
            created_at: now,
        };

        self.storage.insert_transaction(&tx).await.inspect_err(|e| {
            error!("Failed to add transaction for user {}: {}", user_id, e);
        })?;

        self.publish(user_id, LedgerEventKind::TransactionAdded);
        Ok(tx)
    }

    /// 整体替换 type/amount/description/category/timestamp
    ///
    /// 表单没有 timestamp 时保留原值。
    pub async fn update_transaction(
        &self,
        user_id: &str,
        id: &str,
        form: &TransactionForm,
    ) -> Result<Transaction> {
        let valid = form.validate()?;
        let existing = self.get_transaction(user_id, id).await?;

        let tx = Transaction {
            kind: valid.kind,
            amount: valid.amount,
            description: valid.description,
            category: valid.category,
            timestamp: valid.timestamp.unwrap_or(existing.timestamp),
            ..existing
        };

        self.storage.update_transaction(&tx).await.inspect_err(|e| {
            error!("Failed to update transaction {}: {}", id, e);
        })?;

        self.publish(user_id, LedgerEventKind::TransactionUpdated);
        Ok(tx)
    }

    pub async fn delete_transaction(&self, user_id: &str, id: &str) -> Result<()> {
        self.storage.delete_transaction(user_id, id).await?;
        self.publish(user_id, LedgerEventKind::TransactionDeleted);
        Ok(())
    }

    pub async fn summary(&self, user_id: &str, period: Period) -> Result<TransactionSummary> {
        self.summary_at(user_id, period, Utc::now()).await
    }

    pub async fn summary_at(
        &self,
        user_id: &str,
        period: Period,
        now: DateTime<Utc>,
    ) -> Result<TransactionSummary> {
        let txs = self.get_transactions(user_id).await?;
        Ok(summarize(&txs, period, now))
    }

    /// 导出为 CSV，返回写出的行数
    pub async fn export_csv<W: Write>(&self, user_id: &str, writer: W) -> Result<usize> {
        let txs = self.get_transactions(user_id).await?;
        let count = write_csv(&txs, writer)?;
        info!("Exported {} transactions for user {}", count, user_id);
        Ok(count)
    }

    fn publish(&self, user_id: &str, kind: LedgerEventKind) {
        self.feed.publish(LedgerEvent::new(user_id, kind));
    }
}

pub fn summarize(txs: &[Transaction], period: Period, now: DateTime<Utc>) -> TransactionSummary {
    let in_period = filter_period(txs, period, now);
    debug!(
        "Summarizing {} of {} transactions for period {}",
        in_period.len(),
        txs.len(),
        period
    );

    TransactionSummary {
        period,
        totals: totals(in_period.iter().copied()),
        all_time: totals(txs),
        expense_categories: category_breakdown(in_period.iter().copied(), TransactionType::Expense),
        income_categories: category_breakdown(in_period.iter().copied(), TransactionType::Income),
        count: in_period.len(),
    }
}

pub fn write_csv<W: Write>(txs: &[Transaction], writer: W) -> Result<usize> {
    let mut wtr = csv::Writer::from_writer(writer);
    for tx in txs {
        wtr.serialize(CsvRow {
            id: &tx.id,
            kind: tx.kind.as_ref(),
            amount: tx.amount,
            description: &tx.description,
            category: &tx.category,
            category_name: category_name(&tx.category),
            timestamp: tx.timestamp.to_rfc3339(),
            created_at: tx.created_at.to_rfc3339(),
        })?;
    }
    wtr.flush()?;
    Ok(txs.len())
}
