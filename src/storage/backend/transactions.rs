//! Transaction collection operations

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use tracing::{debug, info};

use super::SeaOrmStorage;
use super::converters::{model_to_transaction, transaction_to_active_model};
use super::retry;
use crate::errors::{BudgetlyError, Result};
use crate::storage::Transaction;

use migration::entities::transaction;

impl SeaOrmStorage {
    /// 某用户全部交易，按 timestamp 倒序
    pub async fn list_transactions(&self, user_id: &str) -> Result<Vec<Transaction>> {
        let db = &self.db;

        let models = retry::with_retry("list_transactions", self.retry_config, || async {
            transaction::Entity::find()
                .filter(transaction::Column::UserId.eq(user_id))
                .order_by_desc(transaction::Column::Timestamp)
                .order_by_desc(transaction::Column::CreatedAt)
                .all(db)
                .await
        })
        .await
        .map_err(|e| BudgetlyError::database_operation(format!("Failed to load transactions: {}", e)))?;

        debug!("Loaded {} transactions for user {}", models.len(), user_id);
        Ok(models.into_iter().map(model_to_transaction).collect())
    }

    pub async fn get_transaction(&self, user_id: &str, id: &str) -> Result<Option<Transaction>> {
        let db = &self.db;

        let model = retry::with_retry(&format!("get_transaction({})", id), self.retry_config, || async {
            transaction::Entity::find_by_id(id.to_string())
                .filter(transaction::Column::UserId.eq(user_id))
                .one(db)
                .await
        })
        .await
        .map_err(|e| BudgetlyError::database_operation(format!("Failed to load transaction: {}", e)))?;

        Ok(model.map(model_to_transaction))
    }

    pub async fn insert_transaction(&self, tx: &Transaction) -> Result<()> {
        let db = &self.db;

        retry::with_retry(&format!("insert_transaction({})", tx.id), self.retry_config, || async {
            transaction::Entity::insert(transaction_to_active_model(tx, true))
                .exec_without_returning(db)
                .await
        })
        .await
        .map_err(|e| BudgetlyError::database_operation(format!("Failed to add transaction: {}", e)))?;

        info!("Transaction added: {} ({} {})", tx.id, tx.kind, tx.amount);
        Ok(())
    }

    /// 覆盖写除 created_at 外的所有字段；不属于该用户时返回 NotFound
    pub async fn update_transaction(&self, tx: &Transaction) -> Result<()> {
        let db = &self.db;

        let result = retry::with_retry(&format!("update_transaction({})", tx.id), self.retry_config, || async {
            transaction::Entity::update_many()
                .set(transaction_to_active_model(tx, false))
                .filter(transaction::Column::Id.eq(tx.id.as_str()))
                .filter(transaction::Column::UserId.eq(tx.user_id.as_str()))
                .exec(db)
                .await
        })
        .await
        .map_err(|e| BudgetlyError::database_operation(format!("Failed to update transaction: {}", e)))?;

        if result.rows_affected == 0 {
            return Err(BudgetlyError::not_found(format!(
                "Transaction not found: {}",
                tx.id
            )));
        }

        info!("Transaction updated: {}", tx.id);
        Ok(())
    }

    pub async fn delete_transaction(&self, user_id: &str, id: &str) -> Result<()> {
        let db = &self.db;

        let result = retry::with_retry(&format!("delete_transaction({})", id), self.retry_config, || async {
            transaction::Entity::delete_many()
                .filter(transaction::Column::Id.eq(id))
                .filter(transaction::Column::UserId.eq(user_id))
                .exec(db)
                .await
        })
        .await
        .map_err(|e| BudgetlyError::database_operation(format!("Failed to delete transaction: {}", e)))?;

        if result.rows_affected == 0 {
            return Err(BudgetlyError::not_found(format!(
                "Transaction not found: {}",
                id
            )));
        }

        info!("Transaction deleted: {}", id);
        Ok(())
    }
}
