//! Budget collection operations

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use tracing::{debug, info};

use super::SeaOrmStorage;
use super::converters::{budget_to_active_model, model_to_budget};
use super::retry;
use crate::errors::{BudgetlyError, Result};
use crate::storage::Budget;

use migration::entities::user_budget;

impl SeaOrmStorage {
    /// 等值查询 (user_id, month, year)，按分类排序
    pub async fn list_budgets(&self, user_id: &str, month: u32, year: i32) -> Result<Vec<Budget>> {
        let db = &self.db;

        let models = retry::with_retry("list_budgets", self.retry_config, || async {
            user_budget::Entity::find()
                .filter(user_budget::Column::UserId.eq(user_id))
                .filter(user_budget::Column::Month.eq(month as i32))
                .filter(user_budget::Column::Year.eq(year))
                .order_by_asc(user_budget::Column::Category)
                .all(db)
                .await
        })
        .await
        .map_err(|e| BudgetlyError::database_operation(format!("Failed to load budgets: {}", e)))?;

        debug!(
            "Loaded {} budgets for user {} ({}/{})",
            models.len(),
            user_id,
            month,
            year
        );
        Ok(models.into_iter().map(model_to_budget).collect())
    }

    pub async fn get_budget(&self, user_id: &str, id: &str) -> Result<Option<Budget>> {
        let db = &self.db;

        let model = retry::with_retry(&format!("get_budget({})", id), self.retry_config, || async {
            user_budget::Entity::find_by_id(id.to_string())
                .filter(user_budget::Column::UserId.eq(user_id))
                .one(db)
                .await
        })
        .await
        .map_err(|e| BudgetlyError::database_operation(format!("Failed to load budget: {}", e)))?;

        Ok(model.map(model_to_budget))
    }

    pub async fn insert_budget(&self, budget: &Budget) -> Result<()> {
        let db = &self.db;

        retry::with_retry(&format!("insert_budget({})", budget.id), self.retry_config, || async {
            user_budget::Entity::insert(budget_to_active_model(budget, true))
                .exec_without_returning(db)
                .await
        })
        .await
        .map_err(|e| BudgetlyError::database_operation(format!("Failed to add budget: {}", e)))?;

        info!(
            "Budget added: {} ({} {}/{})",
            budget.id, budget.category, budget.month, budget.year
        );
        Ok(())
    }

    pub async fn update_budget(&self, budget: &Budget) -> Result<()> {
        let db = &self.db;

        let result = retry::with_retry(&format!("update_budget({})", budget.id), self.retry_config, || async {
            user_budget::Entity::update_many()
                .set(budget_to_active_model(budget, false))
                .filter(user_budget::Column::Id.eq(budget.id.as_str()))
                .filter(user_budget::Column::UserId.eq(budget.user_id.as_str()))
                .exec(db)
                .await
        })
        .await
        .map_err(|e| BudgetlyError::database_operation(format!("Failed to update budget: {}", e)))?;

        if result.rows_affected == 0 {
            return Err(BudgetlyError::not_found(format!(
                "Budget not found: {}",
                budget.id
            )));
        }

        info!("Budget updated: {}", budget.id);
        Ok(())
    }

    pub async fn delete_budget(&self, user_id: &str, id: &str) -> Result<()> {
        let db = &self.db;

        let result = retry::with_retry(&format!("delete_budget({})", id), self.retry_config, || async {
            user_budget::Entity::delete_many()
                .filter(user_budget::Column::Id.eq(id))
                .filter(user_budget::Column::UserId.eq(user_id))
                .exec(db)
                .await
        })
        .await
        .map_err(|e| BudgetlyError::database_operation(format!("Failed to delete budget: {}", e)))?;

        if result.rows_affected == 0 {
            return Err(BudgetlyError::not_found(format!("Budget not found: {}", id)));
        }

        info!("Budget deleted: {}", id);
        Ok(())
    }
}
