//! Account and profile operations

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, SqlErr, sea_query::OnConflict};
use tracing::info;

use super::SeaOrmStorage;
use super::converters::{
    account_to_active_model, details_to_active_model, model_to_account, model_to_details,
};
use super::retry;
use crate::errors::{BudgetlyError, Result};
use crate::storage::{UserAccount, UserDetails};

use migration::entities::{user_account, user_details};

impl SeaOrmStorage {
    pub async fn find_account_by_email(&self, email: &str) -> Result<Option<UserAccount>> {
        let db = &self.db;

        let model = retry::with_retry("find_account_by_email", self.retry_config, || async {
            user_account::Entity::find()
                .filter(user_account::Column::Email.eq(email))
                .one(db)
                .await
        })
        .await
        .map_err(|e| BudgetlyError::database_operation(format!("Failed to load account: {}", e)))?;

        Ok(model.map(model_to_account))
    }

    pub async fn get_account(&self, id: &str) -> Result<Option<UserAccount>> {
        let db = &self.db;

        let model = retry::with_retry(&format!("get_account({})", id), self.retry_config, || async {
            user_account::Entity::find_by_id(id.to_string()).one(db).await
        })
        .await
        .map_err(|e| BudgetlyError::database_operation(format!("Failed to load account: {}", e)))?;

        Ok(model.map(model_to_account))
    }

    /// 邮箱由唯一索引保证；冲突时返回 Conflict
    pub async fn insert_account(&self, account: &UserAccount) -> Result<()> {
        let db = &self.db;
        retry::with_retry("insert_account", self.retry_config, || async {
            user_account::Entity::insert(account_to_active_model(account))
                .exec_without_returning(db)
                .await
        })
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => BudgetlyError::conflict(format!(
                "An account with email '{}' already exists",
                account.email
            )),
            _ => BudgetlyError::database_operation(format!("Failed to create account: {}", e)),
        })?;

        info!("Account created: {}", account.id);
        Ok(())
    }

    pub async fn update_account_password(&self, id: &str, password_hash: &str) -> Result<()> {
        use sea_orm::ActiveValue::Set;

        let db = &self.db;
        let result = retry::with_retry("update_account_password", self.retry_config, || async {
            user_account::Entity::update_many()
                .set(user_account::ActiveModel {
                    password_hash: Set(password_hash.to_string()),
                    ..Default::default()
                })
                .filter(user_account::Column::Id.eq(id))
                .exec(db)
                .await
        })
        .await
        .map_err(|e| BudgetlyError::database_operation(format!("Failed to update password: {}", e)))?;

        if result.rows_affected == 0 {
            return Err(BudgetlyError::not_found(format!("Account not found: {}", id)));
        }

        info!("Password updated for account {}", id);
        Ok(())
    }

    pub async fn get_user_details(&self, user_id: &str) -> Result<Option<UserDetails>> {
        let db = &self.db;

        let model = retry::with_retry(&format!("get_user_details({})", user_id), self.retry_config, || async {
            user_details::Entity::find_by_id(user_id.to_string())
                .one(db)
                .await
        })
        .await
        .map_err(|e| BudgetlyError::database_operation(format!("Failed to load profile: {}", e)))?;

        Ok(model.map(model_to_details))
    }

    /// 整条写入，已存在则覆盖（created_at 保留原值）
    pub async fn upsert_user_details(&self, details: &UserDetails) -> Result<()> {
        let db = &self.db;

        retry::with_retry(&format!("upsert_user_details({})", details.user_id), self.retry_config, || async {
            user_details::Entity::insert(details_to_active_model(details))
                .on_conflict(
                    OnConflict::column(user_details::Column::UserId)
                        .update_columns([
                            user_details::Column::FirstName,
                            user_details::Column::LastName,
                            user_details::Column::Email,
                            user_details::Column::PhoneNumber,
                            user_details::Column::Address,
                            user_details::Column::MonthlyBudget,
                            user_details::Column::PhotoUrl,
                            user_details::Column::UpdatedAt,
                        ])
                        .to_owned(),
                )
                .exec_without_returning(db)
                .await
        })
        .await
        .map_err(|e| BudgetlyError::database_operation(format!("Failed to save profile: {}", e)))?;

        info!("Profile saved for user {}", details.user_id);
        Ok(())
    }
}
