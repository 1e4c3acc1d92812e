use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 交易列表按 user_id 过滤、timestamp 倒序
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_transactions_user_timestamp")
                    .table(Transaction::Table)
                    .col(Transaction::UserId)
                    .col(Transaction::Timestamp)
                    .to_owned(),
            )
            .await?;

        // 预算按 (user_id, year, month) 等值查询
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_user_budgets_user_period")
                    .table(UserBudget::Table)
                    .col(UserBudget::UserId)
                    .col(UserBudget::Year)
                    .col(UserBudget::Month)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_user_budgets_user_period")
                    .table(UserBudget::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_transactions_user_timestamp")
                    .table(Transaction::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Transaction {
    #[sea_orm(iden = "transactions")]
    Table,
    UserId,
    Timestamp,
}

#[derive(DeriveIden)]
enum UserBudget {
    #[sea_orm(iden = "user_budgets")]
    Table,
    UserId,
    Year,
    Month,
}
