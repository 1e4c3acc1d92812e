use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 登录凭据
        manager
            .create_table(
                Table::create()
                    .table(UserAccount::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserAccount::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(UserAccount::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(UserAccount::PasswordHash).string().not_null())
                    .col(
                        ColumnDef::new(UserAccount::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserDetails::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserDetails::UserId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserDetails::FirstName).string().not_null())
                    .col(ColumnDef::new(UserDetails::LastName).string().not_null())
                    .col(ColumnDef::new(UserDetails::Email).string().not_null())
                    .col(ColumnDef::new(UserDetails::PhoneNumber).string().not_null())
                    .col(ColumnDef::new(UserDetails::Address).text().not_null())
                    .col(
                        ColumnDef::new(UserDetails::MonthlyBudget)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(UserDetails::PhotoUrl).string().null())
                    .col(
                        ColumnDef::new(UserDetails::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserDetails::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Transaction::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transaction::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Transaction::UserId).string().not_null())
                    .col(ColumnDef::new(Transaction::Kind).string().not_null())
                    .col(ColumnDef::new(Transaction::Amount).double().not_null())
                    .col(ColumnDef::new(Transaction::Description).text().not_null())
                    .col(ColumnDef::new(Transaction::Category).string().not_null())
                    .col(
                        ColumnDef::new(Transaction::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transaction::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserBudget::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserBudget::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserBudget::UserId).string().not_null())
                    .col(ColumnDef::new(UserBudget::Category).string().not_null())
                    .col(ColumnDef::new(UserBudget::Amount).double().not_null())
                    .col(ColumnDef::new(UserBudget::Month).integer().not_null())
                    .col(ColumnDef::new(UserBudget::Year).integer().not_null())
                    .col(
                        ColumnDef::new(UserBudget::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserBudget::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserBudget::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Transaction::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserDetails::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserAccount::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum UserAccount {
    #[sea_orm(iden = "user_accounts")]
    Table,
    Id,
    Email,
    PasswordHash,
    CreatedAt,
}

#[derive(DeriveIden)]
enum UserDetails {
    #[sea_orm(iden = "user_details")]
    Table,
    UserId,
    FirstName,
    LastName,
    Email,
    PhoneNumber,
    Address,
    MonthlyBudget,
    PhotoUrl,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Transaction {
    #[sea_orm(iden = "transactions")]
    Table,
    Id,
    UserId,
    Kind,
    Amount,
    Description,
    Category,
    Timestamp,
    CreatedAt,
}

#[derive(DeriveIden)]
enum UserBudget {
    #[sea_orm(iden = "user_budgets")]
    Table,
    Id,
    UserId,
    Category,
    Amount,
    Month,
    Year,
    CreatedAt,
    UpdatedAt,
}
