use sea_orm::ActiveValue::{NotSet, Set};
use tracing::warn;

use crate::storage::{Budget, Transaction, TransactionType, UserAccount, UserDetails};
use migration::entities::{transaction, user_account, user_budget, user_details};

/// 将 Sea-ORM Model 转换为 Transaction
///
/// 未知的 kind 按支出处理（旧数据或手工写入的行）。
pub fn model_to_transaction(model: transaction::Model) -> Transaction {
    let kind = model.kind.parse().unwrap_or_else(|_| {
        warn!(
            "Transaction {} has unknown kind '{}', treating as expense",
            model.id, model.kind
        );
        TransactionType::Expense
    });

    Transaction {
        id: model.id,
        user_id: model.user_id,
        kind,
        amount: model.amount,
        description: model.description,
        category: model.category,
        timestamp: model.timestamp,
        created_at: model.created_at,
    }
}

/// 将 Transaction 转换为 ActiveModel（用于插入/更新）
///
/// 更新时 created_at 保持不变。
pub fn transaction_to_active_model(tx: &Transaction, is_new: bool) -> transaction::ActiveModel {
    transaction::ActiveModel {
        id: Set(tx.id.clone()),
        user_id: Set(tx.user_id.clone()),
        kind: Set(tx.kind.to_string()),
        amount: Set(tx.amount),
        description: Set(tx.description.clone()),
        category: Set(tx.category.clone()),
        timestamp: Set(tx.timestamp),
        created_at: if is_new { Set(tx.created_at) } else { NotSet },
    }
}

/// 预算的 spent 不落库，读出时置 0，由 ledger 重新计算
pub fn model_to_budget(model: user_budget::Model) -> Budget {
    Budget {
        id: model.id,
        user_id: model.user_id,
        category: model.category,
        amount: model.amount,
        spent: 0.0,
        month: model.month.clamp(1, 12) as u32,
        year: model.year,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

pub fn budget_to_active_model(budget: &Budget, is_new: bool) -> user_budget::ActiveModel {
    user_budget::ActiveModel {
        id: Set(budget.id.clone()),
        user_id: Set(budget.user_id.clone()),
        category: Set(budget.category.clone()),
        amount: Set(budget.amount),
        month: Set(budget.month as i32),
        year: Set(budget.year),
        created_at: if is_new {
            Set(budget.created_at)
        } else {
            NotSet
        },
        updated_at: Set(budget.updated_at),
    }
}

pub fn model_to_details(model: user_details::Model) -> UserDetails {
    UserDetails {
        user_id: model.user_id,
        first_name: model.first_name,
        last_name: model.last_name,
        email: model.email,
        phone_number: model.phone_number,
        address: model.address,
        monthly_budget: model.monthly_budget,
        photo_url: model.photo_url,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

pub fn details_to_active_model(details: &UserDetails) -> user_details::ActiveModel {
    user_details::ActiveModel {
        user_id: Set(details.user_id.clone()),
        first_name: Set(details.first_name.clone()),
        last_name: Set(details.last_name.clone()),
        email: Set(details.email.clone()),
        phone_number: Set(details.phone_number.clone()),
        address: Set(details.address.clone()),
        monthly_budget: Set(details.monthly_budget.clone()),
        photo_url: Set(details.photo_url.clone()),
        created_at: Set(details.created_at),
        updated_at: Set(details.updated_at),
    }
}

pub fn model_to_account(model: user_account::Model) -> UserAccount {
    UserAccount {
        id: model.id,
        email: model.email,
        password_hash: model.password_hash,
        created_at: model.created_at,
    }
}

pub fn account_to_active_model(account: &UserAccount) -> user_account::ActiveModel {
    user_account::ActiveModel {
        id: Set(account.id.clone()),
        email: Set(account.email.clone()),
        password_hash: Set(account.password_hash.clone()),
        created_at: Set(account.created_at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use sea_orm::ActiveValue;

    fn tx_model(kind: &str) -> transaction::Model {
        let ts = Utc.with_ymd_and_hms(2026, 3, 14, 12, 0, 0).unwrap();
        transaction::Model {
            id: "t1".to_string(),
            user_id: "u1".to_string(),
            kind: kind.to_string(),
            amount: 42.5,
            description: "Lunch".to_string(),
            category: "food".to_string(),
            timestamp: ts,
            created_at: ts,
        }
    }

    #[test]
    fn test_model_to_transaction_parses_kind() {
        let tx = model_to_transaction(tx_model("income"));
        assert_eq!(tx.kind, TransactionType::Income);
        assert_eq!(tx.amount, 42.5);
        assert_eq!(tx.category, "food");
    }

    #[test]
    fn test_unknown_kind_falls_back_to_expense() {
        let tx = model_to_transaction(tx_model("transfer"));
        assert_eq!(tx.kind, TransactionType::Expense);
    }

    #[test]
    fn test_transaction_update_keeps_created_at() {
        let tx = model_to_transaction(tx_model("expense"));
        let active = transaction_to_active_model(&tx, false);
        assert!(matches!(active.created_at, ActiveValue::NotSet));
        assert!(matches!(&active.kind, ActiveValue::Set(k) if k == "expense"));

        let active = transaction_to_active_model(&tx, true);
        assert!(matches!(active.created_at, ActiveValue::Set(_)));
    }

    #[test]
    fn test_budget_spent_is_never_read_from_storage() {
        let now = Utc::now();
        let budget = model_to_budget(user_budget::Model {
            id: "b1".to_string(),
            user_id: "u1".to_string(),
            category: "food".to_string(),
            amount: 300.0,
            month: 3,
            year: 2026,
            created_at: now,
            updated_at: now,
        });
        assert_eq!(budget.spent, 0.0);
        assert_eq!(budget.month, 3);
    }
}
