//! Built-in category catalog
//!
//! Categories are free-form ids on the wire; the catalog only drives
//! pickers and display names. Unknown ids display as themselves.

use serde::Serialize;

use crate::storage::TransactionType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: &'static str,
    pub name: &'static str,
}

const fn category(id: &'static str, name: &'static str) -> Category {
    Category { id, name }
}

pub const EXPENSE_CATEGORIES: &[Category] = &[
    category("food", "Food & Dining"),
    category("transport", "Transportation"),
    category("rent", "Rent"),
    category("entertainment", "Entertainment"),
    category("shopping", "Shopping"),
    category("bills", "Bills & Utilities"),
    category("health", "Health & Fitness"),
    category("groceries", "Groceries"),
    category("other", "Others"),
];

pub const INCOME_CATEGORIES: &[Category] = &[
    category("salary", "Salary"),
    category("freelance", "Freelancing"),
    category("investment", "Investment"),
    category("bonus", "Bonus"),
    category("other", "Others"),
];

pub fn categories_for(kind: TransactionType) -> &'static [Category] {
    match kind {
        TransactionType::Expense => EXPENSE_CATEGORIES,
        TransactionType::Income => INCOME_CATEGORIES,
    }
}

/// 分类显示名，未知 id 原样返回
pub fn category_name(id: &str) -> &str {
    EXPENSE_CATEGORIES
        .iter()
        .chain(INCOME_CATEGORIES)
        .find(|c| c.id == id)
        .map(|c| c.name)
        .unwrap_or(id)
}
