//! Budget spent computation and progress

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::summary::sum_amounts;
use crate::errors::{BudgetlyError, Result};
use crate::storage::{Budget, Transaction, TransactionType};

/// 达到该比例即提示
pub const WARNING_THRESHOLD: f64 = 0.8;

/// [当月第一刻, 次月第一刻)，UTC
pub fn month_window(month: u32, year: i32) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| BudgetlyError::validation(format!("Invalid month: {}/{}", month, year)))?;
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let end = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .ok_or_else(|| BudgetlyError::validation(format!("Invalid month: {}/{}", month, year)))?;

    Ok((
        start.and_time(chrono::NaiveTime::MIN).and_utc(),
        end.and_time(chrono::NaiveTime::MIN).and_utc(),
    ))
}

/// 预算窗口内、同分类的支出总和
pub fn spent_for<'a, I>(budget: &Budget, txs: I) -> f64
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let Ok((start, end)) = month_window(budget.month, budget.year) else {
        return 0.0;
    };

    sum_amounts(
        txs.into_iter()
            .filter(|tx| {
                tx.kind == TransactionType::Expense
                    && tx.category == budget.category
                    && tx.timestamp >= start
                    && tx.timestamp < end
            })
            .map(|tx| tx.amount),
    )
}

/// 用交易重新计算每个预算的 spent，覆盖原值
pub fn apply_spent(budgets: &mut [Budget], txs: &[Transaction]) {
    for budget in budgets.iter_mut() {
        budget.spent = spent_for(budget, txs);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    OnTrack,
    Warning,
    Over,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetProgress {
    #[serde(flatten)]
    pub budget: Budget,
    pub remaining: f64,
    /// spent / amount；amount 为 0 时为 0
    pub progress: f64,
    pub status: BudgetStatus,
}

impl From<Budget> for BudgetProgress {
    fn from(budget: Budget) -> Self {
        let progress = if budget.amount > 0.0 {
            budget.spent / budget.amount
        } else {
            0.0
        };
        let status = if budget.spent > budget.amount {
            BudgetStatus::Over
        } else if progress >= WARNING_THRESHOLD {
            BudgetStatus::Warning
        } else {
            BudgetStatus::OnTrack
        };

        Self {
            remaining: budget.amount - budget.spent,
            progress,
            status,
            budget,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetOverview {
    pub month: u32,
    pub year: i32,
    pub total_budget: f64,
    pub total_spent: f64,
    pub remaining: f64,
    pub budgets: Vec<BudgetProgress>,
}

impl BudgetOverview {
    /// 预算的 spent 需已通过 `apply_spent` 计算
    pub fn new(month: u32, year: i32, budgets: Vec<Budget>) -> Self {
        let total_budget = sum_amounts(budgets.iter().map(|b| b.amount));
        let total_spent = sum_amounts(budgets.iter().map(|b| b.spent));

        Self {
            month,
            year,
            total_budget,
            total_spent,
            remaining: total_budget - total_spent,
            budgets: budgets.into_iter().map(BudgetProgress::from).collect(),
        }
    }

    pub fn warnings(&self) -> impl Iterator<Item = &BudgetProgress> {
        self.budgets
            .iter()
            .filter(|b| b.status != BudgetStatus::OnTrack)
    }
}
