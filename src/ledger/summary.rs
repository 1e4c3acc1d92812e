//! Totals, period filters and per-category breakdowns

use std::collections::HashMap;

use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use super::categories::category_name;
use crate::storage::{Transaction, TransactionType};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Totals {
    pub income: f64,
    pub expenses: f64,
    pub balance: f64,
}

/// income = Σ income，expenses = Σ expense，balance = income - expenses
pub fn totals<'a, I>(txs: I) -> Totals
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let (income, expenses) = txs
        .into_iter()
        .fold((0.0, 0.0), |(income, expenses), tx| match tx.kind {
            TransactionType::Income => (income + tx.amount, expenses),
            TransactionType::Expense => (income, expenses + tx.amount),
        });

    Totals {
        income,
        expenses,
        balance: income - expenses,
    }
}

/// 统计周期（相对 now 的滚动窗口）
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Period {
    Week,
    #[default]
    Month,
    Year,
    All,
}

impl Period {
    /// 窗口起点；`All` 没有下界
    ///
    /// 月和年按日历回退，月末日期会被截到目标月的最后一天。
    pub fn start(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Period::Week => Some(now - Duration::days(7)),
            Period::Month => now.checked_sub_months(Months::new(1)),
            Period::Year => now.checked_sub_months(Months::new(12)),
            Period::All => None,
        }
    }

    pub fn contains(&self, timestamp: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        self.start(now).is_none_or(|start| timestamp >= start)
    }
}

/// 金额求和，空序列得到 +0.0
///
/// `Iterator::sum` 对 f64 的起始值是 -0.0，空集合会序列化成 `-0.0`。
pub fn sum_amounts<I>(amounts: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    amounts.into_iter().fold(0.0, |acc, amount| acc + amount)
}

/// 保留 timestamp >= 周期起点的交易
pub fn filter_period(txs: &[Transaction], period: Period, now: DateTime<Utc>) -> Vec<&Transaction> {
    txs.iter()
        .filter(|tx| period.contains(tx.timestamp, now))
        .collect()
}

/// 类型 / 分类 / 周期组合过滤
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TransactionFilter {
    #[serde(default, rename = "type")]
    pub kind: Option<TransactionType>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub period: Option<Period>,
}

impl TransactionFilter {
    pub fn matches(&self, tx: &Transaction, now: DateTime<Utc>) -> bool {
        self.kind.is_none_or(|kind| tx.kind == kind)
            && self
                .category
                .as_deref()
                .is_none_or(|category| tx.category == category)
            && self
                .period
                .is_none_or(|period| period.contains(tx.timestamp, now))
    }

    pub fn apply<'a>(&self, txs: &'a [Transaction], now: DateTime<Utc>) -> Vec<&'a Transaction> {
        txs.iter().filter(|tx| self.matches(tx, now)).collect()
    }

    pub fn sum(&self, txs: &[Transaction], now: DateTime<Utc>) -> f64 {
        sum_amounts(
            txs.iter()
                .filter(|tx| self.matches(tx, now))
                .map(|tx| tx.amount),
        )
    }
}

pub fn sum_matching(txs: &[Transaction], filter: &TransactionFilter, now: DateTime<Utc>) -> f64 {
    filter.sum(txs, now)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySpend {
    pub category: String,
    pub name: String,
    pub amount: f64,
    pub count: usize,
    /// 占该类型总额的比例，0..=1
    pub share: f64,
}

/// 指定类型按分类汇总，金额降序，金额相同按分类 id 升序
pub fn category_breakdown<'a, I>(txs: I, kind: TransactionType) -> Vec<CategorySpend>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut by_category: HashMap<&str, (f64, usize)> = HashMap::new();
    for tx in txs.into_iter().filter(|tx| tx.kind == kind) {
        let entry = by_category.entry(tx.category.as_str()).or_default();
        entry.0 += tx.amount;
        entry.1 += 1;
    }

    let total = sum_amounts(by_category.values().map(|(amount, _)| *amount));

    let mut rows: Vec<CategorySpend> = by_category
        .into_iter()
        .map(|(category, (amount, count))| CategorySpend {
            category: category.to_string(),
            name: category_name(category).to_string(),
            amount,
            count,
            share: if total > 0.0 { amount / total } else { 0.0 },
        })
        .collect();

    rows.sort_by(|a, b| {
        b.amount
            .total_cmp(&a.amount)
            .then_with(|| a.category.cmp(&b.category))
    });
    rows
}
