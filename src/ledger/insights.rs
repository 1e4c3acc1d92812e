//! Spending insights
//!
//! Compares the current calendar month against the previous one and turns
//! the numbers into a short summary plus recommendations.

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;

use super::budget::{BudgetProgress, BudgetStatus, apply_spent, month_window};
use super::summary::{CategorySpend, Totals, category_breakdown, totals};
use crate::storage::{Budget, Transaction, TransactionType};

pub const TOP_CATEGORY_LIMIT: usize = 3;
/// 支出环比超过该百分比时提醒
const SPENDING_SPIKE_PCT: f64 = 20.0;
/// 储蓄率低于该值时提醒
const LOW_SAVINGS_RATE: f64 = 0.1;
const HEALTHY_SAVINGS_RATE: f64 = 0.2;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insights {
    pub month: u32,
    pub year: i32,
    pub current_month: Totals,
    pub previous_month: Totals,
    /// 支出环比（百分比）；上月无支出时为 None
    pub expense_change_pct: Option<f64>,
    /// (收入 - 支出) / 收入；本月无收入时为 None
    pub savings_rate: Option<f64>,
    pub top_categories: Vec<CategorySpend>,
    pub budget_warnings: Vec<BudgetProgress>,
    pub summary: String,
    pub recommendations: Vec<String>,
}

fn previous_month(month: u32, year: i32) -> (u32, i32) {
    if month == 1 { (12, year - 1) } else { (month - 1, year) }
}

fn in_month(txs: &[Transaction], month: u32, year: i32) -> Vec<&Transaction> {
    let Ok((start, end)) = month_window(month, year) else {
        return Vec::new();
    };
    txs.iter()
        .filter(|tx| tx.timestamp >= start && tx.timestamp < end)
        .collect()
}

/// `budgets` 中只有与 now 同月的预算参与提醒
pub fn generate_insights(
    txs: &[Transaction],
    budgets: &[Budget],
    now: DateTime<Utc>,
) -> Insights {
    let (month, year) = (now.month(), now.year());
    let (prev_month, prev_year) = previous_month(month, year);

    let current_txs = in_month(txs, month, year);
    let current = totals(current_txs.iter().copied());
    let previous = totals(in_month(txs, prev_month, prev_year));

    let expense_change_pct = (previous.expenses > 0.0)
        .then(|| (current.expenses - previous.expenses) / previous.expenses * 100.0);
    let savings_rate = (current.income > 0.0).then(|| current.balance / current.income);

    let mut top_categories = category_breakdown(current_txs, TransactionType::Expense);
    top_categories.truncate(TOP_CATEGORY_LIMIT);

    let mut current_budgets: Vec<Budget> = budgets
        .iter()
        .filter(|b| b.month == month && b.year == year)
        .cloned()
        .collect();
    apply_spent(&mut current_budgets, txs);
    let budget_warnings: Vec<BudgetProgress> = current_budgets
        .into_iter()
        .map(BudgetProgress::from)
        .filter(|p| p.status != BudgetStatus::OnTrack)
        .collect();

    let summary = summarize(&current, expense_change_pct, top_categories.first());
    let recommendations =
        recommend(expense_change_pct, savings_rate, &top_categories, &budget_warnings);

    Insights {
        month,
        year,
        current_month: current,
        previous_month: previous,
        expense_change_pct,
        savings_rate,
        top_categories,
        budget_warnings,
        summary,
        recommendations,
    }
}

fn summarize(current: &Totals, change: Option<f64>, top: Option<&CategorySpend>) -> String {
    if current.income == 0.0 && current.expenses == 0.0 {
        return "No transactions recorded this month yet.".to_string();
    }

    let mut summary = format!(
        "This month you spent {:.2} and earned {:.2}.",
        current.expenses, current.income
    );
    match change {
        Some(pct) if pct.abs() < 0.5 => summary.push_str(" Spending is flat compared to last month."),
        Some(pct) if pct > 0.0 => {
            summary.push_str(&format!(" Spending is up {:.0}% from last month.", pct))
        }
        Some(pct) => summary.push_str(&format!(
            " Spending is down {:.0}% from last month.",
            pct.abs()
        )),
        None => {}
    }
    if let Some(top) = top {
        summary.push_str(&format!(
            " Your largest expense category is {} ({:.0}% of spending).",
            top.name,
            top.share * 100.0
        ));
    }
    summary
}

fn recommend(
    change: Option<f64>,
    savings_rate: Option<f64>,
    top_categories: &[CategorySpend],
    warnings: &[BudgetProgress],
) -> Vec<String> {
    let mut out = Vec::new();

    for w in warnings {
        let name = super::categories::category_name(&w.budget.category);
        match w.status {
            BudgetStatus::Over => out.push(format!(
                "You are over your {} budget by {:.2}. Consider pausing spending in this category.",
                name, -w.remaining
            )),
            BudgetStatus::Warning => out.push(format!(
                "You have used {:.0}% of your {} budget. {:.2} remains for this month.",
                w.progress * 100.0,
                name,
                w.remaining
            )),
            BudgetStatus::OnTrack => {}
        }
    }

    if let Some(pct) = change.filter(|pct| *pct > SPENDING_SPIKE_PCT) {
        let hint = top_categories
            .first()
            .map(|c| format!(" Start by reviewing {}.", c.name))
            .unwrap_or_default();
        out.push(format!(
            "Spending rose {:.0}% compared to last month.{}",
            pct, hint
        ));
    }

    match savings_rate {
        Some(rate) if rate < 0.0 => {
            out.push("Expenses exceed income this month. Look for costs you can cut.".to_string())
        }
        Some(rate) if rate < LOW_SAVINGS_RATE => out.push(format!(
            "You are saving {:.0}% of your income. Aim for at least 20%.",
            rate * 100.0
        )),
        Some(rate) if rate >= HEALTHY_SAVINGS_RATE => out.push(format!(
            "Great job! You are saving {:.0}% of your income.",
            rate * 100.0
        )),
        _ => {}
    }

    if out.is_empty() {
        out.push("Your spending looks on track. Keep it up!".to_string());
    }
    out
}
