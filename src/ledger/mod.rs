//! Pure ledger computations
//!
//! Everything in here works on already-loaded, per-user slices of
//! transactions and budgets. No I/O, no clock reads: callers pass `now`.

pub mod budget;
pub mod categories;
pub mod insights;
pub mod summary;
pub mod validation;

pub use budget::{BudgetOverview, BudgetProgress, BudgetStatus, apply_spent, month_window, spent_for};
pub use categories::{Category, categories_for, category_name};
pub use insights::{Insights, generate_insights};
pub use summary::{
    CategorySpend, Period, Totals, TransactionFilter, category_breakdown, filter_period,
    sum_amounts, sum_matching, totals,
};
pub use validation::{
    AmountInput, BudgetForm, SignInForm, SignUpForm, TransactionForm, ValidTransaction,
};
