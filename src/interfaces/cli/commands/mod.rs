//! CLI command implementations
//!
//! This module re-exports all CLI command functions.

mod budgets;
mod config_gen;
mod helpers;
mod reports;
mod transactions;
mod users;

pub use budgets::*;
pub use config_gen::config_generate;
pub use reports::*;
pub use transactions::*;
pub use users::*;
