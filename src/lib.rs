//! Budgetly - a personal finance backend
//!
//! Users record income and expense transactions, set monthly per-category
//! budgets and read spending summaries and insights, over an HTTP API or
//! the command line.
//!
//! # Architecture
//! - `storage`: SeaORM persistence, one table per collection
//! - `ledger`: pure aggregation, validation and insight logic
//! - `services`: business operations shared by the API and the CLI
//! - `events`: in-process change feed driving live budget views
//! - `api`: HTTP services and middleware
//! - `interfaces`: command-line interface
//! - `config`: Configuration management
//! - `runtime`: Application lifecycle and execution modes
//! - `system`: logging setup

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod events;
pub mod interfaces;
pub mod ledger;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
