//! User interfaces other than the HTTP API

pub mod cli;
