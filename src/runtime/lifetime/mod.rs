//! Startup and shutdown sequences

pub mod shutdown;
pub mod startup;
