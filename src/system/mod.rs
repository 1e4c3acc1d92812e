//! System-level modules
//!
//! Process-wide concerns that are not part of the ledger itself:
//! logging setup lives here, lifecycle and mode routing live in `runtime`.

pub mod logging;

pub use logging::init_logging;
