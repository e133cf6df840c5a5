//! pooltix-core
//!
//! Business logic and services for the ticket desk.
//! Depends on pooltix-domain. No CLI, no terminal I/O; persistence goes through
//! the [`storage::KeyValueStore`] contract.

pub mod error;
pub mod format;
pub mod issue_service;
pub mod ledger_store;
pub mod report_service;
pub mod storage;
pub mod time;

pub use error::CoreError;
pub use format::*;
pub use issue_service::*;
pub use ledger_store::*;
pub use report_service::*;
pub use storage::{ledger_warnings, KeyValueStore, MemoryStore, TICKETS_KEY};
pub use time::{Clock, FixedClock};

#[cfg(test)]
mod tests;
