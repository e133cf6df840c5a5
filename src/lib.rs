#![doc(test(attr(deny(warnings))))]

//! Pooltix is the ticket desk for a swimming pool: it issues tickets by type,
//! keeps them in a persisted ledger, and builds per-day sales reports.
//!
//! The binary is a thin shell over the workspace crates
//! (`pooltix-domain`, `pooltix-core`, `pooltix-storage-json`, `pooltix-config`).

pub mod cli;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Pooltix tracing initialized.");
    });
}
