#![doc(test(attr(deny(warnings))))]

//! Pacing Core implements the deterministic financial calculations behind a
//! media-buying platform: prorating campaign bursts across calendar months and
//! days, applying fee-accounting policies, building billing schedules and
//! accrual rows, and comparing actual delivery against plan.

pub mod config;
pub mod domain;
pub mod engine;
pub mod errors;
pub mod fetch;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Pacing Core tracing initialized.");
    });
}
