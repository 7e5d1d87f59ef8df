use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Absolute currency tolerance for manual schedule reconciliation.
pub const DEFAULT_BUDGET_TOLERANCE: f64 = 10.0;

const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 20;

/// Caller-supplied engine settings.
///
/// The engine holds no global state; configuration is a plain value passed to
/// the functions that need it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    /// Maximum allowed absolute delta between a manual schedule total and the
    /// campaign budget, in currency units.
    pub budget_tolerance: f64,
    /// Upper bound applied to each upstream sub-fetch.
    pub fetch_timeout_secs: u64,
    /// When true, an aggregation where every upstream source failed is an
    /// error instead of an empty-but-valid result.
    pub require_successful_source: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            budget_tolerance: DEFAULT_BUDGET_TOLERANCE,
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            require_successful_source: false,
        }
    }
}

impl EngineConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}
