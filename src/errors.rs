use thiserror::Error;

use crate::fetch::FetchError;

/// Error type covering the engine's public contract failures.
///
/// Data-quality problems (malformed bursts, missing actuals) never surface
/// here; they are skipped with a warning per the silent-degrade policy.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid date range: {0}")]
    InvalidRange(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("manual schedule total differs from campaign budget by {delta:.2}")]
    BudgetMismatch { delta: f64 },
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

pub type EngineResult<T> = Result<T, EngineError>;
