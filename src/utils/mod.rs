use std::sync::Once;

use chrono::{NaiveDate, Utc};

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber with sensible defaults.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter =
            EnvFilter::from_default_env().add_directive("pacing_core=info".parse().unwrap());

        fmt().with_env_filter(filter).init();
    });
}

/// Rounds a currency or percentage value to two decimal places.
///
/// Applied after summation, never per burst, so rounding error does not
/// compound across many bursts in one month.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Canonical "today" for as-at boundary decisions.
///
/// All date-only computations anchor to the UTC calendar so that a report run
/// near midnight produces the same figures regardless of server locale.
pub fn report_today() -> NaiveDate {
    Utc::now().date_naive()
}
