//! Pure computational core: proration, fee allocation, billing schedules,
//! expected series, pacing comparison, version selection, and accrual rollups.
//!
//! Every function here is a deterministic transformation over its inputs with
//! no shared mutable state; identical inputs always give identical output.

pub mod accrual;
pub mod billing;
pub mod expected;
pub mod fees;
pub mod pacing;
pub mod proration;
pub mod versions;

pub use accrual::{accrual_report, compute_accrual_rows, AccrualRow};
pub use billing::{build_auto_schedule, BillingSchedule, MonthlyBillingRow};
pub use expected::{expected_series, ExpectedSeries, ExpectedSeriesPoint, ExpectedTotals};
pub use fees::{allocate, FeeSplit};
pub use pacing::{
    calculate_pacing, pace_band, pacing_status, BuyType, DeliverableMetric, PaceBand,
    PacingFigures, PacingResult, PacingStatus, SeriesPoint,
};
pub use versions::select_authoritative;
