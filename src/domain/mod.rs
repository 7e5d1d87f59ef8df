//! Value objects consumed and produced by the engine.

pub mod actuals;
pub mod burst;
pub mod common;
pub mod version;

pub use actuals::{ActualRecord, DailyActual};
pub use burst::{Burst, BurstRecord, ChannelCategory};
pub use common::{DateRange, MonthKey};
pub use version::{CampaignVersion, LineItem, MasterRecord};
