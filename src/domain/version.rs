use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::burst::{Burst, ChannelCategory};

/// One planned placement within a campaign version.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    pub external_id: String,
    pub channel: ChannelCategory,
    pub client_pays_for_media: bool,
    /// Bursts as planned for delivery pacing.
    #[serde(default)]
    pub delivery_schedule: Vec<Burst>,
    /// Bursts as billed; reflects any manual schedule override.
    #[serde(default)]
    pub billing_schedule: Vec<Burst>,
}

impl LineItem {
    /// The bursts finance should trust: the billing schedule when populated
    /// (it carries manual overrides), otherwise the delivery schedule.
    pub fn effective_bursts(&self) -> &[Burst] {
        if self.billing_schedule.is_empty() {
            &self.delivery_schedule
        } else {
            &self.billing_schedule
        }
    }
}

/// One snapshot of a campaign's full plan. Campaigns accumulate versions over
/// their lifecycle; selection picks the authoritative one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CampaignVersion {
    pub record_id: i64,
    pub campaign_ref: String,
    pub client_ref: String,
    #[serde(default)]
    pub version_number: Option<i64>,
    #[serde(default)]
    pub linking_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
}

impl CampaignVersion {
    /// Grouping key for version selection: campaign identifiers compare
    /// case-insensitively with surrounding whitespace ignored.
    pub fn normalized_ref(&self) -> String {
        normalize_ref(&self.campaign_ref)
    }
}

/// Master record naming the version number a campaign should currently bill
/// against.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MasterRecord {
    pub campaign_ref: String,
    #[serde(default)]
    pub latest_version_number: Option<i64>,
    #[serde(default)]
    pub linking_id: Option<String>,
}

impl MasterRecord {
    pub fn normalized_ref(&self) -> String {
        normalize_ref(&self.campaign_ref)
    }
}

pub fn normalize_ref(raw: &str) -> String {
    raw.trim().to_lowercase()
}
