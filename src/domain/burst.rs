use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::common::DateRange;

/// Channel bucket a line item bills under.
///
/// The set is open-ended: unrecognized categories round-trip as `Other` so a
/// new channel table upstream never drops spend on the floor.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ChannelCategory {
    Search,
    Social,
    Programmatic,
    Video,
    Production,
    Other(String),
}

impl ChannelCategory {
    /// Production bursts are billed media-only; no fee allocation applies.
    pub fn is_production(&self) -> bool {
        matches!(self, ChannelCategory::Production)
    }

    pub fn as_str(&self) -> &str {
        match self {
            ChannelCategory::Search => "search",
            ChannelCategory::Social => "social",
            ChannelCategory::Programmatic => "programmatic",
            ChannelCategory::Video => "video",
            ChannelCategory::Production => "production",
            ChannelCategory::Other(name) => name,
        }
    }
}

impl From<String> for ChannelCategory {
    fn from(raw: String) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "search" => ChannelCategory::Search,
            "social" => ChannelCategory::Social,
            "programmatic" => ChannelCategory::Programmatic,
            "video" => ChannelCategory::Video,
            "production" => ChannelCategory::Production,
            other => ChannelCategory::Other(other.to_string()),
        }
    }
}

impl From<ChannelCategory> for String {
    fn from(channel: ChannelCategory) -> Self {
        channel.as_str().to_string()
    }
}

impl fmt::Display for ChannelCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One contiguous, dated slice of spend/delivery commitment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Burst {
    pub range: DateRange,
    pub budget_amount: f64,
    pub deliverable_amount: f64,
    pub fee_percentage: f64,
    pub client_pays_for_media: bool,
    pub budget_includes_fees: bool,
    pub channel: ChannelCategory,
}

/// Raw boundary shape for a burst as fetched from the data store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BurstRecord {
    pub start_date: String,
    pub end_date: String,
    pub budget_amount: f64,
    #[serde(default)]
    pub deliverable_amount: Option<f64>,
    pub fee_percentage: f64,
    pub client_pays_for_media: bool,
    pub budget_includes_fees: bool,
    pub channel_category: String,
}

impl BurstRecord {
    /// Validates the record into a [`Burst`].
    ///
    /// Rejection reasons: unparseable dates, end before start, negative
    /// amounts, or a fee percentage outside `[0, 100)`. A fee of exactly 100
    /// would divide by zero in the net-budget formulas and is treated as
    /// malformed pending product clarification.
    pub fn parse(&self) -> Result<Burst, String> {
        let start = parse_iso_date(&self.start_date)
            .ok_or_else(|| format!("unparseable start date {:?}", self.start_date))?;
        let end = parse_iso_date(&self.end_date)
            .ok_or_else(|| format!("unparseable end date {:?}", self.end_date))?;
        let range = DateRange::new(start, end).map_err(|e| e.to_string())?;
        if self.budget_amount < 0.0 {
            return Err(format!("negative budget amount {}", self.budget_amount));
        }
        let deliverable_amount = self.deliverable_amount.unwrap_or(0.0);
        if deliverable_amount < 0.0 {
            return Err(format!("negative deliverable amount {deliverable_amount}"));
        }
        if !(0.0..100.0).contains(&self.fee_percentage) {
            return Err(format!(
                "fee percentage {} outside [0, 100)",
                self.fee_percentage
            ));
        }
        Ok(Burst {
            range,
            budget_amount: self.budget_amount,
            deliverable_amount,
            fee_percentage: self.fee_percentage,
            client_pays_for_media: self.client_pays_for_media,
            budget_includes_fees: self.budget_includes_fees,
            channel: ChannelCategory::from(self.channel_category.clone()),
        })
    }

    /// Parses a batch, skipping malformed records with a warning.
    ///
    /// One bad historical record must not blank out an entire report.
    pub fn parse_all(records: &[BurstRecord]) -> Vec<Burst> {
        records
            .iter()
            .filter_map(|record| match record.parse() {
                Ok(burst) => Some(burst),
                Err(reason) => {
                    warn!(%reason, channel = %record.channel_category, "skipping malformed burst");
                    None
                }
            })
            .collect()
    }
}

fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> BurstRecord {
        BurstRecord {
            start_date: "2026-06-01".into(),
            end_date: "2026-06-14".into(),
            budget_amount: 20000.0,
            deliverable_amount: Some(400000.0),
            fee_percentage: 20.0,
            client_pays_for_media: false,
            budget_includes_fees: false,
            channel_category: "search".into(),
        }
    }

    #[test]
    fn valid_record_parses() {
        let burst = record().parse().unwrap();
        assert_eq!(burst.range.total_days(), 14);
        assert_eq!(burst.channel, ChannelCategory::Search);
    }

    #[test]
    fn fee_of_one_hundred_is_malformed() {
        let mut bad = record();
        bad.fee_percentage = 100.0;
        assert!(bad.parse().is_err());
    }

    #[test]
    fn parse_all_skips_bad_records() {
        let mut inverted = record();
        inverted.start_date = "2026-06-20".into();
        let mut garbled = record();
        garbled.end_date = "not-a-date".into();
        let mut negative = record();
        negative.budget_amount = -5.0;

        let bursts = BurstRecord::parse_all(&[record(), inverted, garbled, negative]);
        assert_eq!(bursts.len(), 1);
    }

    #[test]
    fn unknown_channel_round_trips() {
        let channel = ChannelCategory::from("Influencer ".to_string());
        assert_eq!(channel, ChannelCategory::Other("influencer".into()));
        let json = serde_json::to_string(&channel).unwrap();
        assert_eq!(json, "\"influencer\"");
    }
}
