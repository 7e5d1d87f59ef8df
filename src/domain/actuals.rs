use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One day of delivered metrics for a campaign. Gaps in the series are
/// implicitly zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DailyActual {
    pub date: NaiveDate,
    pub spend: f64,
    pub impressions: f64,
    pub clicks: f64,
    pub results: f64,
    pub video_3s_views: f64,
    /// Explicit deliverable count used by SUMMARY buy types only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deliverable_value: Option<f64>,
}

/// Raw boundary shape for a delivery row as returned by an analytics source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActualRecord {
    pub date: String,
    #[serde(default)]
    pub spend: f64,
    #[serde(default)]
    pub impressions: f64,
    #[serde(default)]
    pub clicks: f64,
    #[serde(default)]
    pub results: f64,
    #[serde(default)]
    pub video_3s_views: f64,
    #[serde(default)]
    pub deliverable_value: Option<f64>,
}

impl ActualRecord {
    pub fn parse(&self) -> Result<DailyActual, String> {
        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d")
            .map_err(|_| format!("unparseable actuals date {:?}", self.date))?;
        if self.spend < 0.0 {
            return Err(format!("negative spend {}", self.spend));
        }
        Ok(DailyActual {
            date,
            spend: self.spend,
            impressions: self.impressions,
            clicks: self.clicks,
            results: self.results,
            video_3s_views: self.video_3s_views,
            deliverable_value: self.deliverable_value,
        })
    }

    /// Parses a batch, skipping malformed rows with a warning.
    pub fn parse_all(records: &[ActualRecord]) -> Vec<DailyActual> {
        records
            .iter()
            .filter_map(|record| match record.parse() {
                Ok(actual) => Some(actual),
                Err(reason) => {
                    warn!(%reason, "skipping malformed actuals row");
                    None
                }
            })
            .collect()
    }
}

/// Collapses rows from multiple channel tables into one row per day.
pub fn merge_daily(rows: impl IntoIterator<Item = DailyActual>) -> Vec<DailyActual> {
    let mut by_date: BTreeMap<NaiveDate, DailyActual> = BTreeMap::new();
    for row in rows {
        let entry = by_date.entry(row.date).or_insert_with(|| DailyActual {
            date: row.date,
            ..DailyActual::default()
        });
        entry.spend += row.spend;
        entry.impressions += row.impressions;
        entry.clicks += row.clicks;
        entry.results += row.results;
        entry.video_3s_views += row.video_3s_views;
        if let Some(value) = row.deliverable_value {
            *entry.deliverable_value.get_or_insert(0.0) += value;
        }
    }
    by_date.into_values().collect()
}
