//! Pacing comparison: actual delivery against the prorated plan.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::actuals::DailyActual;
use crate::domain::burst::Burst;
use crate::engine::expected::{expected_series, ExpectedSeries};
use crate::utils::round2;

/// How a line item is bought; selects the deliverable metric compared for
/// pacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuyType {
    Cpm,
    Cpc,
    Cpa,
    Leads,
    Bonus,
    Cpv,
    FixedCost,
    Summary,
}

impl BuyType {
    pub fn parse(raw: &str) -> Option<BuyType> {
        match raw.trim().to_uppercase().as_str() {
            "CPM" => Some(BuyType::Cpm),
            "CPC" => Some(BuyType::Cpc),
            "CPA" => Some(BuyType::Cpa),
            "LEADS" => Some(BuyType::Leads),
            "BONUS" => Some(BuyType::Bonus),
            "CPV" => Some(BuyType::Cpv),
            "FIXED COST" | "FIXED_COST" => Some(BuyType::FixedCost),
            "SUMMARY" => Some(BuyType::Summary),
            _ => None,
        }
    }

    /// Fixed-cost buys have no deliverable metric to pace.
    pub fn metric(&self) -> Option<DeliverableMetric> {
        match self {
            BuyType::Cpm => Some(DeliverableMetric::Impressions),
            BuyType::Cpc => Some(DeliverableMetric::Clicks),
            BuyType::Cpa | BuyType::Leads | BuyType::Bonus => Some(DeliverableMetric::Results),
            BuyType::Cpv => Some(DeliverableMetric::VideoViews),
            BuyType::FixedCost => None,
            BuyType::Summary => Some(DeliverableMetric::Explicit),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliverableMetric {
    Impressions,
    Clicks,
    Results,
    VideoViews,
    /// SUMMARY rows carry an explicit deliverable value.
    Explicit,
}

impl DeliverableMetric {
    fn read(&self, actual: &DailyActual) -> f64 {
        match self {
            DeliverableMetric::Impressions => actual.impressions,
            DeliverableMetric::Clicks => actual.clicks,
            DeliverableMetric::Results => actual.results,
            DeliverableMetric::VideoViews => actual.video_3s_views,
            DeliverableMetric::Explicit => actual.deliverable_value.unwrap_or(0.0),
        }
    }
}

/// Portfolio rollup classification of delivery against plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PacingStatus {
    Under,
    On,
    Over,
}

/// Single-campaign gauge banding; a different scheme from [`PacingStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaceBand {
    Behind,
    AtRisk,
    OnTrack,
}

/// To-date comparison for one measure (spend or a deliverable metric).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PacingFigures {
    pub actual_to_date: f64,
    pub expected_to_date: f64,
    pub delta: f64,
    pub pacing_pct: f64,
    pub goal_total: f64,
    pub status: PacingStatus,
}

/// One charting point: expected vs actual spend for a day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub expected: f64,
    pub actual: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PacingResult {
    pub as_at: NaiveDate,
    pub spend: PacingFigures,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deliverable: Option<PacingFigures>,
    pub series: Vec<SeriesPoint>,
}

/// Ratio-band classification used for portfolio rollups: under 0.9 of plan is
/// UNDER, above 1.1 is OVER. Spending against no plan is always OVER.
pub fn pacing_status(actual: f64, planned: f64) -> PacingStatus {
    if planned <= 0.0 {
        return if actual <= 0.0 {
            PacingStatus::On
        } else {
            PacingStatus::Over
        };
    }
    let ratio = actual / planned;
    if ratio < 0.9 {
        PacingStatus::Under
    } else if ratio > 1.1 {
        PacingStatus::Over
    } else {
        PacingStatus::On
    }
}

/// Percentage-band classification for the single-campaign gauge.
pub fn pace_band(pacing_pct: f64) -> PaceBand {
    if pacing_pct < 80.0 {
        PaceBand::Behind
    } else if pacing_pct < 100.0 {
        PaceBand::AtRisk
    } else {
        PaceBand::OnTrack
    }
}

/// Joins the expected series from `bursts` with the actual daily delivery.
///
/// `as_at` defaults to the last date present in the actual series, then to the
/// last expected date. To-date figures are read from cumulative maps at the
/// latest date on or before `as_at` and clamped to the full-campaign goal so a
/// late data burst can never report more than the plan itself.
pub fn calculate_pacing(
    buy_type: BuyType,
    bursts: &[Burst],
    actuals: &[DailyActual],
    as_at: Option<NaiveDate>,
) -> PacingResult {
    let expected = expected_series(bursts);
    let as_at = as_at
        .or_else(|| actuals.iter().map(|row| row.date).max())
        .or_else(|| expected.last_date())
        .unwrap_or(NaiveDate::from_ymd_opt(1970, 1, 1).expect("epoch"));

    let metric = buy_type.metric();
    let mut cumulative_spend: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    let mut cumulative_metric: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    let mut spend_sum = 0.0;
    let mut metric_sum = 0.0;
    let mut actual_spend_by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    let mut sorted: Vec<&DailyActual> = actuals.iter().collect();
    sorted.sort_by_key(|row| row.date);
    for row in sorted {
        spend_sum += row.spend;
        cumulative_spend.insert(row.date, spend_sum);
        if let Some(metric) = metric {
            metric_sum += metric.read(row);
            cumulative_metric.insert(row.date, metric_sum);
        }
        *actual_spend_by_day.entry(row.date).or_insert(0.0) += row.spend;
    }

    let spend = build_figures(
        read_cumulative(&cumulative_spend, as_at),
        expected.cumulative_spend_at(as_at),
        expected.totals.spend,
    );

    let deliverable = metric.map(|_| {
        build_figures(
            read_cumulative(&cumulative_metric, as_at),
            expected.cumulative_deliverables_at(as_at),
            expected.totals.deliverables,
        )
    });

    let series = build_series(&expected, &actual_spend_by_day);

    PacingResult {
        as_at,
        spend,
        deliverable,
        series,
    }
}

fn read_cumulative(map: &BTreeMap<NaiveDate, f64>, as_at: NaiveDate) -> f64 {
    map.range(..=as_at).next_back().map(|(_, v)| *v).unwrap_or(0.0)
}

fn build_figures(actual_to_date: f64, expected_to_date: f64, goal_total: f64) -> PacingFigures {
    // Clamp only against a real goal; a zero goal would erase actual spend and
    // hide an over-delivery against no plan.
    let clamp = |value: f64| {
        if goal_total > 0.0 {
            value.min(goal_total)
        } else {
            value
        }
    };
    let actual = clamp(actual_to_date);
    let expected = clamp(expected_to_date);
    let pacing_pct = if expected > 0.0 {
        round2(actual / expected * 100.0)
    } else {
        0.0
    };
    PacingFigures {
        actual_to_date: round2(actual),
        expected_to_date: round2(expected),
        delta: round2(actual - expected),
        pacing_pct,
        goal_total: round2(goal_total),
        status: pacing_status(actual, expected),
    }
}

fn build_series(
    expected: &ExpectedSeries,
    actual_by_day: &BTreeMap<NaiveDate, f64>,
) -> Vec<SeriesPoint> {
    let mut dates: std::collections::BTreeSet<NaiveDate> =
        expected.daily.iter().map(|point| point.date).collect();
    dates.extend(actual_by_day.keys().copied());

    let expected_by_day: BTreeMap<NaiveDate, f64> = expected
        .daily
        .iter()
        .map(|point| (point.date, point.spend))
        .collect();

    dates
        .into_iter()
        .map(|date| SeriesPoint {
            date,
            expected: expected_by_day.get(&date).copied().unwrap_or(0.0),
            actual: round2(actual_by_day.get(&date).copied().unwrap_or(0.0)),
        })
        .collect()
}
