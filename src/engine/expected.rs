//! Expected daily spend/deliverable series: the plan side of pacing.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::burst::Burst;
use crate::engine::proration::per_day_amount;
use crate::utils::round2;

/// One calendar day's prorated expected spend and deliverables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpectedSeriesPoint {
    pub date: NaiveDate,
    pub spend: f64,
    pub deliverables: f64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct ExpectedTotals {
    pub spend: f64,
    pub deliverables: f64,
}

/// Daily and cumulative expected series across all bursts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpectedSeries {
    pub daily: Vec<ExpectedSeriesPoint>,
    pub cumulative: Vec<ExpectedSeriesPoint>,
    pub totals: ExpectedTotals,
}

impl ExpectedSeries {
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.daily.last().map(|point| point.date)
    }

    /// Cumulative spend at the latest point on or before `as_at`; never
    /// interpolated.
    pub fn cumulative_spend_at(&self, as_at: NaiveDate) -> f64 {
        self.cumulative
            .iter()
            .rev()
            .find(|point| point.date <= as_at)
            .map(|point| point.spend)
            .unwrap_or(0.0)
    }

    pub fn cumulative_deliverables_at(&self, as_at: NaiveDate) -> f64 {
        self.cumulative
            .iter()
            .rev()
            .find(|point| point.date <= as_at)
            .map(|point| point.deliverables)
            .unwrap_or(0.0)
    }
}

/// Spreads each burst's spend and deliverables evenly across its covered days
/// (flat proration, no day-of-week weighting) and merges all bursts into one
/// ascending day-keyed series with a running cumulative.
pub fn expected_series(bursts: &[Burst]) -> ExpectedSeries {
    let mut by_day: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();
    for burst in bursts {
        let daily_spend = per_day_amount(burst.budget_amount, &burst.range);
        let daily_deliverables = per_day_amount(burst.deliverable_amount, &burst.range);
        for day in burst.range.days() {
            let entry = by_day.entry(day).or_insert((0.0, 0.0));
            entry.0 += daily_spend;
            entry.1 += daily_deliverables;
        }
    }

    let mut daily = Vec::with_capacity(by_day.len());
    let mut cumulative = Vec::with_capacity(by_day.len());
    let mut running_spend = 0.0;
    let mut running_deliverables = 0.0;
    for (date, (spend, deliverables)) in by_day {
        running_spend += spend;
        running_deliverables += deliverables;
        daily.push(ExpectedSeriesPoint {
            date,
            spend: round2(spend),
            deliverables: round2(deliverables),
        });
        cumulative.push(ExpectedSeriesPoint {
            date,
            spend: round2(running_spend),
            deliverables: round2(running_deliverables),
        });
    }

    ExpectedSeries {
        daily,
        cumulative,
        totals: ExpectedTotals {
            spend: round2(running_spend),
            deliverables: round2(running_deliverables),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::burst::ChannelCategory;
    use crate::domain::common::DateRange;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn burst(start: &str, end: &str, budget: f64, deliverables: f64) -> Burst {
        Burst {
            range: DateRange::new(date(start), date(end)).unwrap(),
            budget_amount: budget,
            deliverable_amount: deliverables,
            fee_percentage: 0.0,
            client_pays_for_media: false,
            budget_includes_fees: false,
            channel: ChannelCategory::Social,
        }
    }

    #[test]
    fn proration_conserves_the_budget() {
        let series = expected_series(&[burst("2026-06-01", "2026-06-14", 20000.0, 1400.0)]);
        assert_eq!(series.daily.len(), 14);
        assert!((series.daily[0].spend - 1428.57).abs() < 1e-9);
        assert_eq!(series.totals.spend, 20000.0);
        assert_eq!(series.totals.deliverables, 1400.0);
    }

    #[test]
    fn overlapping_bursts_stack_per_day() {
        let series = expected_series(&[
            burst("2026-06-01", "2026-06-10", 1000.0, 0.0),
            burst("2026-06-06", "2026-06-15", 500.0, 0.0),
        ]);
        assert_eq!(series.daily.len(), 15);
        assert_eq!(series.daily[0].spend, 100.0);
        assert_eq!(series.daily[5].spend, 150.0);
        assert_eq!(series.daily[14].spend, 50.0);
        assert_eq!(series.totals.spend, 1500.0);
    }

    #[test]
    fn cumulative_reads_never_interpolate() {
        let series = expected_series(&[burst("2026-06-01", "2026-06-10", 1000.0, 0.0)]);
        // Before the series starts: nothing expected yet.
        assert_eq!(series.cumulative_spend_at(date("2026-05-31")), 0.0);
        // Mid-series: the latest point at or before the date.
        assert_eq!(series.cumulative_spend_at(date("2026-06-03")), 300.0);
        // Past the end: the full total, not an extrapolation.
        assert_eq!(series.cumulative_spend_at(date("2026-07-01")), 1000.0);
    }

    #[test]
    fn empty_bursts_give_empty_series() {
        let series = expected_series(&[]);
        assert!(series.daily.is_empty());
        assert_eq!(series.totals.spend, 0.0);
        assert_eq!(series.last_date(), None);
    }
}
