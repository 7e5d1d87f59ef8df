//! Monthly billing schedule: auto-computed from bursts, with an
//! operator-owned manual override gated by budget reconciliation.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::domain::burst::{Burst, ChannelCategory};
use crate::domain::common::{DateRange, MonthKey};
use crate::engine::fees::allocate_burst;
use crate::engine::proration::overlap_fraction;
use crate::errors::{EngineError, EngineResult};
use crate::utils::round2;

/// One calendar month's aggregated amounts for a single campaign.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyBillingRow {
    pub month: MonthKey,
    /// Per-channel media amounts; serialized as flat `"search": 20000.0` keys.
    #[serde(flatten)]
    pub channels: BTreeMap<ChannelCategory, f64>,
    pub fee_amount: f64,
    pub total_amount: f64,
}

impl MonthlyBillingRow {
    pub fn new(month: MonthKey) -> Self {
        Self {
            month,
            channels: BTreeMap::new(),
            fee_amount: 0.0,
            total_amount: 0.0,
        }
    }

    pub fn month_label(&self) -> String {
        self.month.label()
    }

    pub fn channel_amount(&self, channel: &ChannelCategory) -> f64 {
        self.channels.get(channel).copied().unwrap_or(0.0)
    }

    /// Total is always derived from the components, never edited directly.
    pub fn recompute_total(&mut self) {
        let channel_sum: f64 = self.channels.values().sum();
        self.total_amount = round2(channel_sum + self.fee_amount);
    }
}

/// Builds one row per calendar month overlapping the campaign range.
///
/// Per month and burst: the day-overlap fraction scales the fee split;
/// production bursts prorate their budget as media only. Rounding to two
/// decimals happens after per-month summation.
pub fn build_auto_schedule(bursts: &[Burst], campaign: &DateRange) -> Vec<MonthlyBillingRow> {
    let channel_axis: BTreeSet<ChannelCategory> =
        bursts.iter().map(|b| b.channel.clone()).collect();

    MonthKey::span(campaign)
        .into_iter()
        .map(|month| {
            let window = month.range();
            let mut media: BTreeMap<ChannelCategory, f64> = BTreeMap::new();
            let mut fee = 0.0;
            for burst in bursts {
                let fraction = overlap_fraction(&window, &burst.range);
                if fraction <= 0.0 {
                    continue;
                }
                if burst.channel.is_production() {
                    *media.entry(burst.channel.clone()).or_insert(0.0) +=
                        burst.budget_amount * fraction;
                } else {
                    let split = allocate_burst(burst);
                    *media.entry(burst.channel.clone()).or_insert(0.0) +=
                        split.media_amount * fraction;
                    fee += split.fee_amount * fraction;
                }
            }

            let mut row = MonthlyBillingRow::new(month);
            for channel in &channel_axis {
                let amount = media.get(channel).copied().unwrap_or(0.0);
                row.channels.insert(channel.clone(), round2(amount));
            }
            row.fee_amount = round2(fee);
            row.recompute_total();
            row
        })
        .collect()
}

/// Billing view of one campaign: auto rows recomputed from bursts, or manual
/// rows persisted verbatim until explicitly reset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BillingSchedule {
    campaign: DateRange,
    bursts: Vec<Burst>,
    manual: Option<Vec<MonthlyBillingRow>>,
}

impl BillingSchedule {
    pub fn new(campaign: DateRange, bursts: Vec<Burst>) -> Self {
        Self {
            campaign,
            bursts,
            manual: None,
        }
    }

    pub fn is_manual(&self) -> bool {
        self.manual.is_some()
    }

    /// Current rows: the manual override when present, else fresh auto rows.
    pub fn rows(&self) -> Vec<MonthlyBillingRow> {
        match &self.manual {
            Some(rows) => rows.clone(),
            None => build_auto_schedule(&self.bursts, &self.campaign),
        }
    }

    /// Replaces bursts; auto rows pick the change up immediately, a manual
    /// override keeps its operator-edited values until reset.
    pub fn update_bursts(&mut self, bursts: Vec<Burst>) {
        self.bursts = bursts;
    }

    /// Accepts operator-edited rows after budget reconciliation.
    ///
    /// Row totals are recomputed from their components first, then the grand
    /// total must land within `tolerance` currency units of the campaign
    /// budget; otherwise the mismatch is returned and nothing changes.
    pub fn save_manual(
        &mut self,
        mut rows: Vec<MonthlyBillingRow>,
        campaign_budget: f64,
        tolerance: f64,
    ) -> EngineResult<()> {
        for row in &mut rows {
            row.fee_amount = round2(row.fee_amount);
            for amount in row.channels.values_mut() {
                *amount = round2(*amount);
            }
            row.recompute_total();
        }
        let total: f64 = rows.iter().map(|row| row.total_amount).sum();
        let delta = round2((total - campaign_budget).abs());
        if delta > tolerance {
            return Err(EngineError::BudgetMismatch { delta });
        }
        self.manual = Some(rows);
        Ok(())
    }

    /// Discards the manual override; rows are recomputed from bursts again.
    pub fn reset(&mut self) {
        self.manual = None;
    }
}
