//! Accrual rollup: monthly finance view across campaigns.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::common::MonthKey;
use crate::domain::version::{CampaignVersion, MasterRecord};
use crate::engine::fees::allocate;
use crate::engine::proration::overlap_fraction;
use crate::engine::versions::select_authoritative;
use crate::utils::round2;

/// One (client, campaign, month) aggregation for finance accrual reporting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccrualRow {
    pub client_ref: String,
    pub campaign_ref: String,
    pub month: MonthKey,
    pub media_amount: f64,
    pub fee_amount: f64,
    pub total_amount: f64,
    /// Merged media-payment treatment: true when every contributing line item
    /// resolved to client-paid media for this campaign.
    pub client_pays_for_media: bool,
}

/// Rolls the selected versions' bursts into one row per (client, campaign,
/// requested month).
///
/// Payment responsibility comes from the per-line-item lookup, falling back
/// to each burst's own flag when the line item has no entry. Months with no
/// activity still emit explicit zero rows so downstream consumers get a dense
/// month axis. Rounding to two decimals happens after per-month summation.
pub fn compute_accrual_rows(
    versions: &[CampaignVersion],
    months: &[MonthKey],
    payment_responsibility: &HashMap<String, bool>,
) -> Vec<AccrualRow> {
    let mut rows = Vec::with_capacity(versions.len() * months.len());
    for version in versions {
        let line_flags: Vec<Option<bool>> = version
            .line_items
            .iter()
            .map(|item| payment_responsibility.get(&item.external_id).copied())
            .collect();
        let merged_client_pays = !version.line_items.is_empty()
            && version
                .line_items
                .iter()
                .zip(&line_flags)
                .all(|(item, flag)| flag.unwrap_or(item.client_pays_for_media));

        for month in months {
            let window = month.range();
            let mut media = 0.0;
            let mut fee = 0.0;
            for (item, flag) in version.line_items.iter().zip(&line_flags) {
                for burst in item.effective_bursts() {
                    let fraction = overlap_fraction(&window, &burst.range);
                    if fraction <= 0.0 {
                        continue;
                    }
                    if burst.channel.is_production() {
                        media += burst.budget_amount * fraction;
                        continue;
                    }
                    let client_pays = flag.unwrap_or(burst.client_pays_for_media);
                    let split = allocate(
                        burst.budget_amount,
                        burst.fee_percentage,
                        client_pays,
                        burst.budget_includes_fees,
                    );
                    media += split.media_amount * fraction;
                    fee += split.fee_amount * fraction;
                }
            }
            let media = round2(media);
            let fee = round2(fee);
            rows.push(AccrualRow {
                client_ref: version.client_ref.clone(),
                campaign_ref: version.campaign_ref.clone(),
                month: *month,
                media_amount: media,
                fee_amount: fee,
                total_amount: round2(media + fee),
                client_pays_for_media: merged_client_pays,
            });
        }
    }
    rows
}

/// Full accrual pipeline: pick the authoritative version per campaign, then
/// roll bursts up over the requested months.
pub fn accrual_report(
    versions: &[CampaignVersion],
    masters: &[MasterRecord],
    months: &[MonthKey],
    payment_responsibility: &HashMap<String, bool>,
) -> Vec<AccrualRow> {
    let selected = select_authoritative(versions, masters);
    compute_accrual_rows(&selected, months, payment_responsibility)
}
