//! Full accrual pipeline: concurrent upstream fetch, version selection, and
//! the monthly rollup, with a degraded source in the mix.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};

use pacing_core::config::EngineConfig;
use pacing_core::domain::{
    Burst, CampaignVersion, ChannelCategory, DateRange, LineItem, MasterRecord, MonthKey,
};
use pacing_core::engine::accrual_report;
use pacing_core::fetch::{gather_masters, gather_versions, FetchError, RequestCache, VersionSource};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn burst(start: &str, end: &str, budget: f64) -> Burst {
    Burst {
        range: DateRange::new(date(start), date(end)).unwrap(),
        budget_amount: budget,
        deliverable_amount: 0.0,
        fee_percentage: 20.0,
        client_pays_for_media: false,
        budget_includes_fees: false,
        channel: ChannelCategory::Search,
    }
}

fn version(record_id: i64, number: i64, budget: f64) -> CampaignVersion {
    CampaignVersion {
        record_id,
        campaign_ref: "CMP-1".into(),
        client_ref: "client-a".into(),
        version_number: Some(number),
        linking_id: None,
        created_at: Some(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()),
        updated_at: None,
        line_items: vec![LineItem {
            external_id: format!("li-{record_id}"),
            channel: ChannelCategory::Search,
            client_pays_for_media: false,
            delivery_schedule: vec![burst("2026-06-01", "2026-06-30", budget)],
            billing_schedule: vec![],
        }],
    }
}

struct PlanStore;

#[async_trait]
impl VersionSource for PlanStore {
    fn name(&self) -> &str {
        "plan-store"
    }

    async fn fetch_versions(&self) -> Result<Vec<CampaignVersion>, FetchError> {
        Ok(vec![version(1, 1, 1000.0), version(2, 2, 6000.0)])
    }

    async fn fetch_masters(&self) -> Result<Vec<MasterRecord>, FetchError> {
        Ok(vec![MasterRecord {
            campaign_ref: "cmp-1".into(),
            latest_version_number: Some(2),
            linking_id: None,
        }])
    }
}

struct ArchiveStore;

#[async_trait]
impl VersionSource for ArchiveStore {
    fn name(&self) -> &str {
        "archive-store"
    }

    async fn fetch_versions(&self) -> Result<Vec<CampaignVersion>, FetchError> {
        Err(FetchError::SourceUnavailable {
            source_name: "archive-store".into(),
            reason: "maintenance window".into(),
        })
    }
}

#[tokio::test]
async fn degraded_source_still_yields_a_full_report() {
    let sources: Vec<Box<dyn VersionSource>> = vec![Box::new(PlanStore), Box::new(ArchiveStore)];
    let config = EngineConfig::default();
    let mut cache = RequestCache::new();

    let versions = gather_versions(&sources, &config, &mut cache).await.unwrap();
    let masters = gather_masters(&sources, &config, &mut cache).await.unwrap();
    assert_eq!(versions.len(), 2);
    assert_eq!(masters.len(), 1);

    let months = vec![
        MonthKey::new(2026, 5).unwrap(),
        MonthKey::new(2026, 6).unwrap(),
        MonthKey::new(2026, 7).unwrap(),
    ];
    let rows = accrual_report(&versions, &masters, &months, &HashMap::new());

    // One campaign, dense over the requested month axis.
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].total_amount, 0.0);
    // The master points at version 2, so its 6000 budget wins.
    assert_eq!(rows[1].media_amount, 6000.0);
    assert_eq!(rows[1].fee_amount, 1500.0);
    assert_eq!(rows[1].total_amount, 7500.0);
    assert_eq!(rows[2].total_amount, 0.0);
    assert_eq!(rows[1].client_ref, "client-a");
    assert_eq!(rows[1].month.to_string(), "2026-06");
}

#[tokio::test]
async fn payment_responsibility_lookup_flows_into_rows() {
    let sources: Vec<Box<dyn VersionSource>> = vec![Box::new(PlanStore)];
    let config = EngineConfig::default();
    let mut cache = RequestCache::new();

    let versions = gather_versions(&sources, &config, &mut cache).await.unwrap();
    let masters = gather_masters(&sources, &config, &mut cache).await.unwrap();
    let months = vec![MonthKey::new(2026, 6).unwrap()];
    let flags = HashMap::from([("li-2".to_string(), true)]);

    let rows = accrual_report(&versions, &masters, &months, &flags);
    assert_eq!(rows.len(), 1);
    // Client pays the publisher directly: only the fee accrues.
    assert_eq!(rows[0].media_amount, 0.0);
    assert_eq!(rows[0].fee_amount, 1500.0);
    assert!(rows[0].client_pays_for_media);
}
