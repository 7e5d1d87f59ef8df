//! Upstream collaborators: version/master stores and per-channel analytics
//! tables, fanned out concurrently with a bounded timeout.
//!
//! A failed or slow source degrades to an empty result for that source; the
//! rest of the aggregation proceeds. A fully-empty outcome is still valid
//! unless the caller requires at least one successful source.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use thiserror::Error;
use tracing::warn;

use crate::config::EngineConfig;
use crate::domain::actuals::{merge_daily, ActualRecord, DailyActual};
use crate::domain::version::{CampaignVersion, MasterRecord};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("source {source_name} unavailable: {reason}")]
    SourceUnavailable { source_name: String, reason: String },
    #[error("source {source_name} timed out after {timeout:?}")]
    Timeout { source_name: String, timeout: Duration },
    #[error("all upstream sources failed")]
    AllSourcesFailed,
}

/// A store of campaign versions (and their master records).
#[async_trait]
pub trait VersionSource: Send + Sync {
    fn name(&self) -> &str;
    async fn fetch_versions(&self) -> Result<Vec<CampaignVersion>, FetchError>;
    async fn fetch_masters(&self) -> Result<Vec<MasterRecord>, FetchError> {
        Ok(Vec::new())
    }
}

/// One analytics table of daily delivery rows, typically one per channel.
#[async_trait]
pub trait ActualsSource: Send + Sync {
    fn name(&self) -> &str;
    async fn fetch_actuals(&self, campaign_ref: &str) -> Result<Vec<ActualRecord>, FetchError>;
}

/// Request-scoped memoization handed in by the caller.
///
/// Replaces hidden module-level caching: the cache lives exactly as long as
/// the request that owns it, so no state leaks across requests.
#[derive(Debug, Default)]
pub struct RequestCache {
    versions: Option<Vec<CampaignVersion>>,
    masters: Option<Vec<MasterRecord>>,
    actuals: HashMap<String, Vec<DailyActual>>,
}

impl RequestCache {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Fetches versions from every source concurrently and concatenates the
/// results, memoized in `cache` for the life of the request.
pub async fn gather_versions(
    sources: &[Box<dyn VersionSource>],
    config: &EngineConfig,
    cache: &mut RequestCache,
) -> Result<Vec<CampaignVersion>, FetchError> {
    if let Some(cached) = &cache.versions {
        return Ok(cached.clone());
    }
    let fetches = sources
        .iter()
        .map(|source| bounded(source.name(), config.fetch_timeout(), source.fetch_versions()));
    let (merged, succeeded) = collect_degraded(join_all(fetches).await);
    if succeeded == 0 && !sources.is_empty() && config.require_successful_source {
        return Err(FetchError::AllSourcesFailed);
    }
    cache.versions = Some(merged.clone());
    Ok(merged)
}

/// Fetches master records from every version source concurrently.
pub async fn gather_masters(
    sources: &[Box<dyn VersionSource>],
    config: &EngineConfig,
    cache: &mut RequestCache,
) -> Result<Vec<MasterRecord>, FetchError> {
    if let Some(cached) = &cache.masters {
        return Ok(cached.clone());
    }
    let fetches = sources
        .iter()
        .map(|source| bounded(source.name(), config.fetch_timeout(), source.fetch_masters()));
    let (merged, succeeded) = collect_degraded(join_all(fetches).await);
    if succeeded == 0 && !sources.is_empty() && config.require_successful_source {
        return Err(FetchError::AllSourcesFailed);
    }
    cache.masters = Some(merged.clone());
    Ok(merged)
}

/// Fetches a campaign's delivery rows from every channel table concurrently,
/// skips malformed rows, and merges the remainder into one row per day.
pub async fn gather_actuals(
    sources: &[Box<dyn ActualsSource>],
    campaign_ref: &str,
    config: &EngineConfig,
    cache: &mut RequestCache,
) -> Result<Vec<DailyActual>, FetchError> {
    if let Some(cached) = cache.actuals.get(campaign_ref) {
        return Ok(cached.clone());
    }
    let fetches = sources.iter().map(|source| {
        bounded(
            source.name(),
            config.fetch_timeout(),
            source.fetch_actuals(campaign_ref),
        )
    });
    let (raw, succeeded) = collect_degraded(join_all(fetches).await);
    if succeeded == 0 && !sources.is_empty() && config.require_successful_source {
        return Err(FetchError::AllSourcesFailed);
    }
    let merged = merge_daily(ActualRecord::parse_all(&raw));
    cache
        .actuals
        .insert(campaign_ref.to_string(), merged.clone());
    Ok(merged)
}

/// Applies the per-source timeout and tags timeouts with the source name.
async fn bounded<T>(
    name: &str,
    limit: Duration,
    fetch: impl std::future::Future<Output = Result<Vec<T>, FetchError>>,
) -> Result<Vec<T>, FetchError> {
    match tokio::time::timeout(limit, fetch).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::Timeout {
            source_name: name.to_string(),
            timeout: limit,
        }),
    }
}

/// Concatenates successful results; failures log a warning and contribute
/// nothing. Returns the merged rows and the success count.
fn collect_degraded<T>(results: Vec<Result<Vec<T>, FetchError>>) -> (Vec<T>, usize) {
    let mut merged = Vec::new();
    let mut succeeded = 0;
    for result in results {
        match result {
            Ok(rows) => {
                succeeded += 1;
                merged.extend(rows);
            }
            Err(error) => warn!(%error, "upstream source degraded to empty result"),
        }
    }
    (merged, succeeded)
}
