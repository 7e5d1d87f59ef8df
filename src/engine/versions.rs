//! Authoritative version selection across a campaign's version history.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::domain::version::{CampaignVersion, MasterRecord};

/// Picks one authoritative version per campaign identifier.
///
/// Versions group by their normalized campaign ref; each group is reduced with
/// the tie-break chain in [`compare_versions`]. The result is sorted by
/// campaign ref, so output is independent of input order — the pick decides
/// which numbers land on invoices and must be reproducible.
pub fn select_authoritative(
    versions: &[CampaignVersion],
    masters: &[MasterRecord],
) -> Vec<CampaignVersion> {
    let master_index: BTreeMap<String, &MasterRecord> = masters
        .iter()
        .map(|master| (master.normalized_ref(), master))
        .collect();

    let mut grouped: BTreeMap<String, Vec<&CampaignVersion>> = BTreeMap::new();
    for version in versions {
        grouped
            .entry(version.normalized_ref())
            .or_default()
            .push(version);
    }

    grouped
        .into_iter()
        .filter_map(|(key, group)| {
            let master = master_index.get(&key).copied();
            group
                .into_iter()
                .max_by(|a, b| compare_versions(a, b, master))
                .cloned()
        })
        .collect()
}

/// Prioritized comparator chain; later steps engage only when the earlier
/// ones tie. A version lacking a parseable field loses to one that has it
/// (`Option` ordering: `None < Some`), absence is a signal, not an error.
///
/// 1. Matches the master's latest version number (and linking id when both
///    sides carry one).
/// 2. Higher version number.
/// 3. Most recently updated.
/// 4. Most recently created.
/// 5. Higher internal record id.
pub fn compare_versions(
    a: &CampaignVersion,
    b: &CampaignVersion,
    master: Option<&MasterRecord>,
) -> Ordering {
    let probes: [Ordering; 5] = [
        matches_master(a, master).cmp(&matches_master(b, master)),
        a.version_number.cmp(&b.version_number),
        a.updated_at.cmp(&b.updated_at),
        a.created_at.cmp(&b.created_at),
        a.record_id.cmp(&b.record_id),
    ];
    probes
        .into_iter()
        .find(|ordering| *ordering != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

fn matches_master(version: &CampaignVersion, master: Option<&MasterRecord>) -> bool {
    let Some(master) = master else {
        return false;
    };
    let number_matches = match (version.version_number, master.latest_version_number) {
        (Some(version_number), Some(latest)) => version_number == latest,
        _ => false,
    };
    if !number_matches {
        return false;
    }
    match (&version.linking_id, &master.linking_id) {
        (Some(version_link), Some(master_link)) => version_link == master_link,
        // Either side without a linking id: the number match alone decides.
        _ => true,
    }
}
