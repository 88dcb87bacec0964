//! Exodus Privacy tracker export.
//!
//! Each tracker carries a `network_signature`: a regex-like alternation of host names
//! (`a\.example\.com|\.b\.example\.com`). The signature is flattened into literal host
//! names, each of which is resolved on its own.

use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{debug, error, info};

use super::{collect_results, resolve_hosts, HostLookup, ResolutionSummary, SourceReport};
use crate::dns::Resolver;
use crate::error::TrackipError;

pub const SOURCE_NAME: &str = "Exodus";

/// Top-level Exodus document.
#[derive(Debug, Clone, Deserialize)]
pub struct ExodusDocument {
    trackers: ExodusTrackers,
}

/// The export has shipped both as a plain list and as an object keyed by tracker id.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ExodusTrackers {
    List(Vec<ExodusTracker>),
    ById(BTreeMap<String, ExodusTracker>),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExodusTracker {
    pub name: String,
    pub network_signature: String,
}

impl ExodusDocument {
    /// Parse an Exodus export. A schema mismatch is fatal for the run.
    pub fn from_json(content: &str) -> Result<Self, TrackipError> {
        serde_json::from_str(content)
            .map_err(|e| TrackipError::malformed(SOURCE_NAME, e.to_string()))
    }

    pub fn trackers(&self) -> Vec<&ExodusTracker> {
        match &self.trackers {
            ExodusTrackers::List(list) => list.iter().collect(),
            ExodusTrackers::ById(map) => map.values().collect(),
        }
    }
}

/// Split a network signature into its literal host alternatives.
///
/// Backslashes are dropped and the remainder split on `|`. Empty alternatives
/// (`a.com||b.com`, trailing `|`) carry no host and are skipped.
///
/// # Examples
/// ```
/// use trackip::sources::exodus::expand_host_pattern;
/// assert_eq!(expand_host_pattern("a\\.com|b\\.com"), vec!["a.com", "b.com"]);
/// ```
pub fn expand_host_pattern(pattern: &str) -> Vec<String> {
    pattern
        .replace('\\', "")
        .split('|')
        .filter(|alt| !alt.is_empty())
        .map(str::to_string)
        .collect()
}

/// Strip the wildcard-subdomain marker from an alternative.
///
/// Returns the bare parent domain and whether anything was removed. `.sub.example.com`
/// cannot be queried as such, so the parent is resolved instead.
pub fn simplify_host(alternative: &str) -> (&str, bool) {
    let host = alternative.trim_start_matches('.');
    (host, host.len() != alternative.len())
}

/// Resolve every host of every tracker in `document`.
pub async fn extract<R: Resolver + ?Sized>(
    document: &ExodusDocument,
    resolver: &R,
    concurrency: usize,
) -> SourceReport {
    let mut lookups = Vec::new();
    let mut ignored_trackers_count = 0;

    for tracker in document.trackers() {
        if tracker.network_signature.is_empty() {
            ignored_trackers_count += 1;
            debug!("Ignore tracker '{}' (no network signature)", tracker.name);
            continue;
        }

        let alternatives = expand_host_pattern(&tracker.network_signature);
        info!(
            "Tracker '{}' has {} hosts",
            tracker.name,
            alternatives.len()
        );

        for alternative in &alternatives {
            let (host, simplified) = simplify_host(alternative);
            if host.is_empty() {
                debug!(
                    "Tracker '{}': skip alternative '{}' (no host name)",
                    tracker.name, alternative
                );
                continue;
            }
            if simplified {
                error!(
                    "Tracker '{}': wildcard host '{}' simplified to '{}'",
                    tracker.name, alternative, host
                );
            }
            lookups.push(HostLookup {
                tracker: tracker.name.clone(),
                host: host.to_string(),
            });
        }
    }

    let total_host_count = lookups.len();
    let results = resolve_hosts(resolver, lookups, concurrency).await;
    let (trackers, resolved_ip_count, unresolved_host_count) = collect_results(results);

    SourceReport {
        name: SOURCE_NAME,
        trackers,
        summary: ResolutionSummary {
            total_host_count,
            ignored_trackers_count,
            unresolved_host_count,
            resolved_ip_count,
        },
    }
}
