//! Disconnect.me tracking protection list (`services.json`).
//!
//! Layout: `categories -> [ { tracker: { "http://vendor/": [host, ...], "meta": ... } } ]`.
//! Only keys that look like URLs carry host lists; the rest are per-tracker flags.

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

use super::{collect_results, resolve_hosts, HostLookup, ResolutionSummary, SourceReport};
use crate::dns::Resolver;
use crate::error::TrackipError;

pub const SOURCE_NAME: &str = "Disconnect.me";

type TrackerEntry = BTreeMap<String, BTreeMap<String, Value>>;

/// Top-level Disconnect.me document.
#[derive(Debug, Clone, Deserialize)]
pub struct DisconnectDocument {
    categories: BTreeMap<String, Vec<TrackerEntry>>,
}

/// A tracker's hosts as listed under one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisconnectTracker {
    pub category: String,
    pub name: String,
    pub hosts: Vec<String>,
}

impl DisconnectDocument {
    /// Parse a `services.json` document. A schema mismatch is fatal for the run.
    pub fn from_json(content: &str) -> Result<Self, TrackipError> {
        serde_json::from_str(content)
            .map_err(|e| TrackipError::malformed(SOURCE_NAME, e.to_string()))
    }

    /// Flatten the nested category layout into per-tracker host lists.
    ///
    /// Keys not starting with `http` are metadata and skipped. A URL key whose value is
    /// not a list of strings means the upstream schema changed.
    pub fn trackers(&self) -> Result<Vec<DisconnectTracker>, TrackipError> {
        let mut trackers = Vec::new();

        for (category, entries) in &self.categories {
            for entry in entries {
                for (name, urls) in entry {
                    let mut hosts = Vec::new();
                    for (url, value) in urls {
                        if !url.starts_with("http") {
                            continue;
                        }
                        hosts.extend(host_list(name, url, value)?);
                    }
                    trackers.push(DisconnectTracker {
                        category: category.clone(),
                        name: name.clone(),
                        hosts,
                    });
                }
            }
        }

        Ok(trackers)
    }
}

fn host_list(tracker: &str, url: &str, value: &Value) -> Result<Vec<String>, TrackipError> {
    let invalid = || {
        TrackipError::malformed(
            SOURCE_NAME,
            format!("tracker '{}' url '{}': expected a list of host names", tracker, url),
        )
    };

    value
        .as_array()
        .ok_or_else(invalid)?
        .iter()
        .map(|host| host.as_str().map(str::to_string).ok_or_else(invalid))
        .collect()
}

/// Resolve every low-level host of every tracker in `document`.
///
/// A tracker listed under several categories keeps the union of its host maps.
pub async fn extract<R: Resolver + ?Sized>(
    document: &DisconnectDocument,
    resolver: &R,
    concurrency: usize,
) -> Result<SourceReport, TrackipError> {
    let mut lookups = Vec::new();

    for tracker in document.trackers()? {
        debug!(
            "Tracker '{}' ({}) has {} hosts",
            tracker.name,
            tracker.category,
            tracker.hosts.len()
        );
        lookups.extend(tracker.hosts.into_iter().map(|host| HostLookup {
            tracker: tracker.name.clone(),
            host,
        }));
    }

    let total_host_count = lookups.len();
    let results = resolve_hosts(resolver, lookups, concurrency).await;
    let (trackers, resolved_ip_count, unresolved_host_count) = collect_results(results);

    Ok(SourceReport {
        name: SOURCE_NAME,
        trackers,
        summary: ResolutionSummary {
            total_host_count,
            ignored_trackers_count: 0,
            unresolved_host_count,
            resolved_ip_count,
        },
    })
}
