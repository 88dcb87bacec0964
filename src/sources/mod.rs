//! Tracker list sources and the data they produce.
//!
//! Each source walks its own JSON schema, turns it into a flat list of host lookups and
//! hands that list to [`resolve_hosts`]. Results come back as a [`SourceReport`]: the
//! per-tracker host map plus an immutable [`ResolutionSummary`].

pub mod disconnect;
pub mod exodus;

use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::net::Ipv4Addr;

use crate::dns::{resolve_public, Resolver};

/// Tracker name -> host name -> public addresses.
///
/// `BTreeMap`/`BTreeSet` keep keys alphabetical and addresses in numeric order, so the
/// serialized form is stable from run to run.
pub type TrackerMap = BTreeMap<String, BTreeMap<String, BTreeSet<Ipv4Addr>>>;

/// Counters for one source, built once after all of its hosts were resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionSummary {
    pub total_host_count: usize,
    /// Only meaningful for Exodus: trackers without a network signature
    pub ignored_trackers_count: usize,
    pub unresolved_host_count: usize,
    pub resolved_ip_count: usize,
}

/// Everything one source contributed to a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReport {
    pub name: &'static str,
    pub trackers: TrackerMap,
    pub summary: ResolutionSummary,
}

impl SourceReport {
    /// Distinct addresses across all trackers of this source, numerically sorted.
    pub fn unique_ips(&self) -> BTreeSet<Ipv4Addr> {
        self.trackers
            .values()
            .flat_map(|hosts| hosts.values())
            .flat_map(|ips| ips.iter().copied())
            .collect()
    }
}

impl fmt::Display for SourceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.summary;
        writeln!(f, "{} trackers summary", self.name)?;
        writeln!(f, "  Total host count       : {}", s.total_host_count)?;
        if self.name == exodus::SOURCE_NAME {
            writeln!(f, "  Ignored trackers count : {}", s.ignored_trackers_count)?;
        }
        writeln!(f, "  Resolved IP count      : {}", s.resolved_ip_count)?;
        writeln!(f, "  Unique IP count        : {}", self.unique_ips().len())?;
        write!(f, "  Unresolved host count  : {}", s.unresolved_host_count)
    }
}

/// One host to look up on behalf of a tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HostLookup {
    pub tracker: String,
    pub host: String,
}

/// Resolve every lookup with at most `concurrency` queries in flight.
///
/// Results are yielded in submission order regardless of completion order, so a
/// concurrent run logs and counts exactly like a sequential one.
pub(crate) async fn resolve_hosts<R: Resolver + ?Sized>(
    resolver: &R,
    lookups: Vec<HostLookup>,
    concurrency: usize,
) -> Vec<(HostLookup, BTreeSet<Ipv4Addr>)> {
    stream::iter(lookups.into_iter().map(|lookup| async move {
        let ips = resolve_public(resolver, &lookup.host).await;
        (lookup, ips)
    }))
    .buffered(concurrency.max(1))
    .collect()
    .await
}

/// Fold resolved lookups into a tracker map, counting hits and misses.
///
/// Hosts seen more than once (same tracker listed in several places) are merged by set
/// union rather than overwritten.
pub(crate) fn collect_results(
    results: Vec<(HostLookup, BTreeSet<Ipv4Addr>)>,
) -> (TrackerMap, usize, usize) {
    let mut trackers = TrackerMap::new();
    let mut resolved_ips = 0;
    let mut unresolved_hosts = 0;

    for (lookup, ips) in results {
        if ips.is_empty() {
            unresolved_hosts += 1;
            continue;
        }
        resolved_ips += ips.len();
        trackers
            .entry(lookup.tracker)
            .or_default()
            .entry(lookup.host)
            .or_default()
            .extend(ips);
    }

    (trackers, resolved_ips, unresolved_hosts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::MockResolver;
    use crate::error::ResolveError;

    fn lookup(tracker: &str, host: &str) -> HostLookup {
        HostLookup {
            tracker: tracker.to_string(),
            host: host.to_string(),
        }
    }

    #[tokio::test]
    async fn test_resolve_hosts_keeps_submission_order() {
        let mut mock = MockResolver::new();
        mock.expect_lookup_ipv4().returning(|host| match host {
            "a.example.com" => Ok(vec!["1.1.1.1".parse().unwrap()]),
            "b.example.com" => Ok(vec!["2.2.2.2".parse().unwrap()]),
            _ => Err(ResolveError::Lookup("NXDOMAIN".to_string())),
        });

        let lookups = vec![
            lookup("T", "b.example.com"),
            lookup("T", "missing.example.com"),
            lookup("T", "a.example.com"),
        ];
        let results = resolve_hosts(&mock, lookups, 4).await;

        let hosts: Vec<_> = results.iter().map(|(l, _)| l.host.as_str()).collect();
        assert_eq!(
            hosts,
            vec!["b.example.com", "missing.example.com", "a.example.com"]
        );
        assert!(results[1].1.is_empty());
    }

    #[test]
    fn test_collect_results_merges_and_counts() {
        let one: BTreeSet<Ipv4Addr> = ["1.1.1.1".parse().unwrap()].into_iter().collect();
        let two: BTreeSet<Ipv4Addr> = ["2.2.2.2".parse().unwrap()].into_iter().collect();

        let (trackers, resolved, unresolved) = collect_results(vec![
            (lookup("T", "x.com"), one),
            (lookup("T", "x.com"), two),
            (lookup("T", "y.com"), BTreeSet::new()),
        ]);

        assert_eq!(resolved, 2);
        assert_eq!(unresolved, 1);
        assert_eq!(trackers["T"]["x.com"].len(), 2);
        assert!(!trackers["T"].contains_key("y.com"));
    }

    #[test]
    fn test_unique_ips_across_trackers() {
        let mut trackers = TrackerMap::new();
        let shared: Ipv4Addr = "9.9.9.9".parse().unwrap();
        trackers
            .entry("A".to_string())
            .or_default()
            .insert("a.com".to_string(), [shared].into_iter().collect());
        trackers
            .entry("B".to_string())
            .or_default()
            .insert("b.com".to_string(), [shared].into_iter().collect());

        let report = SourceReport {
            name: "Test",
            trackers,
            summary: ResolutionSummary::default(),
        };
        assert_eq!(report.unique_ips().len(), 1);
    }
}
