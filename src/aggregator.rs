//! Combine source reports into the final blocklist outputs.
//!
//! Two output shapes are supported:
//! - flat: one deduplicated address list across every source, numerically sorted
//! - structured: one JSON document per source, `tracker -> host -> [addresses]`

use anyhow::{Context, Result};
use ipnet::Ipv4Net;
use std::collections::BTreeSet;
use std::io::Write;
use std::net::Ipv4Addr;
use std::path::Path;
use tempfile::NamedTempFile;

use crate::sources::{SourceReport, TrackerMap};

/// Union of every source's addresses, deduplicated and in ascending numeric order.
///
/// Ordering is by the 32-bit value of each address (`2.2.2.2` < `10.0.0.1` <
/// `192.0.2.1`), not by the dotted-quad text.
pub fn merge_flat(reports: &[SourceReport]) -> Vec<Ipv4Addr> {
    let merged: BTreeSet<Ipv4Addr> = reports.iter().flat_map(SourceReport::unique_ips).collect();
    merged.into_iter().collect()
}

/// Collapse contiguous addresses into the smallest covering set of CIDR blocks.
pub fn aggregate_cidrs(ips: &[Ipv4Addr]) -> Vec<Ipv4Net> {
    let nets: Vec<Ipv4Net> = ips.iter().map(|ip| Ipv4Net::from(*ip)).collect();
    Ipv4Net::aggregate(&nets)
}

/// Render the flat list, one entry per line.
pub fn render_flat(ips: &[Ipv4Addr]) -> String {
    ips.iter().map(|ip| format!("{}\n", ip)).collect()
}

/// Render aggregated CIDR blocks, one per line. Single hosts keep their bare form.
pub fn render_cidrs(nets: &[Ipv4Net]) -> String {
    nets.iter()
        .map(|net| {
            if net.prefix_len() == 32 {
                format!("{}\n", net.addr())
            } else {
                format!("{}\n", net)
            }
        })
        .collect()
}

/// Render one source's tracker map as pretty JSON with sorted keys.
pub fn render_structured(trackers: &TrackerMap) -> Result<String> {
    let mut json =
        serde_json::to_string_pretty(trackers).context("Failed to serialize tracker map")?;
    json.push('\n');
    Ok(json)
}

/// Human-readable summary block for the end of a run.
pub fn format_summary(reports: &[SourceReport], flat_total: Option<usize>) -> String {
    const RULE: &str = "---------------------------------------------------------------";

    let mut out = String::new();
    for report in reports {
        out.push_str(RULE);
        out.push('\n');
        out.push_str(&report.to_string());
        out.push('\n');
    }
    out.push_str(RULE);
    out.push('\n');
    if let Some(total) = flat_total {
        out.push_str(&format!("Summary IP count: {}\n", total));
    }
    out
}

/// Write `content` to `path` atomically (tempfile in the same directory + rename).
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let parent_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent_dir)
        .with_context(|| format!("Failed to create output directory {:?}", parent_dir))?;

    let mut temp_file = NamedTempFile::new_in(parent_dir)
        .with_context(|| format!("Failed to create temporary file in {:?}", parent_dir))?;
    temp_file.write_all(content.as_bytes())?;
    temp_file.as_file().sync_all()?;
    temp_file
        .persist(path)
        .with_context(|| format!("Failed to persist output file: {:?}", path))?;

    Ok(())
}
