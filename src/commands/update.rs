//! Update command implementation.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{info, warn};

use crate::aggregator::{
    aggregate_cidrs, format_summary, merge_flat, render_cidrs, render_flat, render_structured,
    write_atomic,
};
use crate::config::{Config, OutputMode, SourceConfig};
use crate::dns::{Resolver, SystemResolver};
use crate::fetcher::Fetcher;
use crate::sources::disconnect::{self, DisconnectDocument};
use crate::sources::exodus::{self, ExodusDocument};
use crate::sources::SourceReport;

/// Run the update command
pub async fn run(
    mode: Option<OutputMode>,
    offline: bool,
    dry_run: bool,
    config_path: &Path,
) -> Result<()> {
    let config = Config::load_or_default(config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;
    let mode = mode.unwrap_or(config.output.mode);

    if !config.exodus.enabled && !config.disconnect.enabled {
        warn!("No tracker sources enabled. Check your configuration.");
        return Ok(());
    }

    if offline {
        info!("Offline mode: using existing list files");
    } else {
        let fetcher = Fetcher::new()?;
        if config.exodus.enabled {
            fetcher
                .download_source(exodus::SOURCE_NAME, &config.exodus)
                .await?;
        }
        if config.disconnect.enabled {
            fetcher
                .download_source(disconnect::SOURCE_NAME, &config.disconnect)
                .await?;
        }
    }

    let resolver = SystemResolver::new(config.resolver.timeout_secs);
    let reports = build_reports(&config, &resolver).await?;

    let summary = if dry_run {
        info!("Dry-run mode: no output files written");
        summarize(mode, &reports)
    } else {
        write_outputs(&config, mode, &reports)?
    };

    println!();
    print!("{}", summary);

    Ok(())
}

/// Parse every enabled source from its local file and resolve its hosts.
///
/// Unreadable files and schema mismatches abort the run; per-host resolution failures
/// only show up in the counters.
pub async fn build_reports<R: Resolver + ?Sized>(
    config: &Config,
    resolver: &R,
) -> Result<Vec<SourceReport>> {
    let concurrency = config.resolver.concurrency;
    let mut reports = Vec::new();

    if config.exodus.enabled {
        let content = read_source(exodus::SOURCE_NAME, &config.exodus)?;
        let document = ExodusDocument::from_json(&content)?;
        info!("Resolving {} trackers...", exodus::SOURCE_NAME);
        reports.push(exodus::extract(&document, resolver, concurrency).await);
    }

    if config.disconnect.enabled {
        let content = read_source(disconnect::SOURCE_NAME, &config.disconnect)?;
        let document = DisconnectDocument::from_json(&content)?;
        info!("Resolving {} trackers...", disconnect::SOURCE_NAME);
        reports.push(disconnect::extract(&document, resolver, concurrency).await?);
    }

    Ok(reports)
}

fn read_source(name: &str, source: &SourceConfig) -> Result<String> {
    std::fs::read_to_string(&source.file)
        .with_context(|| format!("Failed to read {} list from {:?}", name, source.file))
}

/// Write the outputs for `mode` and return the summary text.
pub fn write_outputs(config: &Config, mode: OutputMode, reports: &[SourceReport]) -> Result<String> {
    match mode {
        OutputMode::Flat => {
            let ips = merge_flat(reports);
            let content = if config.output.aggregate_cidrs {
                let nets = aggregate_cidrs(&ips);
                info!("Aggregated {} IPs -> {} ranges", ips.len(), nets.len());
                render_cidrs(&nets)
            } else {
                render_flat(&ips)
            };
            write_atomic(&config.output.flat_file, &content)?;
            info!("Wrote {} IPs to {:?}", ips.len(), config.output.flat_file);
        }
        OutputMode::Structured => {
            for report in reports {
                let path = if report.name == exodus::SOURCE_NAME {
                    &config.output.exodus_json_file
                } else {
                    &config.output.disconnect_json_file
                };
                write_atomic(path, &render_structured(&report.trackers)?)?;
                info!(
                    "Wrote {} trackers of {} to {:?}",
                    report.trackers.len(),
                    report.name,
                    path
                );
            }
        }
    }

    Ok(summarize(mode, reports))
}

fn summarize(mode: OutputMode, reports: &[SourceReport]) -> String {
    let flat_total = match mode {
        OutputMode::Flat => Some(merge_flat(reports).len()),
        OutputMode::Structured => None,
    };
    format_summary(reports, flat_total)
}
