//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{OutputMode, DEFAULT_CONFIG_PATH};

#[derive(Parser)]
#[command(name = "trackip")]
#[command(author, version, about = "Tracker host list to public IPv4 blocklist converter")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file path (built-in defaults are used if the default file is missing)
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH, global = true)]
    pub config: PathBuf,

    /// Quiet mode (for cron/systemd timer)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug output)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download tracker lists, resolve every host and write the blocklist
    Update {
        /// Output mode override (flat, structured)
        #[arg(long, value_enum)]
        mode: Option<OutputMode>,

        /// Use the previously downloaded list files instead of fetching them
        #[arg(long)]
        offline: bool,

        /// Resolve and print summaries but don't write output files
        #[arg(long)]
        dry_run: bool,
    },

    /// Resolve a single host name to its public IPv4 addresses
    Resolve {
        /// Host name to resolve
        host: String,
    },

    /// Check whether an IPv4 address is public (blockable) or discarded
    Check {
        /// IPv4 address to check
        ip: String,
    },

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show version
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_update_flags() {
        let cli = Cli::parse_from(["trackip", "update", "--mode", "structured", "--offline", "-q"]);
        assert!(cli.quiet);
        match cli.command {
            Commands::Update {
                mode,
                offline,
                dry_run,
            } => {
                assert_eq!(mode, Some(OutputMode::Structured));
                assert!(offline);
                assert!(!dry_run);
            }
            _ => panic!("expected update"),
        }
    }

    #[test]
    fn test_default_config_path() {
        let cli = Cli::parse_from(["trackip", "version"]);
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_PATH));
    }

    #[test]
    fn test_reject_unknown_mode() {
        assert!(Cli::try_parse_from(["trackip", "update", "--mode", "csv"]).is_err());
    }
}
