//! Configuration management for trackip.

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file, looked up in the working directory
pub const DEFAULT_CONFIG_PATH: &str = "trackip.yaml";

const EXODUS_URL: &str = "https://etip.exodus-privacy.eu.org/trackers/export";
const DISCONNECT_URL: &str =
    "https://raw.githubusercontent.com/disconnectme/disconnect-tracking-protection/master/services.json";

/// Upper bound for in-flight DNS queries
const MAX_CONCURRENCY: usize = 64;
const MAX_TIMEOUT_SECS: u64 = 60;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Exodus Privacy tracker export
    #[serde(deserialize_with = "exodus_source")]
    pub exodus: SourceConfig,

    /// Disconnect.me services list
    #[serde(deserialize_with = "disconnect_source")]
    pub disconnect: SourceConfig,

    /// Where and how results are written
    pub output: OutputConfig,

    /// DNS resolution settings
    pub resolver: ResolverConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exodus: SourceConfig::exodus(),
            disconnect: SourceConfig::disconnect(),
            output: OutputConfig::default(),
            resolver: ResolverConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;

        config.validate()?;

        Ok(config)
    }

    /// Load `path`, falling back to built-in defaults only when the default file is absent.
    ///
    /// An explicitly chosen config file that does not exist is an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path == Path::new(DEFAULT_CONFIG_PATH) && !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        for (name, source) in [("exodus", &self.exodus), ("disconnect", &self.disconnect)] {
            if source.enabled && !source.url.starts_with("https://") {
                anyhow::bail!("Source '{}' URL must use HTTPS: {}", name, source.url);
            }
            if source.file.as_os_str().is_empty() {
                anyhow::bail!("Source '{}' file must not be empty", name);
            }
        }

        for (name, file) in [
            ("flat_file", &self.output.flat_file),
            ("exodus_json_file", &self.output.exodus_json_file),
            ("disconnect_json_file", &self.output.disconnect_json_file),
        ] {
            if file.as_os_str().is_empty() {
                anyhow::bail!("Output '{}' must not be empty", name);
            }
        }

        if !(1..=MAX_CONCURRENCY).contains(&self.resolver.concurrency) {
            anyhow::bail!(
                "Invalid resolver.concurrency {}. Use a value between 1 and {}",
                self.resolver.concurrency,
                MAX_CONCURRENCY
            );
        }

        if !(1..=MAX_TIMEOUT_SECS).contains(&self.resolver.timeout_secs) {
            anyhow::bail!(
                "Invalid resolver.timeout_secs {}. Use a value between 1 and {}",
                self.resolver.timeout_secs,
                MAX_TIMEOUT_SECS
            );
        }

        Ok(())
    }

    /// Save configuration to YAML file atomically
    ///
    /// Uses tempfile + rename pattern to prevent corruption on crash.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self).with_context(|| "Failed to serialize config")?;
        crate::aggregator::write_atomic(path.as_ref(), &content)
    }

    /// Generate default config with comments
    pub fn generate_default_yaml() -> String {
        include_str!("../templates/config.yaml").to_string()
    }
}

/// A downloadable tracker list and its local copy.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SourceConfig {
    pub url: String,
    /// Local file the list is downloaded to (and read from with `--offline`)
    pub file: PathBuf,
    pub enabled: bool,
}

impl SourceConfig {
    pub fn exodus() -> Self {
        Self {
            url: EXODUS_URL.to_string(),
            file: PathBuf::from("exodus_trackers.json"),
            enabled: true,
        }
    }

    pub fn disconnect() -> Self {
        Self {
            url: DISCONNECT_URL.to_string(),
            file: PathBuf::from("disconnect_me_trackers.json"),
            enabled: true,
        }
    }
}

/// Fields a config file may set on a source block; anything left out keeps the
/// source's built-in value.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SourceOverrides {
    url: Option<String>,
    file: Option<PathBuf>,
    enabled: Option<bool>,
}

impl SourceOverrides {
    fn apply(self, base: SourceConfig) -> SourceConfig {
        SourceConfig {
            url: self.url.unwrap_or(base.url),
            file: self.file.unwrap_or(base.file),
            enabled: self.enabled.unwrap_or(base.enabled),
        }
    }
}

fn exodus_source<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SourceConfig, D::Error> {
    Ok(SourceOverrides::deserialize(deserializer)?.apply(SourceConfig::exodus()))
}

fn disconnect_source<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<SourceConfig, D::Error> {
    Ok(SourceOverrides::deserialize(deserializer)?.apply(SourceConfig::disconnect()))
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// One merged, numerically sorted address list across all sources
    #[default]
    Flat,
    /// Per-source JSON: tracker -> host -> addresses
    Structured,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OutputConfig {
    pub mode: OutputMode,
    pub flat_file: PathBuf,
    pub exodus_json_file: PathBuf,
    pub disconnect_json_file: PathBuf,
    /// Collapse contiguous addresses of the flat list into CIDR blocks
    pub aggregate_cidrs: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            mode: OutputMode::Flat,
            flat_file: PathBuf::from("result_ips.txt"),
            exodus_json_file: PathBuf::from("exodus_trackers_ips.json"),
            disconnect_json_file: PathBuf::from("disconnect_me_trackers_ips.json"),
            aggregate_cidrs: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ResolverConfig {
    /// Per-lookup timeout
    pub timeout_secs: u64,
    /// Number of lookups in flight; 1 resolves strictly one host at a time
    pub concurrency: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            timeout_secs: crate::dns::DNS_TIMEOUT_SECS,
            concurrency: 8,
        }
    }
}
