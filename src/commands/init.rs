//! Init command implementation.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use crate::aggregator::write_atomic;
use crate::config::Config;

/// Run the init command
pub fn run(force: bool, config_path: &Path) -> Result<()> {
    if config_path.exists() && !force {
        anyhow::bail!(
            "Config file {:?} already exists (use --force to overwrite)",
            config_path
        );
    }

    write_atomic(config_path, &Config::generate_default_yaml())
        .with_context(|| format!("Failed to write config to {:?}", config_path))?;
    info!("Wrote default configuration to {:?}", config_path);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_writes_loadable_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trackip.yaml");

        run(false, &path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_init_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trackip.yaml");
        std::fs::write(&path, "resolver:\n  concurrency: 2\n").unwrap();

        assert!(run(false, &path).is_err());
        assert!(run(true, &path).is_ok());
        assert_eq!(Config::load(&path).unwrap().resolver.concurrency, 8);
    }
}
