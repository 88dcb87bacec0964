//! HTTP fetcher for downloading tracker lists.

use anyhow::{Context, Result};
use reqwest::Client;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

use crate::aggregator::write_atomic;
use crate::config::SourceConfig;

const TIMEOUT_SECS: u64 = 30;
const MAX_RETRIES: u32 = 3;
const RETRY_DELAY_MS: u64 = 2000;

/// Maximum size per tracker list (10 MB)
/// The Disconnect.me services list, the larger of the two, is well under 1 MB
const MAX_LIST_SIZE: usize = 10 * 1024 * 1024;

/// HTTP client for fetching lists
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Create a new fetcher with default settings
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .user_agent(format!("trackip/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client })
    }

    /// Download a source list to its configured local file.
    pub async fn download_source(&self, name: &str, source: &SourceConfig) -> Result<()> {
        info!("Downloading {} list...", name);
        let size = self
            .download_to(&source.url, &source.file)
            .await
            .with_context(|| format!("Failed to download {} list", name))?;
        info!("Saved {} list to {:?} ({} bytes)", name, source.file, size);
        Ok(())
    }

    /// Fetch `url` and write the body atomically to `path`. Returns the body size.
    pub async fn download_to(&self, url: &str, path: &Path) -> Result<usize> {
        let body = self.fetch_with_retry(url).await?;
        write_atomic(path, &body)?;
        Ok(body.len())
    }

    /// Fetch content with retry logic and size validation
    async fn fetch_with_retry(&self, url: &str) -> Result<String> {
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                let delay = RETRY_DELAY_MS * (1 << (attempt - 1));
                debug!("Retry {} after {}ms for {}", attempt, delay, url);
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }

            match self.client.get(url).send().await {
                Ok(response) => {
                    if response.status().is_success() {
                        if let Some(content_length) = response.content_length() {
                            check_size(content_length as usize)?;
                        }

                        let body = response
                            .text()
                            .await
                            .context("Failed to read response body")?;

                        // Content-Length may be absent or wrong
                        check_size(body.len())?;

                        return Ok(body);
                    }
                    last_error = Some(anyhow::anyhow!("HTTP {}", response.status()));
                }
                // A malformed URL will not get better on retry
                Err(e) if e.is_builder() => {
                    return Err(anyhow::Error::new(e).context(format!("Invalid URL: {}", url)));
                }
                Err(e) => {
                    last_error = Some(e.into());
                }
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow::anyhow!("Unknown error")))
    }
}

fn check_size(size: usize) -> Result<()> {
    if size > MAX_LIST_SIZE {
        anyhow::bail!(
            "Response too large: {} bytes (max: {} bytes)",
            size,
            MAX_LIST_SIZE
        );
    }
    Ok(())
}
