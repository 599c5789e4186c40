use std::fs;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;

const FETCH_TIMEOUT: Duration = Duration::from_secs(60);

/// Whether `src` names a remote document (`scheme://...`).
pub fn is_remote(src: &str) -> bool {
    match src.split_once("://") {
        Some((scheme, _)) => !scheme.is_empty() && scheme.chars().all(|c| c.is_ascii_lowercase()),
        None => false,
    }
}

/// Retrieve a spec document from a URL or a local path.
pub async fn fetch_spec(src: &str) -> Result<String> {
    if !is_remote(src) {
        return fs::read_to_string(src).with_context(|| format!("failed to read {src}"));
    }
    log::debug!("fetching {src}");
    let client = Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .context("failed to build HTTP client")?;
    let response = client
        .get(src)
        .send()
        .await
        .with_context(|| format!("failed to fetch {src}"))?
        .error_for_status()
        .with_context(|| format!("failed to fetch {src}"))?;
    response
        .text()
        .await
        .with_context(|| format!("failed to read response body from {src}"))
}
