//! Dataset snapshot retrieval over HTTP.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Context, Result, bail};
use tracing::{debug, info};

use std::path::Path;

/// Downloads one dataset snapshot with a GET request.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?;
    let status = resp.status();
    if !status.is_success() {
        bail!("snapshot request to {url} returned status {status}");
    }

    let bytes = resp.bytes().await?.to_vec();
    debug!(url, bytes = bytes.len(), "Snapshot downloaded");
    Ok(bytes)
}

/// Resolves a snapshot source: URLs are fetched, anything else is read
/// as a local file path.
pub async fn load_source<C: HttpClient>(client: &C, source: &str) -> Result<Vec<u8>> {
    if source.starts_with("http") {
        fetch_bytes(client, source).await
    } else {
        std::fs::read(source).with_context(|| format!("reading snapshot file {source}"))
    }
}

/// Saves a snapshot from `source` (URL or local path) to `output`.
pub async fn save_snapshot<C: HttpClient>(client: &C, source: &str, output: &Path) -> Result<()> {
    let bytes = load_source(client, source).await?;

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(output, &bytes)
        .with_context(|| format!("writing snapshot to {}", output.display()))?;

    info!(source, output = %output.display(), bytes = bytes.len(), "Snapshot saved");
    Ok(())
}
