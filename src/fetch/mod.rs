//! Retrieval of the source archive, over HTTP or from disk.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Context, Result, bail};
use bytes::Bytes;
use tracing::{debug, info};

/// Downloads `url` and returns the response body.
///
/// # Errors
///
/// Fails on transport errors and on any non-success HTTP status.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Bytes> {
    let req = reqwest::Request::new(
        reqwest::Method::GET,
        url.parse().with_context(|| format!("invalid URL '{url}'"))?,
    );

    let resp = client.execute(req).await?;
    let status = resp.status();
    if !status.is_success() {
        bail!("GET {url} returned status {status}");
    }

    let bytes = resp.bytes().await?;
    debug!(bytes = bytes.len(), "Download complete");
    Ok(bytes)
}

/// Loads the source from a local file path or fetches it over HTTP.
#[tracing::instrument(skip_all, fields(source = %source))]
pub async fn load_source(source: &str) -> Result<Bytes> {
    if source.starts_with("http") {
        info!("Downloading OpenPowerlifting data (the archive is ~100MB, this may take a few minutes)");
        let client = BasicClient::new()?;
        fetch_bytes(&client, source).await
    } else {
        let data = std::fs::read(source).with_context(|| format!("reading '{source}'"))?;
        Ok(Bytes::from(data))
    }
}
