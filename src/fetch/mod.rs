// src/fetch/mod.rs

use anyhow::{Context, Result};
use chrono::Utc;
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::{debug, error, info};
use url::Url;

use crate::error::Error;

pub mod payload;
pub mod urls;

pub use payload::{parse_payload, CmsPayload};

/// The CMS sits behind a web-app proxy that expects a browser-like agent.
pub const USER_AGENT: &str = "Mozilla/5.0";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Blocking client with the fixed user agent and request timeout.
pub fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .context("building HTTP client")
}

/// One GET against the CMS endpoint, parsed and validated. No retries.
pub fn fetch_cms_payload(client: &Client, endpoint: &Url, cache_bust: bool) -> Result<CmsPayload> {
    let url = if cache_bust {
        urls::with_cache_buster(endpoint, Utc::now())
    } else {
        endpoint.clone()
    };
    info!(%url, "fetching CMS payload");

    let transport = |source| Error::Transport {
        url: url.to_string(),
        source,
    };
    let resp = client.get(url.clone()).send().map_err(transport)?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().unwrap_or_default();
        error!(status = status.as_u16(), "CMS request failed");
        debug!(%body, "CMS error body");
        return Err(Error::Status {
            status: status.as_u16(),
        }
        .into());
    }

    let body = resp.text().map_err(transport)?;
    let payload = parse_payload(&body)?;
    info!(
        pivot_rows = payload.data_row_count(),
        mappings = payload.product_map.len(),
        "fetched CMS payload"
    );
    Ok(payload)
}
