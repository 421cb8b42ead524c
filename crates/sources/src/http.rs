//! Shared HTTP plumbing for the adapters.

use std::time::Duration;

use log::{debug, warn};
use reqwest::header::ACCEPT;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use crate::errors::SourceError;

/// Desktop browser user agent; several AMC sites reject unknown clients.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub const ACCEPT_JSON: &str = "application/json";
pub const ACCEPT_HTML: &str = "text/html,application/xhtml+xml";
pub const ACCEPT_SPREADSHEET: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet,application/vnd.ms-excel,*/*";

/// Build the client every adapter shares: browser user agent, cookie store,
/// per-request timeout.
pub fn build_client(timeout: Duration) -> Client {
    Client::builder()
        .user_agent(BROWSER_USER_AGENT)
        .cookie_store(true)
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            warn!("Failed to build configured HTTP client ({}), using defaults", e);
            Client::new()
        })
}

/// GET `url` and fail on a non-success status.
pub async fn get_checked(
    client: &Client,
    url: &str,
    accept: &str,
    source_name: &str,
) -> Result<Response, SourceError> {
    debug!("{}: GET {}", source_name, url);
    let response = client.get(url).header(ACCEPT, accept).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Http {
            source_name: source_name.to_string(),
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    Ok(response)
}

pub async fn get_text(
    client: &Client,
    url: &str,
    accept: &str,
    source_name: &str,
) -> Result<String, SourceError> {
    Ok(get_checked(client, url, accept, source_name)
        .await?
        .text()
        .await?)
}

pub async fn get_bytes(client: &Client, url: &str, source_name: &str) -> Result<Vec<u8>, SourceError> {
    let bytes = get_checked(client, url, ACCEPT_SPREADSHEET, source_name)
        .await?
        .bytes()
        .await?;
    Ok(bytes.to_vec())
}

pub async fn get_json<T: DeserializeOwned>(
    client: &Client,
    url: &str,
    source_name: &str,
) -> Result<T, SourceError> {
    let body = get_text(client, url, ACCEPT_JSON, source_name).await?;
    serde_json::from_str(&body).map_err(|e| SourceError::parse(source_name, e.to_string()))
}
