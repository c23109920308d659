//! HTTP plumbing shared by the platform clients.

use crate::config::USER_AGENT;
use crate::errors::SyncError;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Client with a per-request timeout; a timeout surfaces as `Upstream`.
pub fn build_client(timeout: Duration) -> Result<Client, SyncError> {
    Ok(Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()?)
}

/// Turn any non-2xx response into `Upstream`, keeping the body for context.
pub async fn ensure_success(response: Response, operation: &str) -> Result<Response, SyncError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().to_string();
    let text = response.text().await.unwrap_or_default();

    if status == StatusCode::TOO_MANY_REQUESTS {
        log::warn!("Rate limit (429) at {}", url);
        return Err(SyncError::Upstream(format!("{}: rate limited (429)", operation)));
    }

    log::warn!("Request failed ({}) at {}: {}", status, url, text);
    Err(SyncError::Upstream(format!(
        "{}: HTTP {} - {}",
        operation,
        status.as_u16(),
        text.trim()
    )))
}

/// Like [`ensure_success`], but a 404 means the playlist does not exist.
pub async fn ensure_playlist(response: Response, playlist_id: &str) -> Result<Response, SyncError> {
    if response.status() == StatusCode::NOT_FOUND {
        return Err(SyncError::PlaylistNotFound(playlist_id.to_string()));
    }
    ensure_success(response, "list playlist tracks").await
}

pub async fn parse_json<T: DeserializeOwned>(response: Response, operation: &str) -> Result<T, SyncError> {
    let url = response.url().to_string();
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|e| {
        SyncError::Upstream(format!("{}: invalid JSON at {}: {}", operation, url, e))
    })
}
