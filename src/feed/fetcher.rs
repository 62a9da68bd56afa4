use std::time::Duration;

use futures::StreamExt;
use thiserror::Error;

use crate::feed::parser::{parse_feed, RawFeed};

/// Response bodies larger than this are refused outright.
const MAX_FEED_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Ways a single source fetch can fail.
///
/// None of these ever crosses the aggregator boundary: a failed source
/// simply contributes zero articles to the batch.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with a non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// The fetch exceeded its configured deadline
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    /// Response body exceeded the 10MB size limit
    #[error("response too large")]
    ResponseTooLarge,
    /// Payload could not be parsed as RSS or Atom
    #[error("parse error: {0}")]
    Parse(String),
}

/// Retrieves and parses one feed.
///
/// Exactly one GET per invocation; there is no retry because the
/// aggregator already tolerates per-source loss. The whole operation
/// (connect, headers, body) is bounded by `timeout` so a stalled source
/// can never block the aggregate join.
pub async fn fetch_feed(
    client: &reqwest::Client,
    url: &str,
    timeout: Duration,
) -> Result<RawFeed, FetchError> {
    let bytes = tokio::time::timeout(timeout, fetch_bytes(client, url))
        .await
        .map_err(|_| FetchError::Timeout(timeout))??;

    parse_feed(&bytes).map_err(|e| FetchError::Parse(e.to_string()))
}

async fn fetch_bytes(client: &reqwest::Client, url: &str) -> Result<Vec<u8>, FetchError> {
    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        return Err(FetchError::HttpStatus(response.status().as_u16()));
    }

    read_limited_bytes(response, MAX_FEED_SIZE).await
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    // Fast path: trust Content-Length when the server sends one
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
