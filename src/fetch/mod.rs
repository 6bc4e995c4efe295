//! HTTP plumbing for pulling raw feed snapshots.

mod api_key;
mod basic;
mod client;

pub use api_key::ApiKey;
pub use basic::BasicClient;
pub use client::HttpClient;

use thiserror::Error;

/// Errors surfaced while fetching or decoding a snapshot.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to parse JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid request: {0}")]
    Request(String),
}

/// Issues a `GET` for `url` and returns the response body.
///
/// Any non-2xx status is an error carrying the response body.
pub async fn fetch_bytes<C: HttpClient + ?Sized>(client: &C, url: &str) -> Result<Vec<u8>, FetchError> {
    let url = reqwest::Url::parse(url).map_err(|e| FetchError::Request(format!("{url}: {e}")))?;
    let req = reqwest::Request::new(reqwest::Method::GET, url);

    let resp = client.execute(req).await?;
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(FetchError::Status {
            status: status.as_u16(),
            body,
        });
    }

    Ok(resp.bytes().await?.to_vec())
}
