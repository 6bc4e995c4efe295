use super::FetchError;
use super::client::HttpClient;
use async_trait::async_trait;
use reqwest::header::{HeaderName, HeaderValue};

/// Header the MBTA V3 API reads its key from.
pub const MBTA_API_KEY_HEADER: &str = "x-api-key";

/// An [`HttpClient`] wrapper that sends an API key as an HTTP header.
///
/// The header name and value are validated once at construction.
pub struct ApiKey<C> {
    inner: C,
    header_name: HeaderName,
    key: HeaderValue,
}

impl<C> ApiKey<C> {
    pub fn new(inner: C, header_name: &str, key: &str) -> Result<Self, FetchError> {
        let header_name = HeaderName::from_bytes(header_name.as_bytes())
            .map_err(|e| FetchError::Request(format!("invalid header name {header_name:?}: {e}")))?;
        let mut key = HeaderValue::from_str(key)
            .map_err(|e| FetchError::Request(format!("invalid API key: {e}")))?;
        key.set_sensitive(true);

        Ok(Self {
            inner,
            header_name,
            key,
        })
    }

    /// Uses the MBTA `x-api-key` header.
    pub fn mbta(inner: C, key: &str) -> Result<Self, FetchError> {
        Self::new(inner, MBTA_API_KEY_HEADER, key)
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for ApiKey<C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        req.headers_mut()
            .insert(self.header_name.clone(), self.key.clone());
        self.inner.execute(req).await
    }
}
