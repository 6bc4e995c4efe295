use async_trait::async_trait;
use tracing::debug;

use crate::config::Config;
use crate::fetch::{ApiKey, BasicClient, FetchError, HttpClient, fetch_bytes};
use crate::model::VehicleResponse;
use crate::parser::parse_vehicles;
use crate::services::vehicle_api::VehicleApi;

pub const DEFAULT_API_URL: &str = "https://api-v3.mbta.com/vehicles";

/// [`VehicleApi`] backed by the MBTA V3 `/vehicles` endpoint.
pub struct MbtaClient {
    api_url: String,
    http: Box<dyn HttpClient>,
}

impl MbtaClient {
    pub fn new(api_url: impl Into<String>, http: impl HttpClient + 'static) -> Self {
        Self {
            api_url: api_url.into(),
            http: Box::new(http),
        }
    }

    /// Builds a client with the configured timeout, adding the `x-api-key`
    /// header when a key is set.
    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        let basic = BasicClient::with_timeout(config.timeout)?;
        let client = match &config.api_key {
            Some(key) => Self::new(&config.api_url, ApiKey::mbta(basic, key)?),
            None => Self::new(&config.api_url, basic),
        };
        Ok(client)
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

#[async_trait]
impl VehicleApi for MbtaClient {
    async fn fetch_vehicles(&self) -> Result<VehicleResponse, FetchError> {
        let bytes = fetch_bytes(self.http.as_ref(), &self.api_url).await?;
        debug!(url = %self.api_url, bytes = bytes.len(), "Vehicle payload received");
        Ok(parse_vehicles(&bytes)?)
    }
}
