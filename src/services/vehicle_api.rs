//! Trait for sources of vehicle-position snapshots.

use crate::fetch::FetchError;
use crate::model::VehicleResponse;

/// Abstraction over a real-time vehicle feed (e.g., the MBTA V3 API).
#[async_trait::async_trait]
pub trait VehicleApi: Send + Sync {
    /// Fetches and decodes one snapshot of the fleet.
    async fn fetch_vehicles(&self) -> Result<VehicleResponse, FetchError>;
}
