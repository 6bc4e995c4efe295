//! JSON decoder for the MBTA vehicles payload.

use crate::model::VehicleResponse;

/// Decodes a `{"data": [...]}` vehicles document from raw bytes.
///
/// # Errors
///
/// Returns an error if the bytes are not JSON or the `data` array is missing.
pub fn parse_vehicles(bytes: &[u8]) -> serde_json::Result<VehicleResponse> {
    serde_json::from_slice(bytes)
}
