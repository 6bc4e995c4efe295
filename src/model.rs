//! Wire types for the MBTA `/vehicles` payload and the normalized record
//! persisted by the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Top-level JSON document returned by the vehicles endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct VehicleResponse {
    pub data: Vec<RawVehicle>,
}

/// One entry of the `data` array, exactly as the feed sends it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawVehicle {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub attributes: Attributes,
}

/// Position and status attributes of a [`RawVehicle`].
///
/// `speed` and `bearing` are nullable in the feed. Every other field falls
/// back to its zero value when missing so that one sparse entry cannot fail
/// the decode of a whole snapshot.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Attributes {
    pub updated_at: String,
    pub speed: Option<f64>,
    pub revenue_status: String,
    pub occupancy_status: String,
    pub longitude: f64,
    pub latitude: f64,
    pub label: String,
    pub direction_id: i64,
    pub current_stop_sequence: Option<i64>,
    pub current_status: String,
    pub bearing: Option<i64>,
}

/// Normalized vehicle position, one row of the `vehicles` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleRecord {
    pub id: String,
    pub label: String,
    pub latitude: f64,
    pub longitude: f64,
    pub speed: f64,
    pub direction_id: i64,
    pub current_status: String,
    pub occupancy_status: String,
    pub bearing: i64,
    pub updated_at: DateTime<Utc>,
    pub ingested_at: DateTime<Utc>,
}

/// Sentinel written for empty status strings.
pub const UNKNOWN_STATUS: &str = "UNKNOWN";
