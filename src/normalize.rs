//! Converts raw feed entries into [`VehicleRecord`]s.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::model::{RawVehicle, UNKNOWN_STATUS, VehicleRecord};

/// Normalizes one snapshot batch.
///
/// Entries without an `id` or `label` are dropped. `now` is the batch
/// timestamp: it becomes every record's `ingested_at` and replaces any
/// `updated_at` that fails to parse. Output order follows input order and
/// duplicate ids are kept.
pub fn normalize(batch: &[RawVehicle], now: DateTime<Utc>) -> Vec<VehicleRecord> {
    let mut records = Vec::with_capacity(batch.len());

    for v in batch {
        let attrs = &v.attributes;
        if v.id.is_empty() || attrs.label.is_empty() {
            continue;
        }

        let updated_at = match DateTime::parse_from_rfc3339(&attrs.updated_at) {
            Ok(ts) => ts.with_timezone(&Utc),
            Err(e) => {
                warn!(vehicle_id = %v.id, raw = %attrs.updated_at, error = %e, "Unparsable updated_at, using batch time");
                now
            }
        };

        records.push(VehicleRecord {
            id: v.id.clone(),
            label: attrs.label.clone(),
            latitude: attrs.latitude,
            longitude: attrs.longitude,
            speed: attrs.speed.unwrap_or(0.0).max(0.0),
            direction_id: attrs.direction_id,
            current_status: normalize_status(&attrs.current_status),
            occupancy_status: normalize_status(&attrs.occupancy_status),
            bearing: attrs.bearing.unwrap_or(0),
            updated_at,
            ingested_at: now,
        });
    }

    let dropped = batch.len() - records.len();
    if dropped > 0 {
        debug!(dropped, "Dropped entries with empty id or label");
    }

    records
}

/// Maps an empty status to [`UNKNOWN_STATUS`].
pub fn normalize_status(status: &str) -> String {
    if status.is_empty() {
        UNKNOWN_STATUS.to_string()
    } else {
        status.to_string()
    }
}
