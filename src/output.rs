//! Output formatting and persistence for query results.
//!
//! Supports JSON serialization, table-style log lines and
//! CSV append.

use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::analyzers::types::{AggregateStat, CompassSector, RouteStat};
use crate::model::VehicleRecord;
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// Logs a value as pretty-printed JSON.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// One line per vehicle, fastest first.
pub fn print_vehicles(title: &str, vehicles: &[VehicleRecord]) {
    info!("{title}");
    for (i, v) in vehicles.iter().enumerate() {
        info!(
            "{}. Vehicle {} (Label: {}) - Speed: {:.2} mph, Bearing: {}, Status: {} (Last seen: {})",
            i + 1,
            v.id,
            v.label,
            v.speed,
            v.bearing,
            v.current_status,
            v.updated_at.format("%Y-%m-%d %H:%M:%S"),
        );
    }
}

pub fn print_routes(routes: &[RouteStat]) {
    info!("{:<20} {:>10} {:>15} {:>15}", "Route Type", "Count", "Avg Speed", "Max Speed");
    for r in routes {
        info!(
            "{:<20} {:>10} {:>11.2} mph {:>11.2} mph",
            r.route_type, r.count, r.avg_speed, r.max_speed
        );
    }
}

pub fn print_stats(stats: &AggregateStat) {
    for (metric, value) in stats.iter() {
        info!("{:<24} {}", metric, value);
    }
}

pub fn print_bearings(counts: &BTreeMap<CompassSector, u64>) {
    for (sector, count) in counts {
        info!("{:<10} {:>6}", sector, count);
    }
}

/// Appends [`VehicleRecord`]s as rows to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_records(path: &str, records: &[VehicleRecord]) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, rows = records.len(), "Appending CSV records");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    Ok(())
}
