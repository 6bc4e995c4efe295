use std::collections::BTreeMap;

use crate::analyzers::types::CompassSector;
use crate::model::VehicleRecord;
use crate::store::{StoreResult, VehicleStore};

/// Half-open `[min, max)` bearing range of each sector, in degrees.
///
/// | Sector    | Range           |
/// |-----------|-----------------|
/// | North     | >= 337.5, < 22.5 |
/// | Northeast | 22.5 – 67.5     |
/// | East      | 67.5 – 112.5    |
/// | Southeast | 112.5 – 157.5   |
/// | South     | 157.5 – 202.5   |
/// | Southwest | 202.5 – 247.5   |
/// | West      | 247.5 – 292.5   |
/// | Northwest | 292.5 – 337.5   |
static SECTORS: &[(CompassSector, f64, f64)] = &[
    (CompassSector::North, 337.5, 22.5),
    (CompassSector::Northeast, 22.5, 67.5),
    (CompassSector::East, 67.5, 112.5),
    (CompassSector::Southeast, 112.5, 157.5),
    (CompassSector::South, 157.5, 202.5),
    (CompassSector::Southwest, 202.5, 247.5),
    (CompassSector::West, 247.5, 292.5),
    (CompassSector::Northwest, 292.5, 337.5),
];

/// Maps a bearing to its compass sector. Bearings outside `[0, 360)` land
/// in North.
pub fn classify_bearing(bearing: i64) -> CompassSector {
    let b = bearing as f64;
    SECTORS
        .iter()
        .find(|(_, min, max)| {
            if min > max {
                b >= *min || b < *max
            } else {
                b >= *min && b < *max
            }
        })
        .map(|(sector, _, _)| *sector)
        .unwrap_or(CompassSector::North)
}

/// Vehicle count per compass sector. All eight sectors are present.
pub fn bearing_summary(store: &VehicleStore) -> StoreResult<BTreeMap<CompassSector, u64>> {
    Ok(bearing_summary_records(&store.all()?))
}

pub fn bearing_summary_records(records: &[VehicleRecord]) -> BTreeMap<CompassSector, u64> {
    let mut counts: BTreeMap<CompassSector, u64> =
        CompassSector::ALL.iter().map(|s| (*s, 0)).collect();

    for r in records {
        *counts.entry(classify_bearing(r.bearing)).or_default() += 1;
    }

    counts
}

/// Vehicles heading within `delta` degrees of `target`, bounds included.
///
/// The range is not wrapped at 0°/360°: `target = 350, delta = 20` asks for
/// `330..=370` and will not match a bearing of 5.
pub fn bearing_filter(
    store: &VehicleStore,
    target: i64,
    delta: i64,
) -> StoreResult<Vec<VehicleRecord>> {
    store.by_bearing_range(target.saturating_sub(delta), target.saturating_add(delta))
}
