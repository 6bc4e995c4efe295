use crate::analyzers::types::{AggregateStat, Metric, MetricValue};
use crate::analyzers::utility::{mean, nearest_rank, pct};
use crate::model::{UNKNOWN_STATUS, VehicleRecord};
use crate::store::{StoreResult, VehicleStore};

/// Motion statuses broken out individually.
static STATUS_METRICS: &[(&str, Metric)] = &[
    ("IN_TRANSIT_TO", Metric::InTransit),
    ("STOPPED_AT", Metric::Stopped),
    ("INCOMING_AT", Metric::Incoming),
];

/// Occupancy statuses reported as a share of the fleet.
static OCCUPANCY_METRICS: &[(&str, Metric)] = &[
    ("MANY_SEATS_AVAILABLE", Metric::OccupancyManySeats),
    ("FEW_SEATS_AVAILABLE", Metric::OccupancyFewSeats),
    (UNKNOWN_STATUS, Metric::OccupancyUnknown),
];

/// Percentiles over moving vehicles, as `(metric, numerator, denominator)`.
static PERCENTILES: &[(Metric, usize, usize)] = &[
    (Metric::MedianSpeed, 1, 2),
    (Metric::Speed90thPercentile, 9, 10),
    (Metric::Speed95thPercentile, 95, 100),
];

/// Computes fleet summary statistics from the store's current contents.
pub fn summarize(store: &VehicleStore) -> StoreResult<AggregateStat> {
    Ok(summarize_records(&store.all()?))
}

/// Computes fleet summary statistics over `records`.
///
/// Percentile metrics only consider moving vehicles and are left out
/// entirely when nothing is moving.
pub fn summarize_records(records: &[VehicleRecord]) -> AggregateStat {
    let mut stat = AggregateStat::default();
    let total = records.len();

    let speeds: Vec<f64> = records.iter().map(|r| r.speed).collect();
    let mut moving: Vec<f64> = speeds.iter().copied().filter(|s| *s > 0.0).collect();
    moving.sort_by(|a, b| a.total_cmp(b));
    let stationary = speeds.iter().filter(|s| **s == 0.0).count();

    stat.insert(Metric::TotalVehicles, count(total));
    stat.insert(Metric::MovingVehicles, count(moving.len()));
    stat.insert(Metric::StationaryVehicles, count(stationary));
    stat.insert(
        Metric::PercentMoving,
        MetricValue::Percentage(pct(moving.len(), total)),
    );

    let max = speeds.iter().copied().reduce(f64::max).unwrap_or(0.0);
    let min = speeds.iter().copied().reduce(f64::min).unwrap_or(0.0);
    stat.insert(Metric::AverageSpeed, MetricValue::Speed(mean(&speeds)));
    stat.insert(Metric::MaxSpeed, MetricValue::Speed(max));
    stat.insert(Metric::MinSpeed, MetricValue::Speed(min));

    for (metric, num, den) in PERCENTILES {
        if let Some(value) = nearest_rank(&moving, *num, *den) {
            stat.insert(*metric, MetricValue::Speed(value));
        }
    }

    for (status, metric) in STATUS_METRICS {
        let n = records.iter().filter(|r| r.current_status == *status).count();
        stat.insert(*metric, count(n));
    }

    for (status, metric) in OCCUPANCY_METRICS {
        let n = records.iter().filter(|r| r.occupancy_status == *status).count();
        stat.insert(*metric, MetricValue::Percentage(pct(n, total)));
    }

    let outbound = records.iter().filter(|r| r.direction_id == 0).count();
    let inbound = records.iter().filter(|r| r.direction_id == 1).count();
    stat.insert(Metric::OutboundVehicles, count(outbound));
    stat.insert(Metric::InboundVehicles, count(inbound));

    stat
}

fn count(n: usize) -> MetricValue {
    MetricValue::Count(n as u64)
}
