//! Result types produced by the fleet analyzers.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Every metric reported by [`summarize`](crate::analyzers::summary::summarize).
///
/// Declaration order is the order metrics are listed in an [`AggregateStat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Metric {
    TotalVehicles,
    MovingVehicles,
    StationaryVehicles,
    PercentMoving,
    AverageSpeed,
    MaxSpeed,
    MinSpeed,
    MedianSpeed,
    Speed90thPercentile,
    Speed95thPercentile,
    InTransit,
    Stopped,
    Incoming,
    OccupancyManySeats,
    OccupancyFewSeats,
    OccupancyUnknown,
    OutboundVehicles,
    InboundVehicles,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::TotalVehicles => "total_vehicles",
            Metric::MovingVehicles => "moving_vehicles",
            Metric::StationaryVehicles => "stationary_vehicles",
            Metric::PercentMoving => "percent_moving",
            Metric::AverageSpeed => "average_speed",
            Metric::MaxSpeed => "max_speed",
            Metric::MinSpeed => "min_speed",
            Metric::MedianSpeed => "median_speed",
            Metric::Speed90thPercentile => "speed_90th_percentile",
            Metric::Speed95thPercentile => "speed_95th_percentile",
            Metric::InTransit => "in_transit",
            Metric::Stopped => "stopped",
            Metric::Incoming => "incoming",
            Metric::OccupancyManySeats => "occupancy_many_seats",
            Metric::OccupancyFewSeats => "occupancy_few_seats",
            Metric::OccupancyUnknown => "occupancy_unknown",
            Metric::OutboundVehicles => "outbound_vehicles",
            Metric::InboundVehicles => "inbound_vehicles",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A single metric value.
///
/// Renders as a bare integer, `"12.3%"` or `"12.34 mph"`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    Count(u64),
    Percentage(f64),
    Speed(f64),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Count(n) => write!(f, "{n}"),
            MetricValue::Percentage(p) => write!(f, "{p:.1}%"),
            MetricValue::Speed(s) => write!(f, "{s:.2} mph"),
        }
    }
}

impl Serialize for MetricValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MetricValue::Count(n) => serializer.serialize_u64(*n),
            other => serializer.collect_str(other),
        }
    }
}

/// Ordered set of fleet metrics, built fresh for every query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateStat {
    metrics: BTreeMap<Metric, MetricValue>,
}

impl AggregateStat {
    pub(crate) fn insert(&mut self, metric: Metric, value: MetricValue) {
        self.metrics.insert(metric, value);
    }

    pub fn get(&self, metric: Metric) -> Option<&MetricValue> {
        self.metrics.get(&metric)
    }

    pub fn contains(&self, metric: Metric) -> bool {
        self.metrics.contains_key(&metric)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, &MetricValue)> {
        self.metrics.iter().map(|(m, v)| (*m, v))
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

impl Serialize for AggregateStat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.metrics.len()))?;
        for (metric, value) in &self.metrics {
            map.serialize_entry(metric.as_str(), value)?;
        }
        map.end()
    }
}

/// Route family inferred from a vehicle id prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub enum RouteType {
    #[serde(rename = "Red Line")]
    RedLine,
    #[serde(rename = "Orange Line")]
    OrangeLine,
    #[serde(rename = "Green Line")]
    GreenLine,
    #[serde(rename = "Blue Line")]
    BlueLine,
    Bus,
    Other,
}

impl RouteType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteType::RedLine => "Red Line",
            RouteType::OrangeLine => "Orange Line",
            RouteType::GreenLine => "Green Line",
            RouteType::BlueLine => "Blue Line",
            RouteType::Bus => "Bus",
            RouteType::Other => "Other",
        }
    }
}

impl fmt::Display for RouteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Per-route counts and speeds.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct RouteStat {
    pub route_type: RouteType,
    pub count: u64,
    pub avg_speed: f64,
    pub max_speed: f64,
}

/// One of the eight 45° compass sectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub enum CompassSector {
    North,
    Northeast,
    East,
    Southeast,
    South,
    Southwest,
    West,
    Northwest,
}

impl CompassSector {
    pub const ALL: [CompassSector; 8] = [
        CompassSector::North,
        CompassSector::Northeast,
        CompassSector::East,
        CompassSector::Southeast,
        CompassSector::South,
        CompassSector::Southwest,
        CompassSector::West,
        CompassSector::Northwest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CompassSector::North => "North",
            CompassSector::Northeast => "Northeast",
            CompassSector::East => "East",
            CompassSector::Southeast => "Southeast",
            CompassSector::South => "South",
            CompassSector::Southwest => "Southwest",
            CompassSector::West => "West",
            CompassSector::Northwest => "Northwest",
        }
    }
}

impl fmt::Display for CompassSector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}
