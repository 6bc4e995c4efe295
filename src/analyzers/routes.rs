use std::collections::BTreeMap;

use crate::analyzers::types::{RouteStat, RouteType};
use crate::model::VehicleRecord;
use crate::store::{StoreResult, VehicleStore};

/// Id prefixes tested in order; the first match wins.
///
/// Matching ignores ASCII case, the way SQL `LIKE` compares.
static ROUTE_RULES: &[(&str, RouteType)] = &[
    ("R-", RouteType::RedLine),
    ("O-", RouteType::OrangeLine),
    ("G-", RouteType::GreenLine),
    ("B-", RouteType::BlueLine),
    ("y", RouteType::Bus),
];

/// Infers the route family of a vehicle from its id.
pub fn classify_route(id: &str) -> RouteType {
    ROUTE_RULES
        .iter()
        .find(|(prefix, _)| {
            id.get(..prefix.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
        })
        .map(|(_, route)| *route)
        .unwrap_or(RouteType::Other)
}

/// Per-route vehicle counts and speeds over the store, most vehicles first.
pub fn route_breakdown(store: &VehicleStore) -> StoreResult<Vec<RouteStat>> {
    Ok(route_breakdown_records(&store.all()?))
}

pub fn route_breakdown_records(records: &[VehicleRecord]) -> Vec<RouteStat> {
    let mut groups: BTreeMap<RouteType, Vec<f64>> = BTreeMap::new();
    for r in records {
        groups.entry(classify_route(&r.id)).or_default().push(r.speed);
    }

    let mut stats: Vec<RouteStat> = groups
        .into_iter()
        .map(|(route_type, speeds)| RouteStat {
            route_type,
            count: speeds.len() as u64,
            avg_speed: super::utility::mean(&speeds),
            max_speed: speeds.iter().copied().fold(0.0, f64::max),
        })
        .collect();

    stats.sort_by(|a, b| b.count.cmp(&a.count));
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(id: &str, speed: f64) -> VehicleRecord {
        let now = Utc::now();
        VehicleRecord {
            id: id.to_string(),
            label: id.to_string(),
            latitude: 0.0,
            longitude: 0.0,
            speed,
            direction_id: 0,
            current_status: "IN_TRANSIT_TO".to_string(),
            occupancy_status: "UNKNOWN".to_string(),
            bearing: 0,
            updated_at: now,
            ingested_at: now,
        }
    }

    #[test]
    fn test_classify_route_prefixes() {
        assert_eq!(classify_route("R-5463A1F0"), RouteType::RedLine);
        assert_eq!(classify_route("O-548A1B2C"), RouteType::OrangeLine);
        assert_eq!(classify_route("G-10040"), RouteType::GreenLine);
        assert_eq!(classify_route("B-547A8B0E"), RouteType::BlueLine);
        assert_eq!(classify_route("y1234"), RouteType::Bus);
        assert_eq!(classify_route("1712"), RouteType::Other);
        assert_eq!(classify_route(""), RouteType::Other);
    }

    #[test]
    fn test_classify_route_ignores_ascii_case() {
        assert_eq!(classify_route("r-1"), RouteType::RedLine);
        assert_eq!(classify_route("Y1808"), RouteType::Bus);
    }

    #[test]
    fn test_first_rule_wins() {
        // "ynk..." is also a bus id: the `y` rule is reached first
        assert_eq!(classify_route("ynk-1502"), RouteType::Bus);
        // a bare "R" without the dash is not Red Line
        assert_eq!(classify_route("R5463"), RouteType::Other);
    }

    #[test]
    fn test_breakdown_empty() {
        assert!(route_breakdown_records(&[]).is_empty());
    }

    #[test]
    fn test_breakdown_counts_and_speeds() {
        let records = vec![
            record("y1", 10.0),
            record("y2", 20.0),
            record("y3", 0.0),
            record("R-1", 30.0),
            record("R-2", 40.0),
            record("x", 5.0),
        ];

        let stats = route_breakdown_records(&records);
        assert_eq!(stats.len(), 3);

        assert_eq!(stats[0].route_type, RouteType::Bus);
        assert_eq!(stats[0].count, 3);
        assert_eq!(stats[0].avg_speed, 10.0);
        assert_eq!(stats[0].max_speed, 20.0);

        assert_eq!(stats[1].route_type, RouteType::RedLine);
        assert_eq!(stats[1].count, 2);
        assert_eq!(stats[1].avg_speed, 35.0);
        assert_eq!(stats[1].max_speed, 40.0);

        assert_eq!(stats[2].route_type, RouteType::Other);
        assert_eq!(stats[2].count, 1);
    }

    #[test]
    fn test_breakdown_on_empty_store() {
        let store = VehicleStore::open_in_memory().unwrap();
        assert!(route_breakdown(&store).unwrap().is_empty());
    }
}
