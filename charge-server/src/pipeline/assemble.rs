//! Combining filtered stations with the nearest-station result.

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::{Coordinate, StationId, StationRecord};

use super::distance::DistanceResult;

/// One station in the result list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultEntry {
    pub station: StationRecord,

    /// Whether this is the globally nearest station.
    pub is_nearest: bool,

    /// Distance from the reference point, once attached.
    pub distance_km: Option<f64>,
}

/// The final view handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultView {
    pub entries: Vec<ResultEntry>,

    /// Nearest station over the whole (unfiltered) set.
    pub nearest: DistanceResult,

    /// Whether the nearest station survived filtering.
    pub nearest_included: bool,

    /// Mean position of the entries, for centring a map.
    pub center: Option<Coordinate>,
}

/// Build a view over `filtered`, marking the entry matching `nearest`.
///
/// If the nearest station was filtered out no entry is marked; that is an
/// expected outcome, not an error.
pub fn assemble(filtered: &[StationRecord], nearest: &DistanceResult) -> ResultView {
    let entries: Vec<ResultEntry> = filtered
        .iter()
        .map(|station| ResultEntry {
            is_nearest: station.id == nearest.id,
            station: station.clone(),
            distance_km: None,
        })
        .collect();

    let nearest_included = entries.iter().any(|e| e.is_nearest);

    ResultView {
        center: mean_coordinate(filtered),
        entries,
        nearest: nearest.clone(),
        nearest_included,
    }
}

impl ResultView {
    /// Attach per-entry distances.
    ///
    /// Entries with no matching distance keep `None`.
    pub fn with_distances(mut self, distances: &[DistanceResult]) -> Self {
        let by_id: HashMap<&StationId, f64> =
            distances.iter().map(|d| (&d.id, d.distance_km)).collect();

        for entry in &mut self.entries {
            entry.distance_km = by_id.get(&entry.station.id).copied();
        }
        self
    }

    /// Order entries nearest first.
    ///
    /// The marked nearest entry always leads, even when another entry sits
    /// within the tie tolerance of it. Entries without a distance go last,
    /// in their existing order.
    pub fn rank_by_distance(mut self) -> Self {
        self.entries.sort_by(|a, b| {
            b.is_nearest
                .cmp(&a.is_nearest)
                .then_with(|| match (a.distance_km, b.distance_km) {
                    (Some(x), Some(y)) => x
                        .total_cmp(&y)
                        .then_with(|| a.station.id.cmp(&b.station.id)),
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (None, None) => std::cmp::Ordering::Equal,
                })
        });
        self
    }

    /// The marked nearest entry, if it survived filtering.
    pub fn nearest_entry(&self) -> Option<&ResultEntry> {
        self.entries.iter().find(|e| e.is_nearest)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn mean_coordinate(stations: &[StationRecord]) -> Option<Coordinate> {
    if stations.is_empty() {
        return None;
    }
    let n = stations.len() as f64;
    let lat = stations.iter().map(|s| s.coordinate.latitude()).sum::<f64>() / n;
    let lon = stations.iter().map(|s| s.coordinate.longitude()).sum::<f64>() / n;
    Coordinate::new(lat, lon).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Estimates, SpeedTier, Status};

    fn station(id: &str, lat: f64, lon: f64) -> StationRecord {
        StationRecord {
            id: StationId::new(id),
            name: format!("Station {id}"),
            address: String::new(),
            city: "Bengaluru".into(),
            coordinate: Coordinate::new(lat, lon).unwrap(),
            status: Status::Operational,
            speed_tier: SpeedTier::Fast,
            max_power_kw: None,
            price_per_kwh: Some(12.0),
            rating: Some(4.0),
            estimates: Estimates::default(),
        }
    }

    fn nearest(id: &str, km: f64) -> DistanceResult {
        DistanceResult {
            id: StationId::new(id),
            distance_km: km,
        }
    }

    #[test]
    fn marks_nearest_entry() {
        let filtered = vec![station("A", 12.0, 77.0), station("B", 14.0, 79.0)];
        let view = assemble(&filtered, &nearest("B", 1.5));

        assert_eq!(view.len(), 2);
        assert!(!view.entries[0].is_nearest);
        assert!(view.entries[1].is_nearest);
        assert!(view.nearest_included);
        assert_eq!(view.nearest_entry().map(|e| e.station.id.as_str()), Some("B"));
    }

    #[test]
    fn nearest_filtered_out_marks_nothing() {
        let filtered = vec![station("A", 12.0, 77.0)];
        let view = assemble(&filtered, &nearest("Z", 0.2));

        assert!(view.entries.iter().all(|e| !e.is_nearest));
        assert!(!view.nearest_included);
        assert!(view.nearest_entry().is_none());
        assert_eq!(view.nearest.id, StationId::new("Z"));
    }

    #[test]
    fn empty_filtered_set_is_valid() {
        let view = assemble(&[], &nearest("A", 0.0));
        assert!(view.is_empty());
        assert!(view.center.is_none());
        assert!(!view.nearest_included);
    }

    #[test]
    fn does_not_mutate_inputs() {
        let filtered = vec![station("A", 12.0, 77.0)];
        let before = filtered.clone();
        let _ = assemble(&filtered, &nearest("A", 0.0));
        assert_eq!(filtered, before);
    }

    #[test]
    fn center_is_mean_position() {
        let filtered = vec![station("A", 12.0, 77.0), station("B", 14.0, 79.0)];
        let view = assemble(&filtered, &nearest("A", 0.0));
        assert_eq!(view.center, Some(Coordinate::new(13.0, 78.0).unwrap()));
    }

    #[test]
    fn distances_attach_and_rank() {
        let filtered = vec![
            station("A", 12.0, 77.0),
            station("B", 14.0, 79.0),
            station("C", 13.0, 78.0),
        ];
        let distances = vec![nearest("C", 1.0), nearest("A", 5.0)];
        let view = assemble(&filtered, &nearest("C", 1.0))
            .with_distances(&distances)
            .rank_by_distance();

        let order: Vec<(&str, Option<f64>)> = view
            .entries
            .iter()
            .map(|e| (e.station.id.as_str(), e.distance_km))
            .collect();
        assert_eq!(order, vec![("C", Some(1.0)), ("A", Some(5.0)), ("B", None)]);
        assert!(view.entries[0].is_nearest);
    }

    #[test]
    fn marked_nearest_leads_a_near_tie() {
        // A won the id tie-break even though B measured a hair closer.
        let filtered = vec![station("B", 12.0, 77.0), station("A", 12.0, 77.0)];
        let distances = vec![nearest("A", 1.000_000_5), nearest("B", 1.0)];
        let view = assemble(&filtered, &nearest("A", 1.000_000_5))
            .with_distances(&distances)
            .rank_by_distance();

        let order: Vec<&str> = view.entries.iter().map(|e| e.station.id.as_str()).collect();
        assert_eq!(order, vec!["A", "B"]);
        assert!(view.entries[0].is_nearest);
    }
}
