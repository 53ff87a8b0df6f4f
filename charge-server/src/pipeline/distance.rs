//! Geodesic distances from a reference point to stations.
//!
//! Distances are measured on the WGS-84 ellipsoid (Karney's method via
//! `geo`), not on a sphere or a flat plane.

use geo::{GeodesicDistance, Point};
use serde::Serialize;

use crate::domain::{Coordinate, StationId, StationRecord};

/// Distances closer than this are considered equal when picking the nearest.
pub const TIE_EPSILON_KM: f64 = 1e-6;

/// A station's distance from the reference point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceResult {
    pub id: StationId,
    pub distance_km: f64,
}

/// Returned when asking for the nearest of no stations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("no stations available to compute a nearest result")]
pub struct EmptySetError;

/// Geodesic distance in kilometres.
pub fn geodesic_km(from: Coordinate, to: Coordinate) -> f64 {
    // geo points are (x = longitude, y = latitude)
    let from = Point::new(from.longitude(), from.latitude());
    let to = Point::new(to.longitude(), to.latitude());
    (from.geodesic_distance(&to) / 1000.0).max(0.0)
}

/// The single nearest station to `reference`.
///
/// Stations within [`TIE_EPSILON_KM`] of the best distance are tied, and the
/// tie goes to the smallest [`StationId`].
pub fn nearest(
    reference: Coordinate,
    stations: &[StationRecord],
) -> Result<DistanceResult, EmptySetError> {
    let measured: Vec<(&StationId, f64)> = stations
        .iter()
        .map(|s| (&s.id, geodesic_km(reference, s.coordinate)))
        .collect();

    let min_km = measured
        .iter()
        .map(|(_, km)| *km)
        .min_by(f64::total_cmp)
        .ok_or(EmptySetError)?;

    // Two passes so chains of near-ties can't drift past the epsilon.
    let (id, distance_km) = measured
        .into_iter()
        .filter(|(_, km)| km - min_km <= TIE_EPSILON_KM)
        .min_by(|a, b| a.0.cmp(b.0))
        .ok_or(EmptySetError)?;

    Ok(DistanceResult {
        id: id.clone(),
        distance_km,
    })
}

/// Distances to every station, nearest first.
///
/// Equal distances are ordered by id.
pub fn distances(reference: Coordinate, stations: &[StationRecord]) -> Vec<DistanceResult> {
    let mut results: Vec<DistanceResult> = stations
        .iter()
        .map(|s| DistanceResult {
            id: s.id.clone(),
            distance_km: geodesic_km(reference, s.coordinate),
        })
        .collect();

    results.sort_by(|a, b| {
        a.distance_km
            .total_cmp(&b.distance_km)
            .then_with(|| a.id.cmp(&b.id))
    });

    results
}
