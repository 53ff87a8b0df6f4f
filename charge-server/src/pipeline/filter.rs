//! Station filtering by locality, speed tier and rating.
//!
//! Filtering is stateless over an already-enriched station set, so changing
//! criteria never requires fetching or enriching again.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{SpeedTier, StationRecord, UNKNOWN_CITY};

/// User-specified filter predicates, combined with logical AND.
///
/// Absent fields impose no constraint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    /// City, matched exactly but case-insensitively. "delhi" matches
    /// "Delhi" but "Delhi" does not match "New Delhi".
    pub city: Option<String>,

    /// Accepted tiers. An empty set is treated the same as `None`.
    pub speed_tiers: Option<BTreeSet<SpeedTier>>,

    /// Inclusive lower bound on rating. Unrated stations count as 0.0.
    pub min_rating: f64,
}

impl FilterCriteria {
    /// Criteria that accept every station.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn with_speed_tiers(mut self, tiers: impl IntoIterator<Item = SpeedTier>) -> Self {
        self.speed_tiers = Some(tiers.into_iter().collect());
        self
    }

    pub fn with_min_rating(mut self, min_rating: f64) -> Self {
        self.min_rating = min_rating;
        self
    }

    /// Whether a station satisfies every supplied predicate.
    pub fn matches(&self, station: &StationRecord) -> bool {
        self.matches_city(station) && self.matches_tier(station) && self.matches_rating(station)
    }

    fn matches_city(&self, station: &StationRecord) -> bool {
        self.city
            .as_ref()
            .is_none_or(|city| city.to_lowercase() == station.city.to_lowercase())
    }

    fn matches_tier(&self, station: &StationRecord) -> bool {
        self.speed_tiers
            .as_ref()
            .is_none_or(|tiers| tiers.is_empty() || tiers.contains(&station.speed_tier))
    }

    fn matches_rating(&self, station: &StationRecord) -> bool {
        station.rating.unwrap_or(0.0) >= self.min_rating
    }
}

/// Stations satisfying `criteria`, in input order.
pub fn filter(stations: &[StationRecord], criteria: &FilterCriteria) -> Vec<StationRecord> {
    stations
        .iter()
        .filter(|s| criteria.matches(s))
        .cloned()
        .collect()
}

/// Sorted, de-duplicated cities, for a locality picker.
///
/// Cities that differ only in case or surrounding whitespace are one entry,
/// spelled as first seen. Stations without a known city are left out.
pub fn cities(stations: &[StationRecord]) -> Vec<String> {
    let mut seen: BTreeMap<String, &str> = BTreeMap::new();
    for city in stations.iter().map(|s| s.city.trim()) {
        if city.is_empty() || city == UNKNOWN_CITY {
            continue;
        }
        seen.entry(city.to_lowercase()).or_insert(city);
    }
    seen.into_values().map(str::to_string).collect()
}
