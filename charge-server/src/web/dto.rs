//! Data transfer objects for web requests and responses.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::{Coordinate, SpeedTier, StationRecord};
use crate::pipeline::{DistanceResult, FilterCriteria, SortOrder};

/// Query string for `GET /api/stations`.
#[derive(Debug, Default, Deserialize)]
pub struct StationsQuery {
    /// Reference latitude
    pub lat: Option<f64>,

    /// Reference longitude
    pub lon: Option<f64>,

    /// Region code (defaults to the configured region)
    pub region: Option<String>,

    /// Exact city name, any case
    pub city: Option<String>,

    /// Comma-separated tiers, e.g. "fast,ultra_fast"
    pub tiers: Option<String>,

    /// Inclusive minimum rating
    pub min_rating: Option<f64>,

    /// "upstream" (default) or "distance"
    pub sort: Option<String>,
}

/// Query string for `GET /api/nearest`.
#[derive(Debug, Default, Deserialize)]
pub struct NearestQuery {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub region: Option<String>,
}

/// Query string for `GET /api/cities`.
#[derive(Debug, Default, Deserialize)]
pub struct CitiesQuery {
    pub region: Option<String>,
}

/// Response for the nearest-station lookup.
#[derive(Debug, Serialize)]
pub struct NearestResponse {
    pub nearest: DistanceResult,
    pub station: StationRecord,
}

/// Response for the city list.
#[derive(Debug, Serialize)]
pub struct CitiesResponse {
    pub region: String,
    pub cities: Vec<String>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// A query parameter that couldn't be understood.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct BadQuery(pub String);

impl StationsQuery {
    pub fn reference(&self) -> Result<Coordinate, BadQuery> {
        parse_reference(self.lat, self.lon)
    }

    /// Filter criteria from the optional parameters.
    pub fn criteria(&self) -> Result<FilterCriteria, BadQuery> {
        let mut criteria = FilterCriteria::any();

        if let Some(city) = self.city.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            criteria = criteria.with_city(city);
        }
        if let Some(tiers) = &self.tiers {
            let tiers = parse_tiers(tiers)?;
            if !tiers.is_empty() {
                criteria = criteria.with_speed_tiers(tiers);
            }
        }
        if let Some(min_rating) = self.min_rating {
            if !min_rating.is_finite() {
                return Err(BadQuery("min_rating must be a number".into()));
            }
            criteria = criteria.with_min_rating(min_rating);
        }

        Ok(criteria)
    }

    pub fn sort_order(&self) -> Result<SortOrder, BadQuery> {
        parse_sort(self.sort.as_deref())
    }
}

impl NearestQuery {
    pub fn reference(&self) -> Result<Coordinate, BadQuery> {
        parse_reference(self.lat, self.lon)
    }
}

/// Validate a required `lat`/`lon` pair.
pub fn parse_reference(lat: Option<f64>, lon: Option<f64>) -> Result<Coordinate, BadQuery> {
    let (Some(lat), Some(lon)) = (lat, lon) else {
        return Err(BadQuery("lat and lon are required".into()));
    };
    Coordinate::new(lat, lon).map_err(|e| BadQuery(e.to_string()))
}

/// Parse a comma-separated tier list. Blank items are ignored.
pub fn parse_tiers(raw: &str) -> Result<BTreeSet<SpeedTier>, BadQuery> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<SpeedTier>().map_err(|e| BadQuery(e.to_string())))
        .collect()
}

pub fn parse_sort(raw: Option<&str>) -> Result<SortOrder, BadQuery> {
    match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        None | Some("") | Some("upstream") => Ok(SortOrder::Upstream),
        Some("distance") => Ok(SortOrder::Distance),
        Some(other) => Err(BadQuery(format!(
            "unknown sort {other:?}, expected \"upstream\" or \"distance\""
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_requires_both_values() {
        assert!(parse_reference(Some(12.9), None).is_err());
        assert!(parse_reference(None, None).is_err());
        assert_eq!(
            parse_reference(Some(12.97), Some(77.6)).unwrap(),
            Coordinate::new(12.97, 77.6).unwrap()
        );
    }

    #[test]
    fn reference_rejects_out_of_range() {
        let err = parse_reference(Some(91.0), Some(0.0)).unwrap_err();
        assert!(err.0.contains("latitude"), "{err}");
    }

    #[test]
    fn tiers_parse() {
        let tiers = parse_tiers("slow, UltraFast,,fast").unwrap();
        assert_eq!(
            tiers,
            BTreeSet::from([SpeedTier::Slow, SpeedTier::Fast, SpeedTier::UltraFast])
        );
        assert!(parse_tiers("").unwrap().is_empty());
        assert!(parse_tiers("slow,warp").is_err());
    }

    #[test]
    fn sort_parse() {
        assert_eq!(parse_sort(None).unwrap(), SortOrder::Upstream);
        assert_eq!(parse_sort(Some("Distance")).unwrap(), SortOrder::Distance);
        assert!(parse_sort(Some("rating")).is_err());
    }

    #[test]
    fn criteria_from_query() {
        let query = StationsQuery {
            city: Some(" Delhi ".into()),
            tiers: Some("fast".into()),
            min_rating: Some(4.0),
            ..Default::default()
        };
        let criteria = query.criteria().unwrap();

        assert_eq!(criteria.city.as_deref(), Some("Delhi"));
        assert_eq!(criteria.speed_tiers, Some(BTreeSet::from([SpeedTier::Fast])));
        assert_eq!(criteria.min_rating, 4.0);
    }

    #[test]
    fn empty_parameters_impose_nothing() {
        let query = StationsQuery {
            city: Some("".into()),
            tiers: Some(" , ".into()),
            ..Default::default()
        };
        assert_eq!(query.criteria().unwrap(), FilterCriteria::any());
    }

    #[test]
    fn query_string_deserializes() {
        let json = serde_json::json!({"lat": 12.97, "lon": 77.6, "sort": "distance"});
        let query: StationsQuery = serde_json::from_value(json).unwrap();
        assert!(query.reference().is_ok());
        assert_eq!(query.sort_order().unwrap(), SortOrder::Distance);
    }
}
