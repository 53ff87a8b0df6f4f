//! Station identity, position and the canonical station record.

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

use super::SpeedTier;

/// Placeholder city for stations whose upstream record has none.
pub const UNKNOWN_CITY: &str = "Unknown";

/// Placeholder name for stations whose upstream record has none.
pub const UNNAMED_STATION: &str = "Unnamed station";

/// Placeholder address for stations whose upstream record has none.
pub const UNKNOWN_ADDRESS: &str = "Address unavailable";

/// Opaque upstream station identifier.
///
/// Upstream IDs arrive as either JSON integers or strings; both are held as
/// text. Purely numeric ids order numerically and sort before all other ids,
/// which order lexicographically. So `"9" < "10" < "A10" < "A9"`.
///
/// # Examples
///
/// ```
/// use charge_server::domain::StationId;
///
/// assert!(StationId::new("9") < StationId::new("10"));
/// assert!(StationId::new("A10") < StationId::new("A9"));
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct StationId(String);

impl StationId {
    /// Wrap an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn numeric(&self) -> Option<u128> {
        if self.0.is_empty() || !self.0.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        self.0.parse().ok()
    }
}

impl Ord for StationId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric(), other.numeric()) {
            // "007" and "7" are numerically equal but not Eq, so fall back to text.
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for StationId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Error returned when a latitude/longitude pair is not a valid WGS-84 position.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid coordinate: {reason}")]
pub struct InvalidCoordinate {
    reason: &'static str,
}

/// A WGS-84 position in decimal degrees.
///
/// Valid by construction: both values are finite, latitude lies in
/// `[-90, 90]` and longitude in `[-180, 180]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Validate and build a coordinate.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinate> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(InvalidCoordinate {
                reason: "latitude and longitude must be finite",
            });
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(InvalidCoordinate {
                reason: "latitude must be within [-90, 90]",
            });
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(InvalidCoordinate {
                reason: "longitude must be within [-180, 180]",
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.5}, {:.5})", self.latitude, self.longitude)
    }
}

/// Operational status reported by the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Operational,
    Offline,
    Unknown,
}

/// Which attributes of a record were simulated rather than sourced upstream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Estimates {
    pub price: bool,
    pub rating: bool,
}

/// Canonical station record used by every downstream stage.
///
/// Produced by normalization with `price_per_kwh`/`rating` set only when the
/// directory supplied them; enrichment fills in the rest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationRecord {
    pub id: StationId,
    pub name: String,
    pub address: String,
    pub city: String,
    pub coordinate: Coordinate,
    pub status: Status,
    pub speed_tier: SpeedTier,

    /// Highest connector power in kW, if the directory listed any.
    pub max_power_kw: Option<f64>,

    /// Price in local currency per kWh.
    pub price_per_kwh: Option<f64>,

    /// Average user rating in `[0, 5]`.
    pub rating: Option<f64>,

    pub estimates: Estimates,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_ids_order_numerically() {
        assert!(StationId::new("9") < StationId::new("10"));
        assert!(StationId::new("100") > StationId::new("99"));
        assert_eq!(
            StationId::new("42").cmp(&StationId::new("42")),
            Ordering::Equal
        );
    }

    #[test]
    fn text_ids_order_lexicographically() {
        assert!(StationId::new("A10") < StationId::new("A9"));
        assert!(StationId::new("abc") < StationId::new("abd"));
        // Numeric ids sort before text ids
        assert!(StationId::new("10") < StationId::new("9a"));
        assert!(StationId::new("2") < StationId::new("1a"));
    }

    #[test]
    fn leading_zeros_are_distinct_but_ordered() {
        let a = StationId::new("007");
        let b = StationId::new("7");
        assert_ne!(a, b);
        assert_ne!(a.cmp(&b), Ordering::Equal);
    }

    #[test]
    fn station_id_display_and_debug() {
        let id = StationId::new("1234");
        assert_eq!(id.to_string(), "1234");
        assert_eq!(format!("{:?}", id), "StationId(1234)");
    }

    #[test]
    fn accept_valid_coordinates() {
        assert!(Coordinate::new(0.0, 0.0).is_ok());
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
        assert!(Coordinate::new(12.97, 77.59).is_ok());
    }

    #[test]
    fn reject_out_of_range_coordinates() {
        assert!(Coordinate::new(90.01, 0.0).is_err());
        assert!(Coordinate::new(-91.0, 0.0).is_err());
        assert!(Coordinate::new(0.0, 180.5).is_err());
        assert!(Coordinate::new(0.0, -181.0).is_err());
    }

    #[test]
    fn reject_non_finite_coordinates() {
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn invalid_coordinate_display() {
        let err = Coordinate::new(100.0, 0.0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid coordinate: latitude must be within [-90, 90]"
        );
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn coordinate_accepts_exactly_the_valid_range(
            lat in -200.0f64..200.0,
            lon in -400.0f64..400.0,
        ) {
            let valid = (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon);
            prop_assert_eq!(Coordinate::new(lat, lon).is_ok(), valid);
        }

        #[test]
        fn station_id_ordering_is_total(
            a in "[0-9A-C]{1,4}",
            b in "[0-9A-C]{1,4}",
            c in "[0-9A-C]{1,4}",
        ) {
            let (a, b, c) = (StationId::new(a), StationId::new(b), StationId::new(c));
            prop_assert_eq!(a.cmp(&b), b.cmp(&a).reverse());
            prop_assert_eq!(a.cmp(&b) == Ordering::Equal, a == b);
            if a <= b && b <= c {
                prop_assert!(a <= c);
            }
        }
    }
}
