//! Parameters for a station directory query.

use crate::domain::Coordinate;

/// Default cap on the number of stations returned by one query.
pub const DEFAULT_MAX_RESULTS: u32 = 500;

/// Optional spatial limit on a query.
#[derive(Debug, Clone, PartialEq)]
pub enum Bounds {
    /// Rectangle given by two opposite corners.
    Box {
        south_west: Coordinate,
        north_east: Coordinate,
    },

    /// Circle around a centre point.
    Radius { center: Coordinate, km: f64 },
}

/// A request for raw stations in one region.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    /// Region code understood by the directory (ISO country code, e.g. "IN").
    pub region: String,

    pub bounds: Option<Bounds>,

    /// Upper bound on the number of records returned.
    pub max_results: u32,
}

impl FetchRequest {
    /// Create a request for a whole region.
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into().trim().to_ascii_uppercase(),
            bounds: None,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    /// Limit the request to a bounding box or radius.
    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Set the result cap.
    pub fn with_max_results(mut self, n: u32) -> Self {
        self.max_results = n;
        self
    }

    /// Query string parameters for the `/poi` endpoint.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("output", "json".to_string()),
            ("countrycode", self.region.clone()),
            ("maxresults", self.max_results.to_string()),
            ("compact", "true".to_string()),
            ("verbose", "false".to_string()),
        ];

        match &self.bounds {
            Some(Bounds::Box {
                south_west,
                north_east,
            }) => {
                params.push((
                    "boundingbox",
                    format!(
                        "({},{}),({},{})",
                        south_west.latitude(),
                        south_west.longitude(),
                        north_east.latitude(),
                        north_east.longitude()
                    ),
                ));
            }
            Some(Bounds::Radius { center, km }) => {
                params.push(("latitude", center.latitude().to_string()));
                params.push(("longitude", center.longitude().to_string()));
                params.push(("distance", km.to_string()));
                params.push(("distanceunit", "KM".to_string()));
            }
            None => {}
        }

        params
    }

    /// Key identifying this request in a response cache.
    ///
    /// Two requests share a key exactly when they'd send the same query.
    pub fn cache_key(&self) -> String {
        self.query_params()
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&")
    }
}
