//! Mock station source for running without API access.
//!
//! Loads sample `/poi` responses from JSON files and serves them as if they
//! were live API responses.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use super::error::FetchError;
use super::request::FetchRequest;
use super::types::{RawStation, decode_stations};
use super::StationSource;

/// Station source that serves data from JSON files.
///
/// This is useful for development and testing without an Open Charge Map key.
#[derive(Debug, Clone)]
pub struct MockStationSource {
    /// Pre-loaded stations, keyed by upper-case region code.
    regions: Arc<HashMap<String, Vec<RawStation>>>,
}

impl MockStationSource {
    /// Create a new mock source by loading JSON files from a directory.
    ///
    /// Expects files named `{REGION}.json` (e.g. `IN.json`), each holding a
    /// `/poi` response body.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, FetchError> {
        let data_dir = data_dir.as_ref();
        let mut regions = HashMap::new();

        let entries = std::fs::read_dir(data_dir).map_err(|e| FetchError::Unavailable {
            message: format!("failed to read mock data directory {:?}: {}", data_dir, e),
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| FetchError::Unavailable {
                message: format!("failed to read directory entry: {}", e),
            })?;

            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            // "IN.json" -> "IN"
            let region = path
                .file_stem()
                .and_then(|s| s.to_str())
                .ok_or_else(|| FetchError::Unavailable {
                    message: format!("invalid filename: {:?}", path),
                })?
                .to_ascii_uppercase();

            let json = std::fs::read_to_string(&path).map_err(|e| FetchError::Unavailable {
                message: format!("failed to read {:?}: {}", path, e),
            })?;

            regions.insert(region, decode_stations(&json)?);
        }

        if regions.is_empty() {
            return Err(FetchError::Unavailable {
                message: format!("no mock region files found in {:?}", data_dir),
            });
        }

        Ok(Self {
            regions: Arc::new(regions),
        })
    }

    /// Build a mock source from in-memory data.
    pub fn from_regions(regions: HashMap<String, Vec<RawStation>>) -> Self {
        let regions = regions
            .into_iter()
            .map(|(k, v)| (k.to_ascii_uppercase(), v))
            .collect();
        Self {
            regions: Arc::new(regions),
        }
    }

    /// Serve the stored stations for a region.
    ///
    /// Mimics the real client. Bounds are ignored since mock data is static;
    /// `max_results` is honoured.
    pub fn fetch(&self, request: &FetchRequest) -> Result<Vec<RawStation>, FetchError> {
        let stations = self
            .regions
            .get(&request.region)
            .ok_or_else(|| FetchError::Upstream {
                status: 404,
                message: format!(
                    "no mock data for region {}. Available: {:?}",
                    request.region,
                    self.available_regions()
                ),
            })?;

        Ok(stations
            .iter()
            .take(request.max_results as usize)
            .cloned()
            .collect())
    }

    /// List regions available in the mock data, sorted.
    pub fn available_regions(&self) -> Vec<String> {
        let mut regions: Vec<String> = self.regions.keys().cloned().collect();
        regions.sort();
        regions
    }
}

impl StationSource for MockStationSource {
    async fn fetch(&self, request: &FetchRequest) -> Result<Vec<RawStation>, FetchError> {
        MockStationSource::fetch(self, request)
    }
}
