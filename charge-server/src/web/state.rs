//! Application state for the web layer.

use std::sync::Arc;

use crate::ocm::{Backend, CachedStationSource, FetchRequest};
use crate::pipeline::StationFinder;

/// The finder type the server runs.
pub type Finder = StationFinder<CachedStationSource<Backend>>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Station pipeline over the cached directory
    pub finder: Arc<Finder>,

    /// Region used when a request doesn't name one
    pub default_region: String,
}

impl AppState {
    /// Create a new app state.
    pub fn new(finder: Finder, default_region: impl Into<String>) -> Self {
        Self {
            finder: Arc::new(finder),
            default_region: default_region.into(),
        }
    }

    /// Directory request for the given region, or the default one.
    pub fn request_for(&self, region: Option<&str>) -> FetchRequest {
        let region = region
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(&self.default_region);
        FetchRequest::new(region)
    }
}
