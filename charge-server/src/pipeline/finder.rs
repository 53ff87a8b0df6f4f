//! End-to-end station query: fetch, normalize, enrich, then answer.

use tracing::{debug, info};

use crate::domain::{Coordinate, SpeedThresholds, StationRecord};
use crate::ocm::{FetchError, FetchRequest, StationSource};

use super::assemble::{ResultView, assemble};
use super::distance::{DistanceResult, EmptySetError, distances, nearest};
use super::enrich::enrich_all;
use super::filter::{FilterCriteria, filter};
use super::normalize::normalize_all;

/// Errors from a pipeline invocation.
#[derive(Debug, thiserror::Error)]
pub enum FinderError {
    /// The station directory could not supply stations.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// No stations to pick a nearest from.
    #[error(transparent)]
    EmptySet(#[from] EmptySetError),
}

/// How result entries are ordered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// The order the directory returned them in.
    #[default]
    Upstream,

    /// Nearest first.
    Distance,
}

/// Runs the station pipeline against a source.
///
/// Holds no per-query state; every call starts from a fresh fetch (which a
/// caching source may answer without I/O).
pub struct StationFinder<S> {
    source: S,
    thresholds: SpeedThresholds,
}

impl<S: StationSource> StationFinder<S> {
    /// Create a finder with default speed thresholds.
    pub fn new(source: S) -> Self {
        Self::with_thresholds(source, SpeedThresholds::default())
    }

    pub fn with_thresholds(source: S, thresholds: SpeedThresholds) -> Self {
        Self { source, thresholds }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn thresholds(&self) -> &SpeedThresholds {
        &self.thresholds
    }

    /// Fetch, normalize and enrich the stations for a request.
    pub async fn load(&self, request: &FetchRequest) -> Result<Vec<StationRecord>, FinderError> {
        let raw = self.source.fetch(request).await?;
        let records = enrich_all(normalize_all(&raw, &self.thresholds));
        debug!(
            region = %request.region,
            fetched = raw.len(),
            usable = records.len(),
            "loaded stations"
        );
        Ok(records)
    }

    /// The nearest station in the request's region, with its record.
    pub async fn nearest(
        &self,
        request: &FetchRequest,
        reference: Coordinate,
    ) -> Result<(DistanceResult, StationRecord), FinderError> {
        let stations = self.load(request).await?;
        let result = nearest(reference, &stations)?;

        let station = stations
            .into_iter()
            .find(|s| s.id == result.id)
            .ok_or(EmptySetError)?;
        Ok((result, station))
    }

    /// Run a full query.
    ///
    /// The nearest station is chosen from the whole enriched set, and the
    /// filter runs independently over the same set. Filtering down to zero
    /// stations is a valid, empty result.
    pub async fn query(
        &self,
        request: &FetchRequest,
        reference: Coordinate,
        criteria: &FilterCriteria,
        order: SortOrder,
    ) -> Result<ResultView, FinderError> {
        let stations = self.load(request).await?;

        let nearest = nearest(reference, &stations)?;
        let filtered = filter(&stations, criteria);
        let distances = distances(reference, &stations);

        let view = assemble(&filtered, &nearest).with_distances(&distances);
        let view = match order {
            SortOrder::Upstream => view,
            SortOrder::Distance => view.rank_by_distance(),
        };

        info!(
            region = %request.region,
            %reference,
            total = stations.len(),
            matched = view.len(),
            nearest = %nearest.id,
            nearest_km = nearest.distance_km,
            "station query"
        );
        Ok(view)
    }
}
