//! Open Charge Map station directory.
//!
//! This module fetches raw charging-station records for a region. It is the
//! only part of the crate that performs I/O.
//!
//! Key characteristics of the directory:
//! - Records are heterogeneous: any field may be missing or `null`, and
//!   numbers sometimes arrive as strings
//! - A query is bounded by region code, an optional bounding box or radius,
//!   and a result cap
//! - One request per fetch; retrying is the caller's concern

mod cache;
mod client;
mod error;
mod mock;
mod request;
mod types;

use std::future::Future;

pub use cache::{CacheConfig, CachedStationSource};
pub use client::{OcmClient, OcmConfig};
pub use error::FetchError;
pub use mock::MockStationSource;
pub use request::{Bounds, DEFAULT_MAX_RESULTS, FetchRequest};
pub use types::{
    RawAddressInfo, RawConnection, RawId, RawNumber, RawStation, RawStatusType, RawUserComment,
    decode_stations,
};

/// Trait for providing raw station records.
///
/// This abstraction allows the pipeline to be tested with mock data.
pub trait StationSource {
    /// Fetch raw stations matching the request.
    ///
    /// Either the complete list is returned or an error; never a partial list.
    fn fetch(
        &self,
        request: &FetchRequest,
    ) -> impl Future<Output = Result<Vec<RawStation>, FetchError>> + Send;
}

/// The station source chosen at start-up.
#[derive(Debug, Clone)]
pub enum Backend {
    /// Live Open Charge Map API.
    Live(OcmClient),

    /// Static JSON files.
    Mock(MockStationSource),
}

impl StationSource for Backend {
    async fn fetch(&self, request: &FetchRequest) -> Result<Vec<RawStation>, FetchError> {
        match self {
            Backend::Live(client) => client.fetch(request).await,
            Backend::Mock(mock) => mock.fetch(request),
        }
    }
}
