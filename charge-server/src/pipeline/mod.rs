//! The station query pipeline.
//!
//! Stages, leaves first:
//! - [`normalize`]: raw directory records to canonical [`StationRecord`]s
//! - [`enrich`]: fill in simulated price and rating, keyed by station id
//! - [`distance`]: geodesic distances and the single nearest station
//! - [`filter`]: city / speed tier / rating predicates
//! - [`assemble`]: merge the filtered list with the nearest result
//!
//! Every stage is a pure function over immutable input. [`StationFinder`]
//! wires them to a [`StationSource`](crate::ocm::StationSource).
//!
//! [`StationRecord`]: crate::domain::StationRecord

pub mod assemble;
pub mod distance;
pub mod enrich;
pub mod filter;
mod finder;
pub mod normalize;

pub use assemble::{ResultEntry, ResultView, assemble};
pub use distance::{DistanceResult, EmptySetError, TIE_EPSILON_KM, distances, geodesic_km, nearest};
pub use enrich::{SIMULATED_PRICE_RANGE, SIMULATED_RATING_RANGE, enrich, enrich_all};
pub use filter::{FilterCriteria, cities, filter};
pub use finder::{FinderError, SortOrder, StationFinder};
pub use normalize::{normalize, normalize_all};
