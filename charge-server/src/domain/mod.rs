//! Domain types for charging station lookup.
//!
//! Types here are valid by construction where it matters: a [`Coordinate`]
//! is always a real WGS-84 position, and every [`StationRecord`] carries one.

mod station;
mod tier;

pub use station::{
    Coordinate, Estimates, InvalidCoordinate, StationId, StationRecord, Status, UNKNOWN_ADDRESS,
    UNKNOWN_CITY, UNNAMED_STATION,
};
pub use tier::{InvalidSpeedTier, SpeedThresholds, SpeedTier};
