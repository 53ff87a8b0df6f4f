//! Web layer for the charging station finder.
//!
//! JSON endpoints for station queries, the nearest-station lookup and the
//! city list.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::{AppState, Finder};
