//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use crate::ocm::FetchError;
use crate::pipeline::{FinderError, ResultView, cities};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/stations", get(search_stations))
        .route("/api/nearest", get(nearest_station))
        .route("/api/cities", get(list_cities))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Filtered stations around a reference point, with the nearest marked.
async fn search_stations(
    State(state): State<AppState>,
    query: Result<Query<StationsQuery>, QueryRejection>,
) -> Result<Json<ResultView>, AppError> {
    let Query(query) = query?;
    let reference = query.reference()?;
    let criteria = query.criteria()?;
    let order = query.sort_order()?;
    let request = state.request_for(query.region.as_deref());

    let view = state
        .finder
        .query(&request, reference, &criteria, order)
        .await?;

    Ok(Json(view))
}

/// The single nearest station in a region.
async fn nearest_station(
    State(state): State<AppState>,
    query: Result<Query<NearestQuery>, QueryRejection>,
) -> Result<Json<NearestResponse>, AppError> {
    let Query(query) = query?;
    let reference = query.reference()?;
    let request = state.request_for(query.region.as_deref());

    let (nearest, station) = state.finder.nearest(&request, reference).await?;

    Ok(Json(NearestResponse { nearest, station }))
}

/// Cities with at least one usable station.
async fn list_cities(
    State(state): State<AppState>,
    query: Result<Query<CitiesQuery>, QueryRejection>,
) -> Result<Json<CitiesResponse>, AppError> {
    let Query(query) = query?;
    let request = state.request_for(query.region.as_deref());
    let stations = state.finder.load(&request).await?;

    Ok(Json(CitiesResponse {
        cities: cities(&stations),
        region: request.region,
    }))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    BadGateway { message: String },
    ServiceUnavailable { message: String },
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::BadGateway { .. } => StatusCode::BAD_GATEWAY,
            AppError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn message(&self) -> &str {
        match self {
            AppError::BadRequest { message }
            | AppError::NotFound { message }
            | AppError::BadGateway { message }
            | AppError::ServiceUnavailable { message } => message,
        }
    }
}

impl From<BadQuery> for AppError {
    fn from(e: BadQuery) -> Self {
        AppError::BadRequest { message: e.0 }
    }
}

impl From<QueryRejection> for AppError {
    fn from(e: QueryRejection) -> Self {
        AppError::BadRequest {
            message: e.body_text(),
        }
    }
}

impl From<FinderError> for AppError {
    fn from(e: FinderError) -> Self {
        // Full detail goes to the log; clients get a summary.
        let detail = e.to_string();

        let app = match e {
            FinderError::EmptySet(_) => AppError::NotFound {
                message: "no stations found".into(),
            },
            FinderError::Fetch(FetchError::Network(_)) => AppError::ServiceUnavailable {
                message: "could not reach data source".into(),
            },
            FinderError::Fetch(FetchError::Unavailable { .. }) => AppError::ServiceUnavailable {
                message: "data source unavailable".into(),
            },
            FinderError::Fetch(FetchError::Upstream { status: 404, .. }) => AppError::NotFound {
                message: "no station data for this region".into(),
            },
            FinderError::Fetch(e @ (FetchError::Upstream { .. } | FetchError::Malformed { .. })) => {
                AppError::BadGateway {
                    message: e.to_string(),
                }
            }
        };

        if app.status().is_server_error() {
            warn!(error = %detail, status = %app.status(), "station query failed");
        } else {
            debug!(error = %detail, status = %app.status(), "station query failed");
        }
        app
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        debug!(%status, message = self.message(), "request rejected");

        let body = Json(ErrorResponse {
            error: self.message().to_string(),
        });
        (status, body).into_response()
    }
}
