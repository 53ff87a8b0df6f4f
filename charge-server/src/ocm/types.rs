//! Open Charge Map response DTOs.
//!
//! These types map directly to the `/poi` JSON response. Every field is
//! optional: the directory omits fields, sends `null`, and occasionally
//! sends numbers as strings, so numeric fields go through [`RawNumber`].

use serde::Deserialize;
use tracing::debug;

use super::error::FetchError;

/// A number that may arrive as a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Number(f64),
    Text(String),
}

impl RawNumber {
    /// The finite value, if there is one.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            RawNumber::Number(n) => *n,
            RawNumber::Text(s) => s.trim().parse().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for RawNumber {
    fn from(n: f64) -> Self {
        RawNumber::Number(n)
    }
}

/// Station identifier as sent upstream (integer or string).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Number(serde_json::Number),
    Text(String),
}

impl RawId {
    /// Text form of the id; `None` for blank strings.
    pub fn to_text(&self) -> Option<String> {
        match self {
            RawId::Number(n) => Some(n.to_string()),
            RawId::Text(s) => {
                let s = s.trim();
                (!s.is_empty()).then(|| s.to_string())
            }
        }
    }
}

/// A point of interest (charging location) from `/poi`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawStation {
    #[serde(rename = "ID")]
    pub id: Option<RawId>,

    #[serde(rename = "UUID")]
    pub uuid: Option<String>,

    pub address_info: Option<RawAddressInfo>,

    /// Individual connectors/charge points at this location.
    pub connections: Option<Vec<RawConnection>>,

    /// Numeric status code; present in compact responses.
    #[serde(rename = "StatusTypeID")]
    pub status_type_id: Option<RawNumber>,

    /// Expanded status; present only in verbose responses.
    pub status_type: Option<RawStatusType>,

    /// Free-text cost description, e.g. "₹18/kWh" or "Free".
    pub usage_cost: Option<String>,

    pub user_comments: Option<Vec<RawUserComment>>,

    pub number_of_points: Option<RawNumber>,
}

/// Location details for a point of interest.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawAddressInfo {
    pub title: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub town: Option<String>,
    pub state_or_province: Option<String>,
    pub postcode: Option<String>,
    pub latitude: Option<RawNumber>,
    pub longitude: Option<RawNumber>,
}

/// A single connector.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawConnection {
    #[serde(rename = "PowerKW")]
    pub power_kw: Option<RawNumber>,

    #[serde(rename = "ConnectionTypeID")]
    pub connection_type_id: Option<RawNumber>,

    pub quantity: Option<RawNumber>,
}

/// Expanded status information.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawStatusType {
    pub is_operational: Option<bool>,
    pub title: Option<String>,
}

/// A user check-in or comment.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawUserComment {
    pub rating: Option<RawNumber>,
}

/// Decode a `/poi` response body.
///
/// The body must be a JSON array; anything else is malformed. Elements that
/// don't decode as a station are skipped rather than failing the batch.
pub fn decode_stations(body: &str) -> Result<Vec<RawStation>, FetchError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| FetchError::Malformed {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })?;

    let serde_json::Value::Array(items) = value else {
        return Err(FetchError::Malformed {
            message: "expected a JSON array of stations".to_string(),
            body: Some(body.chars().take(500).collect()),
        });
    };

    let total = items.len();
    let stations: Vec<RawStation> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();

    if stations.len() < total {
        debug!(
            skipped = total - stations.len(),
            total, "skipped undecodable station entries"
        );
    }

    Ok(stations)
}
