//! Conversion from directory DTOs to canonical station records.
//!
//! Normalization is a total, pure function over arbitrary raw input: a
//! record either becomes a valid [`StationRecord`] or is dropped. Nothing
//! here fails a whole batch.

use tracing::debug;

use crate::domain::{
    Coordinate, Estimates, SpeedThresholds, StationId, StationRecord, Status, UNKNOWN_ADDRESS,
    UNKNOWN_CITY, UNNAMED_STATION,
};
use crate::ocm::{RawId, RawNumber, RawStation, RawStatusType, RawUserComment};

/// Open Charge Map status ids meaning the location can be used.
const OPERATIONAL_STATUS_IDS: [u32; 4] = [10, 20, 50, 75];

/// Open Charge Map status ids meaning the location can't be used.
const OFFLINE_STATUS_IDS: [u32; 5] = [30, 100, 150, 200, 210];

/// Convert one raw record.
///
/// Returns `None` when the record has no usable id or no valid coordinate.
pub fn normalize(raw: &RawStation, thresholds: &SpeedThresholds) -> Option<StationRecord> {
    let id = station_id(raw)?;
    let info = raw.address_info.as_ref()?;
    let coordinate = Coordinate::new(
        info.latitude.as_ref()?.as_f64()?,
        info.longitude.as_ref()?.as_f64()?,
    )
    .ok()?;

    let address = [&info.address_line1, &info.address_line2, &info.postcode]
        .into_iter()
        .filter_map(|part| non_blank(part.as_deref()))
        .collect::<Vec<_>>()
        .join(", ");

    let max_power_kw = max_power_kw(raw);

    Some(StationRecord {
        id,
        name: text_or(info.title.as_deref(), UNNAMED_STATION),
        address: if address.is_empty() {
            UNKNOWN_ADDRESS.to_string()
        } else {
            address
        },
        city: text_or(info.town.as_deref(), UNKNOWN_CITY),
        coordinate,
        status: status(raw),
        speed_tier: thresholds.tier_for(max_power_kw),
        max_power_kw,
        price_per_kwh: raw.usage_cost.as_deref().and_then(parse_price_per_kwh),
        rating: raw.user_comments.as_deref().and_then(mean_rating),
        estimates: Estimates::default(),
    })
}

/// Convert a batch, dropping records that don't normalize.
pub fn normalize_all(raws: &[RawStation], thresholds: &SpeedThresholds) -> Vec<StationRecord> {
    let records: Vec<StationRecord> = raws
        .iter()
        .filter_map(|raw| normalize(raw, thresholds))
        .collect();

    let dropped = raws.len() - records.len();
    if dropped > 0 {
        debug!(dropped, kept = records.len(), "dropped unusable station records");
    }

    records
}

fn station_id(raw: &RawStation) -> Option<StationId> {
    raw.id
        .as_ref()
        .and_then(RawId::to_text)
        .or_else(|| non_blank(raw.uuid.as_deref()).map(str::to_string))
        .map(StationId::new)
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

fn text_or(s: Option<&str>, default: &str) -> String {
    non_blank(s).unwrap_or(default).to_string()
}

/// Highest finite, non-negative connector power.
fn max_power_kw(raw: &RawStation) -> Option<f64> {
    raw.connections
        .as_deref()?
        .iter()
        .filter_map(|c| c.power_kw.as_ref().and_then(RawNumber::as_f64))
        .filter(|kw| *kw >= 0.0)
        .max_by(f64::total_cmp)
}

/// Status from, in order of preference: the status title, the
/// `IsOperational` flag, then the numeric status id.
fn status(raw: &RawStation) -> Status {
    let status_type = raw.status_type.as_ref();

    status_type
        .and_then(|t| t.title.as_deref())
        .and_then(status_from_title)
        .or_else(|| {
            status_type
                .and_then(|t: &RawStatusType| t.is_operational)
                .map(|up| if up { Status::Operational } else { Status::Offline })
        })
        .or_else(|| {
            raw.status_type_id
                .as_ref()
                .and_then(RawNumber::as_f64)
                .and_then(status_from_id)
        })
        .unwrap_or(Status::Unknown)
}

fn status_from_title(title: &str) -> Option<Status> {
    let title = title.trim().to_lowercase();
    const OFFLINE_WORDS: [&str; 6] = [
        "not operational",
        "non-operational",
        "offline",
        "unavailable",
        "removed",
        "decommissioned",
    ];

    if OFFLINE_WORDS.iter().any(|w| title.contains(w)) {
        Some(Status::Offline)
    } else if title.contains("operational") || title.contains("available") {
        Some(Status::Operational)
    } else {
        None
    }
}

fn status_from_id(id: f64) -> Option<Status> {
    if id.fract() != 0.0 || id < 0.0 {
        return None;
    }
    let id = id as u32;
    if OPERATIONAL_STATUS_IDS.contains(&id) {
        Some(Status::Operational)
    } else if OFFLINE_STATUS_IDS.contains(&id) {
        Some(Status::Offline)
    } else {
        None
    }
}

/// Extract a per-kWh price from free-text usage cost.
///
/// Recognises "free" as zero and otherwise takes the first number in text
/// that mentions kWh, e.g. "₹18/kWh" or "Rs 15.50 per kWh". Flat fees and
/// time-based prices yield `None`.
fn parse_price_per_kwh(text: &str) -> Option<f64> {
    let lower = text.trim().to_lowercase();
    if lower.starts_with("free") {
        return Some(0.0);
    }
    if !lower.contains("kwh") {
        return None;
    }

    let start = lower.find(|c: char| c.is_ascii_digit())?;
    let number: String = lower[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let value: f64 = number.trim_end_matches('.').parse().ok()?;

    (value.is_finite() && value >= 0.0).then_some(value)
}

/// Mean of the valid user ratings, rounded to one decimal.
fn mean_rating(comments: &[RawUserComment]) -> Option<f64> {
    let ratings: Vec<f64> = comments
        .iter()
        .filter_map(|c| c.rating.as_ref().and_then(RawNumber::as_f64))
        .filter(|r| (0.0..=5.0).contains(r))
        .collect();

    if ratings.is_empty() {
        return None;
    }

    let mean = ratings.iter().sum::<f64>() / ratings.len() as f64;
    Some((mean * 10.0).round() / 10.0)
}
