//! Simulated attributes for stations the directory doesn't price or rate.
//!
//! Values are drawn from a generator seeded by the station id, so a station
//! always gets the same simulated price and rating regardless of call order,
//! while different stations get different values.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::{StationId, StationRecord};

/// Simulated price range, per kWh in local currency.
pub const SIMULATED_PRICE_RANGE: (f64, f64) = (10.0, 25.0);

/// Simulated rating range.
pub const SIMULATED_RATING_RANGE: (f64, f64) = (3.5, 5.0);

/// Fill in `price_per_kwh` and `rating` where the directory left them empty.
///
/// Sourced values are never overwritten. Simulated ones are flagged in
/// [`StationRecord::estimates`].
pub fn enrich(mut record: StationRecord) -> StationRecord {
    let mut rng = StdRng::seed_from_u64(seed_for(&record.id));

    // Always draw both so each value depends only on the id.
    let price = rng.gen_range(SIMULATED_PRICE_RANGE.0..=SIMULATED_PRICE_RANGE.1);
    let rating = rng.gen_range(SIMULATED_RATING_RANGE.0..=SIMULATED_RATING_RANGE.1);

    if record.price_per_kwh.is_none() {
        record.price_per_kwh = Some(round_to(price, 2));
        record.estimates.price = true;
    }
    if record.rating.is_none() {
        record.rating = Some(round_to(rating, 1));
        record.estimates.rating = true;
    }

    record
}

/// Enrich every record in a batch.
pub fn enrich_all(records: Vec<StationRecord>) -> Vec<StationRecord> {
    records.into_iter().map(enrich).collect()
}

/// 64-bit FNV-1a hash of the id text.
///
/// Stable across processes and platforms, unlike `std`'s `DefaultHasher`.
fn seed_for(id: &StationId) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    id.as_str().bytes().fold(OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(PRIME)
    })
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
