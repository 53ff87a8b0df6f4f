//! Charging speed tiers.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Error returned when parsing an unrecognised speed tier name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid speed tier: {0:?} (expected slow, fast or ultrafast)")]
pub struct InvalidSpeedTier(String);

/// Coarse charging power band.
///
/// Ordered slowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedTier {
    Slow,
    Fast,
    UltraFast,
}

impl SpeedTier {
    pub const ALL: [SpeedTier; 3] = [SpeedTier::Slow, SpeedTier::Fast, SpeedTier::UltraFast];

    pub fn as_str(&self) -> &'static str {
        match self {
            SpeedTier::Slow => "slow",
            SpeedTier::Fast => "fast",
            SpeedTier::UltraFast => "ultra_fast",
        }
    }
}

impl fmt::Display for SpeedTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpeedTier {
    type Err = InvalidSpeedTier;

    /// Case-insensitive; accepts `ultrafast`, `ultra_fast` and `ultra-fast`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-' && *c != ' ')
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "slow" => Ok(SpeedTier::Slow),
            "fast" => Ok(SpeedTier::Fast),
            "ultrafast" => Ok(SpeedTier::UltraFast),
            _ => Err(InvalidSpeedTier(s.to_string())),
        }
    }
}

/// Power thresholds mapping connector power to a [`SpeedTier`].
///
/// Power strictly below `fast_from_kw` is slow; power above
/// `ultra_fast_above_kw` is ultra-fast; everything in between (inclusive)
/// is fast.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedThresholds {
    /// Lowest power (kW) classed as fast.
    pub fast_from_kw: f64,

    /// Power (kW) above which a charger is ultra-fast.
    pub ultra_fast_above_kw: f64,
}

impl SpeedThresholds {
    /// Create thresholds with the given boundaries.
    pub fn new(fast_from_kw: f64, ultra_fast_above_kw: f64) -> Self {
        Self {
            fast_from_kw,
            ultra_fast_above_kw,
        }
    }

    /// Classify a power rating.
    ///
    /// An unknown rating is treated as slow.
    pub fn tier_for(&self, power_kw: Option<f64>) -> SpeedTier {
        match power_kw {
            None => SpeedTier::Slow,
            Some(kw) if kw < self.fast_from_kw => SpeedTier::Slow,
            Some(kw) if kw <= self.ultra_fast_above_kw => SpeedTier::Fast,
            Some(_) => SpeedTier::UltraFast,
        }
    }
}

impl Default for SpeedThresholds {
    fn default() -> Self {
        Self {
            fast_from_kw: 22.0,
            ultra_fast_above_kw: 50.0,
        }
    }
}
