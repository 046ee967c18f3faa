//! Feature Vector Assembly

use crate::sample::ProfileSample;
use crate::statistics::NormalizationStats;
use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Number of network inputs
pub const FEATURE_DIMENSION: usize = 7;

/// Scale applied to standardized inputs, matching the activation slope
pub const INPUT_SCALE: f64 = 2.0 / 3.0;

/// Seconds in the fixed 365-day year used for decimal years
const SECONDS_PER_YEAR: f64 = 365.0 * 86_400.0;

/// Network input vector
///
/// Order: latitude, longitude, decimal year, temperature, salinity,
/// oxygen, transformed pressure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub values: [f64; FEATURE_DIMENSION],
}

impl FeatureVector {
    pub fn latitude(&self) -> f64 {
        self.values[0]
    }

    pub fn longitude(&self) -> f64 {
        self.values[1]
    }

    pub fn decimal_year(&self) -> f64 {
        self.values[2]
    }

    pub fn pressure(&self) -> f64 {
        self.values[6]
    }

    /// Standardize each channel as `(2/3) * (x - mean) / std`
    pub fn normalize(&self, stats: &NormalizationStats) -> FeatureVector {
        let mut values = [0.0; FEATURE_DIMENSION];
        for (i, v) in values.iter_mut().enumerate() {
            *v = INPUT_SCALE * ((self.values[i] - stats.mean[i]) / stats.std[i]);
        }
        FeatureVector { values }
    }
}

/// Map longitudes above 180 into the western hemisphere
///
/// Values below -180 are passed through unchanged.
pub fn wrap_longitude(longitude: f64) -> f64 {
    if longitude > 180.0 {
        longitude - 360.0
    } else {
        longitude
    }
}

/// Year plus the elapsed fraction of a 365-day year (leap days ignored)
pub fn decimal_year(at: &NaiveDateTime) -> f64 {
    let elapsed = at.ordinal0() as f64 * 86_400.0
        + at.num_seconds_from_midnight() as f64
        + at.nanosecond() as f64 * 1e-9;
    at.year() as f64 + elapsed / SECONDS_PER_YEAR
}

/// Bounded pressure coordinate: `p/20000 + 1/(1 + exp(-p/300))^3`
pub fn transform_pressure(pressure: f64) -> f64 {
    pressure / 2e4 + 1.0 / (1.0 + (-pressure / 300.0).exp()).powi(3)
}

/// Encodes samples into network inputs
///
/// Pure and stateless; one encoder serves every family.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureEncoder;

impl FeatureEncoder {
    /// Physical features before normalization
    pub fn raw_features(sample: &ProfileSample) -> FeatureVector {
        FeatureVector {
            values: [
                sample.latitude,
                wrap_longitude(sample.longitude),
                decimal_year(&sample.observed_at),
                sample.temperature,
                sample.salinity,
                sample.oxygen,
                transform_pressure(sample.pressure),
            ],
        }
    }

    /// Normalized features for one family's statistics
    pub fn encode(sample: &ProfileSample, stats: &NormalizationStats) -> FeatureVector {
        Self::raw_features(sample).normalize(stats)
    }
}
