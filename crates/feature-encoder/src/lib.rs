//! Feature Encoding
//!
//! Turns physical profile measurements into the normalized 7-dimensional
//! input vector consumed by the CANYON-MED networks.

mod error;
mod features;
mod sample;
mod statistics;

pub use error::EncodingError;
pub use features::{
    decimal_year, transform_pressure, wrap_longitude, FeatureEncoder, FeatureVector,
    FEATURE_DIMENSION, INPUT_SCALE,
};
pub use sample::{parse_observation_date, ProfileBatch, ProfileSample};
pub use statistics::NormalizationStats;
