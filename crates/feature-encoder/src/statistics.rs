//! Normalization Statistics

use crate::features::FEATURE_DIMENSION;
use serde::{Deserialize, Serialize};

/// Training statistics of one network family
///
/// Input channels are standardized with `mean`/`std`; the output channel
/// statistics rescale the network's linear output back to physical units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizationStats {
    /// Per-feature means
    pub mean: [f64; FEATURE_DIMENSION],
    /// Per-feature standard deviations
    pub std: [f64; FEATURE_DIMENSION],
    /// Output channel mean
    pub output_mean: f64,
    /// Output channel standard deviation
    pub output_std: f64,
}

impl NormalizationStats {
    /// Create statistics from input and output channel moments
    pub fn new(
        mean: [f64; FEATURE_DIMENSION],
        std: [f64; FEATURE_DIMENSION],
        output_mean: f64,
        output_std: f64,
    ) -> Self {
        Self {
            mean,
            std,
            output_mean,
            output_std,
        }
    }

    /// Identity statistics (zero mean, unit std) for both channels
    pub fn identity() -> Self {
        Self::new([0.0; FEATURE_DIMENSION], [1.0; FEATURE_DIMENSION], 0.0, 1.0)
    }

    /// Map a linear network output back into physical units
    pub fn denormalize_output(&self, scaled: f64) -> f64 {
        scaled * self.output_std + self.output_mean
    }
}
