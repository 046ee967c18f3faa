//! Forward Propagation

use feature_encoder::{FeatureVector, NormalizationStats};
use ndarray::aview1;
use weight_store::WeightSet;

/// Amplitude of the scaled hyperbolic tangent
///
/// Two historical literals exist (1.7159 and 1.715905); the more precise
/// one is used for every property.
pub const ACTIVATION_AMPLITUDE: f64 = 1.715905;

/// Slope of the scaled hyperbolic tangent
pub const ACTIVATION_SLOPE: f64 = 2.0 / 3.0;

/// Gain applied to the linear output before denormalization
pub const OUTPUT_SCALE: f64 = 1.5;

/// `A * tanh((2/3) x)`
#[inline]
pub fn scaled_tanh(x: f64) -> f64 {
    ACTIVATION_AMPLITUDE * (ACTIVATION_SLOPE * x).tanh()
}

/// Evaluates one ensemble member
///
/// Stateless; members may be evaluated in any order or concurrently.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForwardPropagator;

impl ForwardPropagator {
    /// Raw estimate of one member for an already normalized input
    ///
    /// `stats` must belong to the member's family. Non-finite values
    /// propagate into the result.
    pub fn propagate(features: &FeatureVector, weights: &WeightSet, stats: &NormalizationStats) -> f64 {
        let x = aview1(&features.values);
        let hidden1 = (weights.input_weights().dot(&x) + weights.input_bias()).mapv(scaled_tanh);
        let hidden2 = (weights.layer1_weights().dot(&hidden1) + weights.layer1_bias()).mapv(scaled_tanh);
        let linear = weights.output_weights().row(0).dot(&hidden2) + weights.output_bias();
        stats.denormalize_output(OUTPUT_SCALE * linear)
    }
}
