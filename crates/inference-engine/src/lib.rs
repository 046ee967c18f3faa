//! Ensemble Inference Engine
//!
//! Runs the ten CANYON-MED networks of a property over a batch of profile
//! samples and combines their outputs with a one-sigma trimmed mean.

mod aggregator;
mod engine;
mod predictor;
mod propagate;

#[cfg(test)]
mod fixtures;

pub use aggregator::{AcceptanceBand, Aggregate, EnsembleAggregator, StdDevKind};
pub use engine::{EngineConfig, PredictorSet};
pub use predictor::{PropertyPredictor, RawOutputs};
pub use propagate::{scaled_tanh, ForwardPropagator, ACTIVATION_AMPLITUDE, ACTIVATION_SLOPE, OUTPUT_SCALE};

use thiserror::Error;
use weight_store::{Property, StoreError};

/// Errors during inference setup
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("weight bundle load failed: {0}")]
    Store(#[from] StoreError),
    #[error("no predictor loaded for {0}")]
    MissingProperty(Property),
    #[error("worker pool setup failed: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
