//! Property Predictor

use crate::aggregator::EnsembleAggregator;
use crate::propagate::ForwardPropagator;
use feature_encoder::{FeatureEncoder, ProfileSample};
use metrics::{counter, histogram};
use rayon::prelude::*;
use rayon::ThreadPool;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use weight_store::{MemberKey, Property, WeightBundle, ENSEMBLE_SIZE};

/// Raw member outputs for one sample, in ensemble order F1..F5, G1..G5
pub type RawOutputs = [f64; ENSEMBLE_SIZE];

/// Ensemble predictor for a single property
///
/// The bundle is immutable and shared; clones are cheap.
#[derive(Debug, Clone)]
pub struct PropertyPredictor {
    bundle: Arc<WeightBundle>,
    aggregator: EnsembleAggregator,
}

impl PropertyPredictor {
    pub fn new(bundle: impl Into<Arc<WeightBundle>>, aggregator: EnsembleAggregator) -> Self {
        Self {
            bundle: bundle.into(),
            aggregator,
        }
    }

    pub fn property(&self) -> Property {
        self.bundle.property()
    }

    pub fn bundle(&self) -> &WeightBundle {
        &self.bundle
    }

    pub fn aggregator(&self) -> &EnsembleAggregator {
        &self.aggregator
    }

    /// Outputs of all ten members
    ///
    /// Each family encodes the sample once with its own statistics.
    pub fn raw_outputs(&self, sample: &ProfileSample) -> RawOutputs {
        let mut outputs = [f64::NAN; ENSEMBLE_SIZE];
        for family in self.bundle.families() {
            let features = FeatureEncoder::encode(sample, family.stats());
            for (seed, weights) in family.members() {
                let key = MemberKey::new(family.family(), seed);
                outputs[key.index()] = ForwardPropagator::propagate(&features, weights, family.stats());
            }
        }
        outputs
    }

    /// Aggregated estimate for one sample
    pub fn predict_one(&self, sample: &ProfileSample) -> f64 {
        self.aggregator.aggregate(&self.raw_outputs(sample))
    }

    /// One estimate per sample, in input order
    pub fn predict(&self, samples: &[ProfileSample]) -> Vec<f64> {
        let start = Instant::now();
        let estimates: Vec<f64> = samples.iter().map(|s| self.predict_one(s)).collect();
        self.record(&estimates, start.elapsed());
        estimates
    }

    /// Like [`predict`](Self::predict), fanning samples out over `pool`
    pub fn predict_parallel(&self, samples: &[ProfileSample], pool: &ThreadPool) -> Vec<f64> {
        if pool.current_num_threads() <= 1 || samples.len() < 2 {
            return self.predict(samples);
        }

        let start = Instant::now();
        let estimates: Vec<f64> = pool.install(|| samples.par_iter().map(|s| self.predict_one(s)).collect());
        self.record(&estimates, start.elapsed());
        estimates
    }

    fn record(&self, estimates: &[f64], elapsed: Duration) {
        let property = self.property().as_str();
        let mut nan_count = 0u64;
        for (i, estimate) in estimates.iter().enumerate() {
            if estimate.is_nan() {
                warn!("{} estimate for sample {} is NaN", property, i);
                nan_count += 1;
            }
        }

        debug!(
            "{}: {} samples in {:.3}ms",
            property,
            estimates.len(),
            elapsed.as_secs_f64() * 1000.0
        );
        counter!("canyon_samples_total", "property" => property).increment(estimates.len() as u64);
        if nan_count > 0 {
            counter!("canyon_nan_estimates_total", "property" => property).increment(nan_count);
        }
        histogram!("canyon_batch_seconds", "property" => property).record(elapsed.as_secs_f64());
    }
}
