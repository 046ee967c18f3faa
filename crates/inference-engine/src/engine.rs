//! Predictor Set
//!
//! Loads one predictor per property at startup and dispatches batches to
//! them. The four properties share one code path and differ only in the
//! bundle each predictor holds.

use crate::aggregator::{EnsembleAggregator, StdDevKind};
use crate::predictor::PropertyPredictor;
use crate::InferenceError;
use feature_encoder::ProfileSample;
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;
use weight_store::{Property, WeightStore};

fn default_threads() -> usize {
    1
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Standard deviation used for the outlier band
    #[serde(default)]
    pub std_dev: StdDevKind,
    /// Worker threads per batch (1 = run on the calling thread)
    #[serde(default = "default_threads")]
    pub threads: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            std_dev: StdDevKind::default(),
            threads: default_threads(),
        }
    }
}

/// Predictors for a set of properties
#[derive(Debug, Clone)]
pub struct PredictorSet {
    predictors: BTreeMap<Property, PropertyPredictor>,
    /// Shared worker pool, absent when batches run on the calling thread
    pool: Option<Arc<ThreadPool>>,
}

impl PredictorSet {
    /// Load all four properties from a store
    pub fn load(store: &dyn WeightStore, config: &EngineConfig) -> Result<Self, InferenceError> {
        Self::load_properties(store, &Property::ALL, config)
    }

    /// Load selected properties; any bundle error aborts the whole load
    pub fn load_properties(
        store: &dyn WeightStore,
        properties: &[Property],
        config: &EngineConfig,
    ) -> Result<Self, InferenceError> {
        let aggregator = EnsembleAggregator::new(config.std_dev);
        let mut predictors = Vec::with_capacity(properties.len());
        for &property in properties {
            let bundle = store.load_bundle(property)?;
            predictors.push(PropertyPredictor::new(bundle, aggregator));
        }
        let set = Self::from_predictors(predictors, config.threads)?;
        info!(
            "Predictor set ready: {:?} (std_dev={:?}, threads={})",
            set.properties(),
            config.std_dev,
            set.threads()
        );
        Ok(set)
    }

    /// Assemble from ready-made predictors
    pub fn from_predictors(
        predictors: impl IntoIterator<Item = PropertyPredictor>,
        threads: usize,
    ) -> Result<Self, InferenceError> {
        let pool = if threads > 1 {
            let pool = ThreadPoolBuilder::new()
                .num_threads(threads)
                .thread_name(|i| format!("canyon-worker-{}", i))
                .build()?;
            Some(Arc::new(pool))
        } else {
            None
        };
        Ok(Self {
            predictors: predictors.into_iter().map(|p| (p.property(), p)).collect(),
            pool,
        })
    }

    pub fn get(&self, property: Property) -> Result<&PropertyPredictor, InferenceError> {
        self.predictors
            .get(&property)
            .ok_or(InferenceError::MissingProperty(property))
    }

    /// Loaded properties in canonical order
    pub fn properties(&self) -> Vec<Property> {
        self.predictors.keys().copied().collect()
    }

    /// Worker threads used per batch
    pub fn threads(&self) -> usize {
        self.pool.as_ref().map_or(1, |pool| pool.current_num_threads())
    }

    /// Estimates for one property
    pub fn predict(&self, property: Property, samples: &[ProfileSample]) -> Result<Vec<f64>, InferenceError> {
        Ok(self.run(self.get(property)?, samples))
    }

    /// Estimates for every loaded property
    pub fn predict_all(&self, samples: &[ProfileSample]) -> BTreeMap<Property, Vec<f64>> {
        self.predictors
            .iter()
            .map(|(&property, predictor)| (property, self.run(predictor, samples)))
            .collect()
    }

    fn run(&self, predictor: &PropertyPredictor, samples: &[ProfileSample]) -> Vec<f64> {
        match &self.pool {
            Some(pool) => predictor.predict_parallel(samples, pool),
            None => predictor.predict(samples),
        }
    }
}
