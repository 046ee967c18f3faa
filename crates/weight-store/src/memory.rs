//! In-Memory Weight Store

use crate::keys::{Family, MemberKey, Property};
use crate::weights::{WeightBundle, WeightSet};
use crate::{StoreError, WeightStore};
use feature_encoder::NormalizationStats;
use std::collections::HashMap;

/// Map-backed store for embedded or synthetic weights
#[derive(Debug, Clone, Default)]
pub struct InMemoryWeightStore {
    stats: HashMap<(Property, Family), NormalizationStats>,
    weights: HashMap<(Property, MemberKey), WeightSet>,
}

impl InMemoryWeightStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_stats(&mut self, property: Property, family: Family, stats: NormalizationStats) {
        self.stats.insert((property, family), stats);
    }

    pub fn insert_weights(&mut self, property: Property, member: MemberKey, weights: WeightSet) {
        self.weights.insert((property, member), weights);
    }

    /// Register every piece of an assembled bundle
    pub fn insert_bundle(&mut self, bundle: &WeightBundle) {
        for family in bundle.families() {
            self.insert_stats(bundle.property(), family.family(), family.stats().clone());
            for (seed, weights) in family.members() {
                let key = MemberKey::new(family.family(), seed);
                self.insert_weights(bundle.property(), key, weights.clone());
            }
        }
    }
}

impl WeightStore for InMemoryWeightStore {
    fn load_stats(&self, property: Property, family: Family) -> Result<NormalizationStats, StoreError> {
        self.stats
            .get(&(property, family))
            .cloned()
            .ok_or_else(|| StoreError::MissingEntry(format!("{} statistics for family {}", property, family)))
    }

    fn load_weights(&self, property: Property, member: MemberKey) -> Result<WeightSet, StoreError> {
        self.weights
            .get(&(property, member))
            .cloned()
            .ok_or_else(|| StoreError::MissingEntry(format!("{} weights for member {}", property, member)))
    }
}
