//! Weight Store
//!
//! Keyed access to the pretrained weights and normalization statistics of
//! the CANYON-MED ensemble. Everything returned from a store is already
//! shape checked, so inference never fails on malformed bundles.

mod directory;
mod keys;
mod memory;
mod table;
mod weights;

pub use directory::{DirectoryWeightStore, FileLayout};
pub use keys::{Family, MemberKey, Property, Seed, ENSEMBLE_SIZE, SEEDS_PER_FAMILY};
pub use memory::InMemoryWeightStore;
pub use table::NumericTable;
pub use weights::{FamilyBundle, WeightBundle, WeightSet};

use feature_encoder::NormalizationStats;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

/// Errors while loading weight bundles
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}:{line}: not a number: {token:?}")]
    Parse {
        path: PathBuf,
        line: usize,
        token: String,
    },
    #[error("{path}: table contains no numeric rows")]
    EmptyTable { path: PathBuf },
    #[error("{path}:{line}: expected {expected} columns, got {actual}")]
    RaggedTable {
        path: PathBuf,
        line: usize,
        expected: usize,
        actual: usize,
    },
    #[error("shape mismatch in {what}: expected {expected}, got {actual}")]
    ShapeMismatch {
        what: String,
        expected: String,
        actual: String,
    },
    #[error("{path}: column {column} missing (row has {available} values)")]
    MissingColumn {
        path: PathBuf,
        column: usize,
        available: usize,
    },
    #[error("no entry for {0}")]
    MissingEntry(String),
    #[error("invalid seed {0}: seeds run from 1 to {}", SEEDS_PER_FAMILY)]
    InvalidSeed(u8),
    #[error("incomplete bundle: {0}")]
    IncompleteBundle(String),
}

/// Source of pretrained ensemble weights
///
/// Implementations are resolved once at startup and shared read-only.
pub trait WeightStore: Send + Sync {
    /// Normalization statistics shared by every seed of a family
    fn load_stats(&self, property: Property, family: Family) -> Result<NormalizationStats, StoreError>;

    /// Weights of a single ensemble member
    fn load_weights(&self, property: Property, member: MemberKey) -> Result<WeightSet, StoreError>;

    /// Assemble the complete 10-member bundle for a property
    fn load_bundle(&self, property: Property) -> Result<WeightBundle, StoreError> {
        let load_family = |family: Family| -> Result<FamilyBundle, StoreError> {
            let stats = self.load_stats(property, family)?;
            let members = Seed::all()
                .into_iter()
                .map(|seed| {
                    let key = MemberKey::new(family, seed);
                    let weights = self.load_weights(property, key)?;
                    debug!(
                        "Loaded {} member {} (hidden {}x{})",
                        property,
                        key,
                        weights.hidden1_width(),
                        weights.hidden2_width()
                    );
                    Ok(weights)
                })
                .collect::<Result<Vec<_>, StoreError>>()?;
            FamilyBundle::new(family, stats, members)
        };

        let bundle = WeightBundle::new(property, load_family(Family::F)?, load_family(Family::G)?)?;
        info!("Loaded {} weight bundle ({} members)", property, ENSEMBLE_SIZE);
        Ok(bundle)
    }
}
