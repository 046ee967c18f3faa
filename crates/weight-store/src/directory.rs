//! Directory-Backed Weight Store
//!
//! Reads the text tables distributed with CANYON-MED:
//! `moy_{token}_{family}.txt`, `std_{token}_{family}.txt` and
//! `poids_{token}_{part}_{family}_{n}.txt` for parts
//! `IW`, `b1`, `LW1`, `b2`, `LW2` and `b3`.

use crate::keys::{Family, MemberKey, Property, Seed};
use crate::table::NumericTable;
use crate::weights::WeightSet;
use crate::{StoreError, WeightStore};
use feature_encoder::{NormalizationStats, FEATURE_DIMENSION};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// On-disk conventions of one property's weight files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileLayout {
    /// Property token in file names, e.g. `AT` or `nit`
    pub token: String,
    /// File number that holds seed 1
    pub first_file_index: u8,
    /// Column of the statistics row holding the output channel
    pub output_column: usize,
}

impl FileLayout {
    /// Layout shipped with the published weights
    pub fn default_for(property: Property) -> Self {
        let (token, first_file_index, output_column) = match property {
            Property::Alkalinity => ("AT", 0, FEATURE_DIMENSION + 1),
            Property::Phosphate => ("phos", 0, FEATURE_DIMENSION + 1),
            Property::Nitrate => ("nit", 1, FEATURE_DIMENSION),
            Property::Ph => ("ph", 1, FEATURE_DIMENSION),
        };
        Self {
            token: token.to_string(),
            first_file_index,
            output_column,
        }
    }

    fn file_number(&self, seed: Seed) -> u32 {
        self.first_file_index as u32 + seed.get() as u32 - 1
    }
}

/// Loads weight bundles from a CANYON-MED weights directory
#[derive(Debug, Clone)]
pub struct DirectoryWeightStore {
    root: PathBuf,
    layouts: HashMap<Property, FileLayout>,
}

impl DirectoryWeightStore {
    /// Create a store rooted at `root` with the published layouts
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        info!("Using weight directory {}", root.display());
        let layouts = Property::ALL
            .into_iter()
            .map(|p| (p, FileLayout::default_for(p)))
            .collect();
        Self { root, layouts }
    }

    /// Override the layout of one property
    pub fn with_layout(mut self, property: Property, layout: FileLayout) -> Self {
        self.layouts.insert(property, layout);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn layout(&self, property: Property) -> FileLayout {
        self.layouts
            .get(&property)
            .cloned()
            .unwrap_or_else(|| FileLayout::default_for(property))
    }

    fn stats_path(&self, kind: &str, property: Property, family: Family) -> PathBuf {
        let layout = self.layout(property);
        self.root.join(format!("{}_{}_{}.txt", kind, layout.token, family))
    }

    fn weight_path(&self, part: &str, property: Property, member: MemberKey) -> PathBuf {
        let layout = self.layout(property);
        self.root.join(format!(
            "poids_{}_{}_{}_{}.txt",
            layout.token,
            part,
            member.family,
            layout.file_number(member.seed)
        ))
    }

    /// First statistics row split into input channels and output channel
    fn read_moments(
        &self,
        path: &Path,
        output_column: usize,
    ) -> Result<([f64; FEATURE_DIMENSION], f64), StoreError> {
        let table = NumericTable::read(path)?;
        let row = table.row(0);
        let needed = output_column.max(FEATURE_DIMENSION - 1);
        if row.len() <= needed {
            return Err(StoreError::MissingColumn {
                path: table.source().to_path_buf(),
                column: needed,
                available: row.len(),
            });
        }
        let mut inputs = [0.0; FEATURE_DIMENSION];
        inputs.copy_from_slice(&row[..FEATURE_DIMENSION]);
        Ok((inputs, row[output_column]))
    }
}

impl WeightStore for DirectoryWeightStore {
    fn load_stats(&self, property: Property, family: Family) -> Result<NormalizationStats, StoreError> {
        let output_column = self.layout(property).output_column;
        let mean_path = self.stats_path("moy", property, family);
        let std_path = self.stats_path("std", property, family);
        debug!("Reading statistics {} and {}", mean_path.display(), std_path.display());

        let (mean, output_mean) = self.read_moments(&mean_path, output_column)?;
        let (std, output_std) = self.read_moments(&std_path, output_column)?;
        Ok(NormalizationStats::new(mean, std, output_mean, output_std))
    }

    fn load_weights(&self, property: Property, member: MemberKey) -> Result<WeightSet, StoreError> {
        let read = |part: &str| NumericTable::read(&self.weight_path(part, property, member));
        WeightSet::new(
            read("IW")?.into_matrix()?,
            read("b1")?.into_vector()?,
            read("LW1")?.into_matrix()?,
            read("b2")?.into_vector()?,
            read("LW2")?.into_matrix()?,
            read("b3")?.into_vector()?,
        )
        .map_err(|e| match e {
            StoreError::ShapeMismatch {
                what,
                expected,
                actual,
            } => StoreError::ShapeMismatch {
                what: format!("{} member {}: {}", property, member, what),
                expected,
                actual,
            },
            other => other,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const H1: usize = 3;
    const H2: usize = 2;

    fn row(values: &[f64], sep: &str) -> String {
        values.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(sep)
    }

    fn write_member(dir: &Path, token: &str, family: Family, n: u32, bias: f64) {
        let name = |part: &str| dir.join(format!("poids_{}_{}_{}_{}.txt", token, part, family, n));
        let iw = (0..H1).map(|_| row(&[0.0; 7], "   ")).collect::<Vec<_>>().join("\n");
        fs::write(name("IW"), iw).unwrap();
        fs::write(name("b1"), "0.1\n0.2\n0.3\n").unwrap();
        fs::write(name("LW1"), "0 0 0\n0 0 0\n").unwrap();
        fs::write(name("b2"), "0\n0\n").unwrap();
        fs::write(name("LW2"), "0.5 0.5\n").unwrap();
        fs::write(name("b3"), format!("{}\n", bias)).unwrap();
    }

    fn write_stats(dir: &Path, token: &str, family: Family, columns: usize) {
        let mean: Vec<f64> = (0..columns).map(|i| i as f64).collect();
        let std: Vec<f64> = (0..columns).map(|i| 1.0 + i as f64).collect();
        fs::write(dir.join(format!("moy_{}_{}.txt", token, family)), row(&mean, "   ")).unwrap();
        fs::write(dir.join(format!("std_{}_{}.txt", token, family)), row(&std, "   ")).unwrap();
    }

    fn write_property(dir: &Path, token: &str, first: u32, columns: usize) {
        for family in Family::ALL {
            write_stats(dir, token, family, columns);
            for seed in 1..=5u32 {
                write_member(dir, token, family, first + seed - 1, seed as f64);
            }
        }
    }

    #[test]
    fn test_load_one_based_bundle() {
        let dir = tempfile::tempdir().unwrap();
        write_property(dir.path(), "nit", 1, 8);

        let store = DirectoryWeightStore::new(dir.path());
        let bundle = store.load_bundle(Property::Nitrate).unwrap();
        let stats = bundle.family(Family::G).stats();
        assert_eq!(stats.mean[6], 6.0);
        assert_eq!(stats.output_mean, 7.0);
        assert_eq!(stats.output_std, 8.0);

        let g5 = MemberKey::new(Family::G, Seed::new(5).unwrap());
        let w = bundle.weights(g5);
        assert_eq!(w.output_bias(), 5.0);
        assert_eq!(w.hidden1_width(), H1);
        assert_eq!(w.hidden2_width(), H2);
    }

    #[test]
    fn test_load_zero_based_bundle_uses_extra_column() {
        let dir = tempfile::tempdir().unwrap();
        write_property(dir.path(), "AT", 0, 9);

        let store = DirectoryWeightStore::new(dir.path());
        let bundle = store.load_bundle(Property::Alkalinity).unwrap();
        let stats = bundle.family(Family::F).stats();
        assert_eq!(stats.output_mean, 8.0);
        let f1 = MemberKey::new(Family::F, Seed::new(1).unwrap());
        assert_eq!(bundle.weights(f1).output_bias(), 1.0);
    }

    #[test]
    fn test_missing_output_column() {
        let dir = tempfile::tempdir().unwrap();
        write_property(dir.path(), "AT", 0, 8);

        let store = DirectoryWeightStore::new(dir.path());
        match store.load_stats(Property::Alkalinity, Family::F) {
            Err(StoreError::MissingColumn { path, column, .. }) => {
                assert_eq!(column, 8);
                assert_eq!(path, dir.path().join("moy_AT_F.txt"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryWeightStore::new(dir.path());
        assert!(matches!(
            store.load_bundle(Property::Ph),
            Err(StoreError::Io { .. })
        ));
    }

    #[test]
    fn test_shape_mismatch_names_member() {
        let dir = tempfile::tempdir().unwrap();
        write_property(dir.path(), "ph", 1, 8);
        fs::write(dir.path().join("poids_ph_LW2_F_2.txt"), "0.5 0.5 0.5\n").unwrap();

        let store = DirectoryWeightStore::new(dir.path());
        let err = store.load_bundle(Property::Ph).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("ph member F2"), "{}", msg);
        assert!(msg.contains("LW2"), "{}", msg);
    }

    #[test]
    fn test_layout_override() {
        let dir = tempfile::tempdir().unwrap();
        write_property(dir.path(), "phosphate", 1, 8);

        let layout = FileLayout {
            token: "phosphate".to_string(),
            first_file_index: 1,
            output_column: 7,
        };
        let store = DirectoryWeightStore::new(dir.path()).with_layout(Property::Phosphate, layout);
        assert!(store.load_bundle(Property::Phosphate).is_ok());
    }
}
