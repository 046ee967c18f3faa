//! Shape-Checked Weight Sets

use crate::keys::{Family, MemberKey, Property, Seed, SEEDS_PER_FAMILY};
use crate::StoreError;
use feature_encoder::{NormalizationStats, FEATURE_DIMENSION};
use ndarray::{Array1, Array2};

fn mismatch(what: &str, expected: impl ToString, actual: impl ToString) -> StoreError {
    StoreError::ShapeMismatch {
        what: what.to_string(),
        expected: expected.to_string(),
        actual: actual.to_string(),
    }
}

/// Weights of one two-hidden-layer network
#[derive(Debug, Clone, PartialEq)]
pub struct WeightSet {
    iw: Array2<f64>,
    b1: Array1<f64>,
    lw1: Array2<f64>,
    b2: Array1<f64>,
    lw2: Array2<f64>,
    b3: Array1<f64>,
}

impl WeightSet {
    /// Build a weight set, rejecting inconsistent shapes
    ///
    /// `iw` is `h1 x 7`, `lw1` is `h2 x h1` and `lw2` is `1 x h2`.
    pub fn new(
        iw: Array2<f64>,
        b1: Array1<f64>,
        lw1: Array2<f64>,
        b2: Array1<f64>,
        lw2: Array2<f64>,
        b3: Array1<f64>,
    ) -> Result<Self, StoreError> {
        let h1 = iw.nrows();
        let h2 = lw1.nrows();

        if iw.ncols() != FEATURE_DIMENSION {
            return Err(mismatch("IW columns", FEATURE_DIMENSION, iw.ncols()));
        }
        if b1.len() != h1 {
            return Err(mismatch("b1 length", h1, b1.len()));
        }
        if lw1.ncols() != h1 {
            return Err(mismatch("LW1 columns", h1, lw1.ncols()));
        }
        if b2.len() != h2 {
            return Err(mismatch("b2 length", h2, b2.len()));
        }
        if lw2.dim() != (1, h2) {
            return Err(mismatch(
                "LW2 shape",
                format!("1x{}", h2),
                format!("{}x{}", lw2.nrows(), lw2.ncols()),
            ));
        }
        if b3.len() != 1 {
            return Err(mismatch("b3 length", 1, b3.len()));
        }

        Ok(Self {
            iw,
            b1,
            lw1,
            b2,
            lw2,
            b3,
        })
    }

    pub fn input_weights(&self) -> &Array2<f64> {
        &self.iw
    }

    pub fn input_bias(&self) -> &Array1<f64> {
        &self.b1
    }

    pub fn layer1_weights(&self) -> &Array2<f64> {
        &self.lw1
    }

    pub fn layer1_bias(&self) -> &Array1<f64> {
        &self.b2
    }

    pub fn output_weights(&self) -> &Array2<f64> {
        &self.lw2
    }

    pub fn output_bias(&self) -> f64 {
        self.b3[0]
    }

    pub fn hidden1_width(&self) -> usize {
        self.iw.nrows()
    }

    pub fn hidden2_width(&self) -> usize {
        self.lw1.nrows()
    }
}

/// The five seeds of one family with their shared statistics
#[derive(Debug, Clone, PartialEq)]
pub struct FamilyBundle {
    family: Family,
    stats: NormalizationStats,
    members: Vec<WeightSet>,
}

impl FamilyBundle {
    /// `members` must hold one weight set per seed, in seed order
    pub fn new(
        family: Family,
        stats: NormalizationStats,
        members: Vec<WeightSet>,
    ) -> Result<Self, StoreError> {
        if members.len() != SEEDS_PER_FAMILY {
            return Err(StoreError::IncompleteBundle(format!(
                "family {} has {} members, expected {}",
                family,
                members.len(),
                SEEDS_PER_FAMILY
            )));
        }
        Ok(Self {
            family,
            stats,
            members,
        })
    }

    pub fn family(&self) -> Family {
        self.family
    }

    pub fn stats(&self) -> &NormalizationStats {
        &self.stats
    }

    /// Weight sets paired with their seeds
    pub fn members(&self) -> impl Iterator<Item = (Seed, &WeightSet)> {
        Seed::all().into_iter().zip(self.members.iter())
    }
}

/// Complete ensemble for one property
#[derive(Debug, Clone, PartialEq)]
pub struct WeightBundle {
    property: Property,
    families: [FamilyBundle; 2],
}

impl WeightBundle {
    pub fn new(property: Property, f: FamilyBundle, g: FamilyBundle) -> Result<Self, StoreError> {
        if f.family != Family::F || g.family != Family::G {
            return Err(StoreError::IncompleteBundle(format!(
                "{}: families supplied as {}/{}, expected F/G",
                property, f.family, g.family
            )));
        }
        Ok(Self {
            property,
            families: [f, g],
        })
    }

    pub fn property(&self) -> Property {
        self.property
    }

    pub fn family(&self, family: Family) -> &FamilyBundle {
        &self.families[family.index()]
    }

    pub fn families(&self) -> &[FamilyBundle; 2] {
        &self.families
    }

    /// Weights of one member
    pub fn weights(&self, member: MemberKey) -> &WeightSet {
        &self.family(member.family).members[member.seed.get() as usize - 1]
    }
}
