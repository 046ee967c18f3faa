//! Bundle Keys

use crate::StoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Seeds trained per family
pub const SEEDS_PER_FAMILY: usize = 5;

/// Members in every ensemble (2 families x 5 seeds)
pub const ENSEMBLE_SIZE: usize = 2 * SEEDS_PER_FAMILY;

/// Estimated seawater property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Property {
    /// Total alkalinity
    Alkalinity,
    /// Nitrate
    Nitrate,
    /// Phosphate
    Phosphate,
    /// pH on the total scale at in-situ conditions
    Ph,
}

impl Property {
    /// Every supported property
    pub const ALL: [Property; 4] = [
        Property::Alkalinity,
        Property::Nitrate,
        Property::Phosphate,
        Property::Ph,
    ];

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Property::Alkalinity => "alkalinity",
            Property::Nitrate => "nitrate",
            Property::Phosphate => "phosphate",
            Property::Ph => "ph",
        }
    }

    /// Unit of the estimate
    pub fn unit(&self) -> &'static str {
        match self {
            Property::Alkalinity | Property::Nitrate | Property::Phosphate => "umol/kg",
            Property::Ph => "total scale",
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Property {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "alkalinity" | "at" => Ok(Property::Alkalinity),
            "nitrate" | "no3" => Ok(Property::Nitrate),
            "phosphate" | "po4" => Ok(Property::Phosphate),
            "ph" | "pht" => Ok(Property::Ph),
            other => Err(format!("unknown property: {}", other)),
        }
    }
}

/// Network family, each with its own normalization statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Family {
    F,
    G,
}

impl Family {
    pub const ALL: [Family; 2] = [Family::F, Family::G];

    pub fn as_str(&self) -> &'static str {
        match self {
            Family::F => "F",
            Family::G => "G",
        }
    }

    /// Position of the family in the ensemble
    pub fn index(&self) -> usize {
        match self {
            Family::F => 0,
            Family::G => 1,
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Training seed within a family, 1 through 5
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Seed(u8);

impl Seed {
    pub fn new(seed: u8) -> Result<Self, StoreError> {
        if (1..=SEEDS_PER_FAMILY as u8).contains(&seed) {
            Ok(Self(seed))
        } else {
            Err(StoreError::InvalidSeed(seed))
        }
    }

    pub fn get(&self) -> u8 {
        self.0
    }

    /// Seeds in ascending order
    pub fn all() -> [Seed; SEEDS_PER_FAMILY] {
        [Seed(1), Seed(2), Seed(3), Seed(4), Seed(5)]
    }
}

impl TryFrom<u8> for Seed {
    type Error = StoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Seed::new(value)
    }
}

impl From<Seed> for u8 {
    fn from(seed: Seed) -> u8 {
        seed.0
    }
}

/// Identifies one ensemble member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MemberKey {
    pub family: Family,
    pub seed: Seed,
}

impl MemberKey {
    pub fn new(family: Family, seed: Seed) -> Self {
        Self { family, seed }
    }

    /// All members in ensemble order: F1..F5 then G1..G5
    pub fn all() -> [MemberKey; ENSEMBLE_SIZE] {
        let mut keys = [MemberKey::new(Family::F, Seed(1)); ENSEMBLE_SIZE];
        for family in Family::ALL {
            for seed in Seed::all() {
                keys[MemberKey::new(family, seed).index()] = MemberKey::new(family, seed);
            }
        }
        keys
    }

    /// Position of the member in the ensemble
    pub fn index(&self) -> usize {
        self.family.index() * SEEDS_PER_FAMILY + (self.seed.0 as usize - 1)
    }
}

impl fmt::Display for MemberKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.family, self.seed.0)
    }
}
