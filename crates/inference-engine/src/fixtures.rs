//! Synthetic bundles for unit tests

use feature_encoder::{parse_observation_date, NormalizationStats, ProfileSample};
use ndarray::{arr1, Array1, Array2};
use weight_store::{Family, FamilyBundle, Property, WeightBundle, WeightSet};

pub fn check_sample() -> ProfileSample {
    ProfileSample {
        latitude: 35.0,
        longitude: 18.0,
        observed_at: parse_observation_date("2014-04-09").unwrap(),
        pressure: 500.0,
        temperature: 13.5,
        salinity: 38.6,
        oxygen: 160.0,
    }
}

pub fn mediterranean_stats(output_mean: f64, output_std: f64) -> NormalizationStats {
    NormalizationStats::new(
        [37.5, 15.0, 2012.0, 15.0, 38.5, 200.0, 0.8],
        [2.5, 10.0, 6.0, 2.0, 0.4, 30.0, 0.3],
        output_mean,
        output_std,
    )
}

/// Deterministic dense member whose output depends on every input
pub fn dense_member(seed: f64) -> WeightSet {
    let (h1, h2) = (6, 4);
    let iw = Array2::from_shape_fn((h1, 7), |(i, j)| ((i * 7 + j) as f64 + seed).sin() * 0.6);
    let b1 = Array1::from_shape_fn(h1, |i| (i as f64 * 0.3 + seed).cos() * 0.2);
    let lw1 = Array2::from_shape_fn((h2, h1), |(i, j)| ((i + 2 * j) as f64 - seed).sin() * 0.5);
    let b2 = Array1::from_shape_fn(h2, |i| (i as f64 + seed).sin() * 0.1);
    let lw2 = Array2::from_shape_fn((1, h2), |(_, j)| (j as f64 * 1.7 + seed).cos() * 0.4);
    WeightSet::new(iw, b1, lw1, b2, lw2, arr1(&[seed * 0.01])).unwrap()
}

/// Member that ignores its input and outputs `b3`
pub fn constant_member(b3: f64) -> WeightSet {
    WeightSet::new(
        Array2::zeros((2, 7)),
        Array1::zeros(2),
        Array2::zeros((2, 2)),
        Array1::zeros(2),
        Array2::zeros((1, 2)),
        arr1(&[b3]),
    )
    .unwrap()
}

pub fn bundle(property: Property, f: Vec<WeightSet>, g: Vec<WeightSet>, stats: NormalizationStats) -> WeightBundle {
    WeightBundle::new(
        property,
        FamilyBundle::new(Family::F, stats.clone(), f).unwrap(),
        FamilyBundle::new(Family::G, stats, g).unwrap(),
    )
    .unwrap()
}

pub fn dense_bundle(property: Property) -> WeightBundle {
    let f = (1..=5).map(|s| dense_member(s as f64)).collect();
    let g = (6..=10).map(|s| dense_member(s as f64)).collect();
    bundle(property, f, g, mediterranean_stats(2500.0, 60.0))
}
