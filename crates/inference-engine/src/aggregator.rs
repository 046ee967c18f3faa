//! Ensemble Aggregation
//!
//! One-sigma trimmed mean: members strictly outside `mean ± std` of the
//! ensemble are dropped and the rest are averaged. A single pass, no
//! iteration.

use serde::{Deserialize, Serialize};

/// Divisor used for the ensemble standard deviation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StdDevKind {
    /// Divide by `n`
    #[default]
    Population,
    /// Divide by `n - 1`
    Sample,
}

/// Closed acceptance interval around the ensemble mean
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AcceptanceBand {
    pub lower: f64,
    pub upper: f64,
}

impl AcceptanceBand {
    /// Strictly outside the band. NaN bounds reject nothing.
    pub fn rejects(&self, value: f64) -> bool {
        value < self.lower || value > self.upper
    }

    pub fn contains(&self, value: f64) -> bool {
        !self.rejects(value)
    }
}

/// Summary of one aggregation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aggregate {
    /// Mean of retained members, NaN if none survive
    pub estimate: f64,
    /// Mean over all members
    pub mean: f64,
    /// Standard deviation over all members
    pub std_dev: f64,
    /// Number of members averaged into the estimate
    pub retained: usize,
}

/// Combines member outputs into one estimate
#[derive(Debug, Clone, Copy, Default)]
pub struct EnsembleAggregator {
    kind: StdDevKind,
}

impl EnsembleAggregator {
    pub fn new(kind: StdDevKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> StdDevKind {
        self.kind
    }

    /// Final estimate for one sample
    pub fn aggregate(&self, outputs: &[f64]) -> f64 {
        self.summarize(outputs).estimate
    }

    /// Acceptance band of a set of outputs
    pub fn band(&self, outputs: &[f64]) -> AcceptanceBand {
        let sorted = sorted(outputs);
        let (mean, std_dev) = self.moments(&sorted);
        AcceptanceBand {
            lower: mean - std_dev,
            upper: mean + std_dev,
        }
    }

    /// Trim and average, keeping the intermediate statistics
    ///
    /// NaN members poison the band (so nothing is rejected) and are left
    /// out of the final average. An empty or all-NaN input yields NaN.
    pub fn summarize(&self, outputs: &[f64]) -> Aggregate {
        // Ascending order makes the result independent of member order
        let sorted = sorted(outputs);
        let (mean, std_dev) = self.moments(&sorted);
        let band = AcceptanceBand {
            lower: mean - std_dev,
            upper: mean + std_dev,
        };

        let (sum, retained) = sorted
            .iter()
            .filter(|v| !v.is_nan() && band.contains(**v))
            .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));

        let estimate = if retained == 0 {
            f64::NAN
        } else {
            sum / retained as f64
        };

        Aggregate {
            estimate,
            mean,
            std_dev,
            retained,
        }
    }

    fn moments(&self, sorted: &[f64]) -> (f64, f64) {
        let n = sorted.len() as f64;
        let mean = sorted.iter().sum::<f64>() / n;
        let m2: f64 = sorted.iter().map(|v| (v - mean) * (v - mean)).sum();
        let divisor = match self.kind {
            StdDevKind::Population => n,
            StdDevKind::Sample => n - 1.0,
        };
        (mean, (m2 / divisor).sqrt())
    }
}

fn sorted(outputs: &[f64]) -> Vec<f64> {
    let mut sorted = outputs.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ON_BOUNDARY: [f64; 10] = [0.0, 0.0, 0.0, 0.0, 0.0, 2.0, 2.0, 2.0, 2.0, 2.0];

    #[test]
    fn test_boundary_members_retained() {
        let agg = EnsembleAggregator::default();
        let summary = agg.summarize(&ON_BOUNDARY);
        assert_eq!(summary.mean, 1.0);
        assert_eq!(summary.std_dev, 1.0);
        assert_eq!(summary.retained, 10);
        assert_eq!(summary.estimate, 1.0);
    }

    #[test]
    fn test_one_step_beyond_band_rejected() {
        let band = EnsembleAggregator::default().band(&ON_BOUNDARY);
        assert_eq!(band, AcceptanceBand { lower: 0.0, upper: 2.0 });
        assert!(band.contains(2.0));
        assert!(band.contains(0.0));
        assert!(band.rejects(f64::from_bits(2.0f64.to_bits() + 1)));
        assert!(band.rejects(-f64::from_bits(1)));

        let mut nudged = ON_BOUNDARY;
        nudged[9] = f64::from_bits(2.0f64.to_bits() + 1);
        let summary = EnsembleAggregator::default().summarize(&nudged);
        assert_eq!(summary.retained, 9);
        assert_eq!(summary.estimate, 8.0 / 9.0);
    }

    #[test]
    fn test_far_member_trimmed() {
        let mut outputs = [0.0; 10];
        outputs[9] = 100.0;
        let summary = EnsembleAggregator::default().summarize(&outputs);
        // mean 10, population std 30
        assert_eq!(summary.retained, 9);
        assert_eq!(summary.estimate, 0.0);
    }

    #[test]
    fn test_population_and_sample_diverge() {
        let outputs = [0.0, 0.0, 0.0, 0.0, 3.0, 3.0, 3.0, 3.0, 3.0, 7.0];

        let population = EnsembleAggregator::new(StdDevKind::Population).summarize(&outputs);
        assert_eq!(population.retained, 5);
        assert_eq!(population.estimate, 3.0);

        let sample = EnsembleAggregator::new(StdDevKind::Sample).summarize(&outputs);
        assert_eq!(sample.retained, 9);
        assert!((sample.estimate - 15.0 / 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_identical_members() {
        let est = EnsembleAggregator::default().aggregate(&[2599.25; 10]);
        assert_eq!(est, 2599.25);
    }

    #[test]
    fn test_nan_member_disables_trimming() {
        let mut outputs = [1.0; 10];
        outputs[0] = f64::NAN;
        outputs[9] = 10.0;
        let summary = EnsembleAggregator::default().summarize(&outputs);
        assert!(summary.mean.is_nan());
        assert_eq!(summary.retained, 9);
        assert!((summary.estimate - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_retained_set_is_nan() {
        let agg = EnsembleAggregator::default();
        assert!(agg.aggregate(&[f64::NAN; 10]).is_nan());
        assert!(agg.aggregate(&[]).is_nan());
    }

    proptest! {
        #[test]
        fn prop_order_independent(
            (original, shuffled) in prop::collection::vec(-5000.0f64..5000.0, 10)
                .prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))
        ) {
            let agg = EnsembleAggregator::default();
            prop_assert_eq!(
                agg.aggregate(&original).to_bits(),
                agg.aggregate(&shuffled).to_bits()
            );
        }

        #[test]
        fn prop_finite_outputs_keep_a_member(outputs in prop::collection::vec(-1e6f64..1e6, 10)) {
            for kind in [StdDevKind::Population, StdDevKind::Sample] {
                let summary = EnsembleAggregator::new(kind).summarize(&outputs);
                prop_assert!(summary.retained >= 1);
                prop_assert!(summary.estimate.is_finite());
            }
        }
    }
}
