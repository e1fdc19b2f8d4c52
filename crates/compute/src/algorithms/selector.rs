//! Pick the aggregated dimension that best separates anomalous points from
//! normal ones.
//!
//! Two variants share one selection rule:
//! - leaf level: information gain and C4.5-style gain ratio over the value
//!   distribution of fully detailed points
//! - children level: binary entropy of the child-bucket sizes, used directly
//!   as an impurity measure (lower gain ratio preferred)

use std::collections::BTreeMap;

use rayon::prelude::*;
use rootcause_core::Point;
use tracing::debug;

use super::entropy::{self, Distribution};

/// Candidate-scoring record for one aggregated dimension key.
#[derive(Debug, Clone, PartialEq)]
pub struct BestDimension {
    pub key: String,
    pub point_distribution: Distribution,
    pub anomaly_distribution: Distribution,
}

impl BestDimension {
    /// All anomalous points share a single value of this key.
    pub fn is_single_valued(&self) -> bool {
        self.anomaly_distribution.len() == 1
    }
}

/// Outcome of dimension selection.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Best(BestDimension),
    NoEligible,
}

/// Which tree level the candidates were scored on. Decides the gain-ratio
/// preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Leaves,
    Children,
}

impl Level {
    /// Whether `challenger` beats `incumbent`. Ties go to the challenger.
    fn prefers(self, challenger: f64, incumbent: f64) -> bool {
        match self {
            Level::Leaves => challenger >= incumbent,
            Level::Children => challenger <= incumbent,
        }
    }
}

#[derive(Debug, Clone)]
struct Candidate {
    dimension: BestDimension,
    gain: f64,
    gain_ratio: f64,
}

/// Select using fully detailed points.
pub fn select_from_leaves(
    points: &[&Point],
    anomalies: &[&Point],
    aggregated_keys: &[String],
) -> Selection {
    let total_entropy = entropy::entropy(points.len(), anomalies.len());

    let candidates: Vec<Candidate> = aggregated_keys
        .par_iter()
        .map(|key| {
            let point_distribution = entropy::distribution(points, key);
            let anomaly_distribution = entropy::distribution(anomalies, key);

            let gain = total_entropy
                - entropy::dimension_entropy(&point_distribution, &anomaly_distribution);
            let gain_ratio = entropy::gain_ratio(gain, entropy::intrinsic_value(&point_distribution));

            Candidate {
                dimension: BestDimension {
                    key: key.clone(),
                    point_distribution,
                    anomaly_distribution,
                },
                gain,
                gain_ratio,
            }
        })
        .collect();

    choose(candidates, Level::Leaves)
}

/// Select using the one-short-of-root child buckets.
pub fn select_from_children(
    points: &BTreeMap<String, Vec<&Point>>,
    anomalies: &BTreeMap<String, Vec<&Point>>,
    aggregated_keys: &[String],
) -> Selection {
    let candidates: Vec<Candidate> = aggregated_keys
        .par_iter()
        .map(|key| {
            let point_distribution = points
                .get(key)
                .map(|children| entropy::distribution(children, key))
                .unwrap_or_default();
            let anomaly_distribution = anomalies
                .get(key)
                .map(|children| entropy::distribution(children, key))
                .unwrap_or_default();

            let gain = entropy::entropy(point_distribution.len(), anomaly_distribution.len());
            let gain_ratio = entropy::gain_ratio(gain, entropy::intrinsic_value(&point_distribution));

            Candidate {
                dimension: BestDimension {
                    key: key.clone(),
                    point_distribution,
                    anomaly_distribution,
                },
                gain,
                gain_ratio,
            }
        })
        .collect();

    choose(candidates, Level::Children)
}

/// Apply the selection rule to candidates given in sorted key order.
///
/// Eligible: single-valued anomaly distribution, or gain at most the mean.
/// Single-valued candidates always beat the rest; within a category the
/// better gain ratio wins.
fn choose(candidates: Vec<Candidate>, level: Level) -> Selection {
    if candidates.is_empty() {
        return Selection::NoEligible;
    }
    let mean_gain = candidates.iter().map(|c| c.gain).sum::<f64>() / candidates.len() as f64;

    let mut best: Option<Candidate> = None;
    for candidate in candidates {
        let single = candidate.dimension.is_single_valued();
        if !single && candidate.gain > mean_gain {
            continue;
        }

        let replace = match &best {
            None => true,
            Some(incumbent) => match (single, incumbent.dimension.is_single_valued()) {
                (true, false) => true,
                (false, true) => false,
                _ => level.prefers(candidate.gain_ratio, incumbent.gain_ratio),
            },
        };
        if replace {
            best = Some(candidate);
        }
    }

    match best {
        Some(c) => {
            debug!(
                "Selected dimension '{}' ({:?}): gain={:.4}, gain_ratio={:.4}, mean_gain={:.4}",
                c.dimension.key, level, c.gain, c.gain_ratio, mean_gain
            );
            Selection::Best(c.dimension)
        }
        None => Selection::NoEligible,
    }
}
