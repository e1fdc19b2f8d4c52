//! Rank root-cause items by blending a surprise score with explanatory
//! power.
//!
//! - surprise: symmetric log-ratio divergence between the candidate's share
//!   of the expected value and its share of the actual value
//! - explanatory power: the candidate's deviation as a fraction of the
//!   anomaly's deviation

use rootcause_core::{
    AnomalyDirection, LocalizerConfig, Point, RootCause, RootCauseItem, ScoreWarning,
    ScoreWarningKind,
};
use tracing::warn;

use super::index::PointIndex;

/// Raw per-item scores before normalization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawScore {
    pub surprise: f64,
    pub explanatory_power: f64,
}

/// `x * log2(2x / (x + y))`, taken as 0 when `x` is 0.
fn divergence_term(x: f64, y: f64) -> f64 {
    if x == 0.0 {
        0.0
    } else {
        x * (2.0 * x / (x + y)).log2()
    }
}

pub fn surprise(candidate: &Point, anomaly: &Point) -> f64 {
    let p = candidate.expected_value() / anomaly.expected_value();
    let q = candidate.value() / anomaly.value();
    0.5 * (divergence_term(p, q) + divergence_term(q, p))
}

pub fn explanatory_power(candidate: &Point, anomaly: &Point) -> f64 {
    candidate.delta() / anomaly.delta()
}

pub fn raw_score(candidate: &Point, anomaly: &Point) -> RawScore {
    RawScore {
        surprise: surprise(candidate, anomaly),
        explanatory_power: explanatory_power(candidate, anomaly),
    }
}

/// Score and orient every item against `anomaly`.
///
/// With several items, surprise and |explanatory power| are normalized by
/// their sums before blending; a single item is blended from raw values.
/// Items without a point at the timestamp keep score 0 and direction
/// `Same`. Non-finite results are replaced by 0 and reported.
pub fn rank(
    items: Vec<RootCauseItem>,
    index: &PointIndex<'_>,
    anomaly: &Point,
    config: &LocalizerConfig,
) -> RootCause {
    let mut warnings = Vec::new();

    let raws: Vec<Option<(RawScore, &Point)>> = items
        .iter()
        .map(|item| match index.get(&item.dimension) {
            Some(point) => Some((raw_score(point, anomaly), point)),
            None => {
                warn!("No point for root cause [{}]; left unscored", item.dimension);
                warnings.push(ScoreWarning {
                    dimension: item.dimension.signature(),
                    kind: ScoreWarningKind::MissingPoint,
                });
                None
            }
        })
        .collect();

    let normalize = items.len() > 1;
    let sum_surprise: f64 = raws.iter().flatten().map(|(r, _)| r.surprise).sum();
    let sum_power: f64 = raws.iter().flatten().map(|(r, _)| r.explanatory_power.abs()).sum();

    let items = items
        .into_iter()
        .zip(raws)
        .map(|(mut item, raw)| {
            let Some((raw, point)) = raw else {
                return item;
            };
            let blended = if normalize {
                blend(
                    raw.surprise / sum_surprise,
                    raw.explanatory_power.abs() / sum_power,
                    config.beta,
                )
            } else {
                blend(raw.surprise, raw.explanatory_power, config.beta)
            };

            item.score = if blended.is_finite() {
                config.score_bounds.apply(blended)
            } else {
                warn!(
                    "Degenerate score for [{}]: surprise={}, explanatory_power={}; using 0",
                    item.dimension, raw.surprise, raw.explanatory_power
                );
                warnings.push(ScoreWarning {
                    dimension: item.dimension.signature(),
                    kind: ScoreWarningKind::NonFiniteScore,
                });
                0.0
            };
            item.direction = AnomalyDirection::of(point.value(), point.expected_value());
            item
        })
        .collect();

    RootCause { items, warnings }
}

fn blend(surprise: f64, explanatory_power: f64, beta: f64) -> f64 {
    beta * surprise + (1.0 - beta) * explanatory_power
}
