use serde::{Deserialize, Serialize};

use crate::dimension::Dimension;

/// Whether a root cause sits above or below its expected value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnomalyDirection {
    Up,
    Down,
    #[default]
    Same,
}

impl AnomalyDirection {
    pub fn of(value: f64, expected_value: f64) -> Self {
        if expected_value < value {
            AnomalyDirection::Up
        } else {
            AnomalyDirection::Down
        }
    }
}

/// One dimension combination blamed for the anomaly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootCauseItem {
    /// Full dimension vector of the cause.
    pub dimension: Dimension,
    /// Dimension keys decomposed to reach this cause. One entry per
    /// analyzed layer; empty when the anomaly itself is the cause.
    pub path: Vec<String>,
    /// Contribution score. Higher means more responsible.
    pub score: f64,
    pub direction: AnomalyDirection,
}

impl RootCauseItem {
    pub fn new(dimension: Dimension, path: Vec<String>) -> Self {
        Self {
            dimension,
            path,
            score: 0.0,
            direction: AnomalyDirection::Same,
        }
    }

    /// The anomaly is its own cause: nothing could be decomposed further.
    pub fn itself(dimension: Dimension) -> Self {
        Self::new(dimension, Vec::new())
    }
}

/// Why an item's score could not be computed normally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreWarningKind {
    /// Surprise, explanatory power or their blend was NaN or infinite;
    /// the score was replaced by 0.
    NonFiniteScore,
    /// No point exists at the timestamp for the item's dimension.
    MissingPoint,
}

/// A degenerate score detected while ranking causes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreWarning {
    pub dimension: String,
    pub kind: ScoreWarningKind,
}

/// Ranked explanation of an anomaly, one layer deep.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RootCause {
    pub items: Vec<RootCauseItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ScoreWarning>,
}

impl RootCause {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_from_value_and_expectation() {
        assert_eq!(AnomalyDirection::of(50.0, 10.0), AnomalyDirection::Up);
        assert_eq!(AnomalyDirection::of(5.0, 10.0), AnomalyDirection::Down);
        // Equal values are reported as Down, never Same.
        assert_eq!(AnomalyDirection::of(10.0, 10.0), AnomalyDirection::Down);
    }

    #[test]
    fn new_item_is_unscored() {
        let item = RootCauseItem::itself(Dimension::new());
        assert_eq!(item.score, 0.0);
        assert_eq!(item.direction, AnomalyDirection::Same);
        assert!(item.path.is_empty());
    }

    #[test]
    fn warnings_omitted_when_empty() {
        let json = serde_json::to_value(RootCause::empty()).unwrap();
        assert!(json.get("warnings").is_none());
        assert_eq!(json["items"], serde_json::json!([]));
    }
}
