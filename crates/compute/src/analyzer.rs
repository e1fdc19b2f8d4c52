use rootcause_core::{
    Dimension, DimensionValue, LocalizerConfig, Point, Result, RootCause, RootCauseItem,
    RootCauseLocalizationInput,
};
use tracing::{debug, info};

use crate::algorithms::cluster;
use crate::algorithms::dimensions::{classify_dimensions, DimensionInfo};
use crate::algorithms::index::PointIndex;
use crate::algorithms::score;
use crate::algorithms::selector::{self, Selection};

/// Single-layer root cause localization.
///
/// Each call decomposes the anomaly along one dimension. To drill deeper,
/// feed a returned item's dimension back in as the next anomaly dimension.
#[derive(Debug, Clone, Default)]
pub struct RootCauseAnalyzer {
    config: LocalizerConfig,
}

impl RootCauseAnalyzer {
    pub fn new(config: LocalizerConfig) -> Self {
        Self { config }
    }

    /// Localize the root cause of `input.anomaly_dimension`.
    ///
    /// Returns an empty result when nothing is aggregated, when there is no
    /// slice at the anomaly timestamp, or when the anomaly's own point is
    /// missing or not flagged anomalous. Fails only on malformed points.
    pub fn analyze(&self, input: &RootCauseLocalizationInput) -> Result<RootCause> {
        let start = std::time::Instant::now();

        let info = classify_dimensions(&input.anomaly_dimension, &input.aggregation_symbol);
        if !info.has_aggregated() {
            debug!("[{}] has no aggregated dimension; nothing to decompose", input.anomaly_dimension);
            return Ok(RootCause::empty());
        }

        let index = PointIndex::build(input, &info)?;
        let Some(root) = index.anomalies.root else {
            debug!("No anomalous point for [{}] at {}", input.anomaly_dimension, input.anomaly_timestamp);
            return Ok(RootCause::empty());
        };
        let Some(anomaly) = index.get(&input.anomaly_dimension) else {
            debug!("No point with exactly [{}] at {}", input.anomaly_dimension, input.anomaly_timestamp);
            return Ok(RootCause::empty());
        };

        let items = self.localize(&index, root, &input.anomaly_dimension, &info);
        let result = score::rank(items, &index, anomaly, &self.config);

        info!(
            "Localized [{}] to {} cause(s) in {:.1}ms",
            input.anomaly_dimension,
            result.items.len(),
            start.elapsed().as_secs_f64() * 1000.0
        );
        Ok(result)
    }

    /// Pick a dimension and the values along it that explain the anomaly.
    fn localize(
        &self,
        index: &PointIndex<'_>,
        root: &Point,
        anomaly: &Dimension,
        info: &DimensionInfo,
    ) -> Vec<RootCauseItem> {
        let selection = if index.anomalies.has_children() {
            selector::select_from_children(&index.all.children, &index.anomalies.children, &info.aggregated_keys)
        } else {
            selector::select_from_leaves(&index.all.leaves, &index.anomalies.leaves, &info.aggregated_keys)
        };

        let best = match selection {
            Selection::Best(best) => best,
            Selection::NoEligible => {
                debug!("No eligible dimension; [{}] is its own cause", anomaly);
                return vec![RootCauseItem::itself(anomaly.clone())];
            }
        };
        let key = best.key.as_str();

        let clustered: Option<Vec<DimensionValue>> = index.anomalies.children.get(key).and_then(|children| {
            let comparison = match index.all.children.get(key) {
                Some(siblings) if !siblings.is_empty() => siblings.as_slice(),
                _ => index.all.leaves.as_slice(),
            };
            cluster::top_anomalies(children, root, comparison, &self.config).map(|points| {
                points
                    .iter()
                    .filter_map(|p| p.dimension().get(key).cloned())
                    .collect()
            })
        });

        let values = clustered.unwrap_or_else(|| best.anomaly_distribution.keys().cloned().collect());
        if values.is_empty() {
            return vec![RootCauseItem::itself(anomaly.clone())];
        }

        values
            .into_iter()
            .map(|value| RootCauseItem::new(anomaly.with_value(key, value), vec![key.to_owned()]))
            .collect()
    }
}

/// Analyze with the default configuration.
pub fn analyze(input: &RootCauseLocalizationInput) -> Result<RootCause> {
    RootCauseAnalyzer::default().analyze(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::test_support::{dim, point, timestamp};
    use rootcause_core::{AnomalyDirection, MetricSlice, RcaError};

    fn input(anomaly: &[(&str, &str)], points: Vec<Point>) -> RootCauseLocalizationInput {
        RootCauseLocalizationInput::new(
            timestamp(),
            dim(anomaly),
            vec![MetricSlice::new(timestamp(), points)],
            "*",
        )
    }

    #[test]
    fn anomaly_point_must_be_flagged() {
        let input = input(
            &[("country", "*")],
            vec![
                point(80.0, 40.0, false, &[("country", "*")]),
                point(60.0, 20.0, true, &[("country", "US")]),
            ],
        );
        assert!(analyze(&input).unwrap().is_empty());
    }

    #[test]
    fn no_anomalous_children_blames_the_anomaly_itself() {
        let input = input(
            &[("country", "*")],
            vec![
                point(80.0, 40.0, true, &[("country", "*")]),
                point(60.0, 20.0, false, &[("country", "US")]),
                point(20.0, 20.0, false, &[("country", "UK")]),
            ],
        );
        let result = analyze(&input).unwrap();
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].dimension, dim(&[("country", "*")]));
        assert!(result.items[0].path.is_empty());
        // Scored against itself: no surprise, full explanatory power.
        assert_eq!(result.items[0].score, 1.0);
        assert_eq!(result.items[0].direction, AnomalyDirection::Up);
    }

    #[test]
    fn detail_filter_restricts_the_search() {
        let input = input(
            &[("country", "US"), ("device", "*")],
            vec![
                point(80.0, 40.0, true, &[("country", "US"), ("device", "*")]),
                point(50.0, 10.0, true, &[("country", "US"), ("device", "mobile")]),
                point(30.0, 30.0, false, &[("country", "US"), ("device", "web")]),
                point(90.0, 10.0, true, &[("country", "UK"), ("device", "tv")]),
            ],
        );
        let result = analyze(&input).unwrap();
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].dimension, dim(&[("country", "US"), ("device", "mobile")]));
        assert_eq!(result.items[0].path, vec!["device"]);
        assert_eq!(result.items[0].direction, AnomalyDirection::Up);
    }

    #[test]
    fn malformed_point_is_an_error() {
        let input = input(
            &[("country", "*"), ("device", "*")],
            vec![point(80.0, 40.0, true, &[("country", "*")])],
        );
        assert!(matches!(analyze(&input), Err(RcaError::MalformedInput { .. })));
    }
}
