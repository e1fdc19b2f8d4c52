use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dimension::{Dimension, DimensionValue};
use crate::point::{MetricSlice, Point};

/// How rolled-up points were aggregated from their children.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggregateType {
    #[default]
    Unknown,
    Sum,
    Avg,
    Min,
    Max,
}

/// Everything needed to localize the root cause of one anomalous point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootCauseLocalizationInput {
    /// When the anomaly occurred. Only the slice at this timestamp is read.
    pub anomaly_timestamp: DateTime<Utc>,
    /// Dimension vector of the anomalous point. Keys whose value equals
    /// `aggregation_symbol` are the ones that can be decomposed.
    pub anomaly_dimension: Dimension,
    pub slices: Vec<MetricSlice>,
    /// Reserved value meaning "rolled up over this dimension".
    pub aggregation_symbol: DimensionValue,
    #[serde(default)]
    pub aggregation_type: AggregateType,
}

impl RootCauseLocalizationInput {
    pub fn new(
        anomaly_timestamp: DateTime<Utc>,
        anomaly_dimension: Dimension,
        slices: Vec<MetricSlice>,
        aggregation_symbol: impl Into<DimensionValue>,
    ) -> Self {
        Self {
            anomaly_timestamp,
            anomaly_dimension,
            slices,
            aggregation_symbol: aggregation_symbol.into(),
            aggregation_type: AggregateType::Unknown,
        }
    }

    /// Points of the slice at the anomaly timestamp, or an empty slice if
    /// there is none. When several slices share the timestamp the last wins.
    pub fn points_at_anomaly(&self) -> &[Point] {
        self.slices
            .iter()
            .rev()
            .find(|s| s.timestamp == self.anomaly_timestamp)
            .map(|s| s.points.as_slice())
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap()
    }

    fn slice(hour: u32, value: f64) -> MetricSlice {
        let dim: Dimension = [("country", "*")].into_iter().collect();
        MetricSlice::new(ts(hour), vec![Point::new(value, 1.0, false, dim)])
    }

    #[test]
    fn picks_slice_at_anomaly_timestamp() {
        let input = RootCauseLocalizationInput::new(
            ts(2),
            Dimension::new(),
            vec![slice(1, 10.0), slice(2, 20.0), slice(3, 30.0)],
            "*",
        );
        let points = input.points_at_anomaly();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].value(), 20.0);
    }

    #[test]
    fn missing_timestamp_yields_no_points() {
        let input = RootCauseLocalizationInput::new(ts(5), Dimension::new(), vec![slice(1, 1.0)], "*");
        assert!(input.points_at_anomaly().is_empty());
    }

    #[test]
    fn parses_json_input() {
        let json = r#"{
            "anomaly_timestamp": "2024-03-01T02:00:00Z",
            "anomaly_dimension": {"country": "*", "device": "*"},
            "slices": [],
            "aggregation_symbol": "*",
            "aggregation_type": "Sum"
        }"#;
        let input: RootCauseLocalizationInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.anomaly_timestamp, ts(2));
        assert_eq!(input.aggregation_type, AggregateType::Sum);
        assert_eq!(input.aggregation_symbol, DimensionValue::from("*"));
    }
}
