use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dimension::Dimension;

/// One observation of the metric for a single dimension combination.
///
/// `delta` is derived at construction and the point is immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "PointRecord")]
pub struct Point {
    value: f64,
    expected_value: f64,
    is_anomaly: bool,
    delta: f64,
    dimension: Dimension,
}

/// Wire shape of a point. `delta` is ignored on input and recomputed.
#[derive(Deserialize)]
struct PointRecord {
    value: f64,
    expected_value: f64,
    #[serde(default)]
    is_anomaly: bool,
    dimension: Dimension,
}

impl From<PointRecord> for Point {
    fn from(r: PointRecord) -> Self {
        Point::new(r.value, r.expected_value, r.is_anomaly, r.dimension)
    }
}

impl Point {
    pub fn new(value: f64, expected_value: f64, is_anomaly: bool, dimension: Dimension) -> Self {
        Self {
            value,
            expected_value,
            is_anomaly,
            delta: value - expected_value,
            dimension,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn expected_value(&self) -> f64 {
        self.expected_value
    }

    pub fn is_anomaly(&self) -> bool {
        self.is_anomaly
    }

    /// `value - expected_value`.
    pub fn delta(&self) -> f64 {
        self.delta
    }

    pub fn dimension(&self) -> &Dimension {
        &self.dimension
    }
}

/// All points observed at one timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricSlice {
    pub timestamp: DateTime<Utc>,
    pub points: Vec<Point>,
}

impl MetricSlice {
    pub fn new(timestamp: DateTime<Utc>, points: Vec<Point>) -> Self {
        Self { timestamp, points }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_is_derived() {
        let p = Point::new(50.0, 10.0, true, Dimension::new());
        assert_eq!(p.delta(), 40.0);

        let p = Point::new(8.0, 10.0, false, Dimension::new());
        assert_eq!(p.delta(), -2.0);
    }

    #[test]
    fn deserialized_delta_ignores_wire_value() {
        let json = r#"{
            "value": 12.0,
            "expected_value": 10.0,
            "is_anomaly": false,
            "delta": 999.0,
            "dimension": {"country": "US"}
        }"#;
        let p: Point = serde_json::from_str(json).unwrap();
        assert_eq!(p.delta(), 2.0);
        assert!(!p.is_anomaly());
    }

    #[test]
    fn is_anomaly_defaults_to_false() {
        let json = r#"{"value": 1.0, "expected_value": 1.0, "dimension": {}}"#;
        let p: Point = serde_json::from_str(json).unwrap();
        assert!(!p.is_anomaly());
    }
}
