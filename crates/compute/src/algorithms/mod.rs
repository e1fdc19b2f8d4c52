pub mod cluster;
pub mod dimensions;
pub mod entropy;
pub mod index;
pub mod score;
pub mod selector;
pub mod tree;

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{DateTime, TimeZone, Utc};
    use rootcause_core::{Dimension, Point};

    pub fn dim(pairs: &[(&str, &str)]) -> Dimension {
        pairs.iter().copied().collect()
    }

    pub fn point(value: f64, expected: f64, is_anomaly: bool, pairs: &[(&str, &str)]) -> Point {
        Point::new(value, expected, is_anomaly, dim(pairs))
    }

    pub fn timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }
}
