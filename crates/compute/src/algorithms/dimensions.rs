use rootcause_core::{Dimension, DimensionValue};

/// Split of an anomaly's dimension keys.
///
/// Both lists are in sorted key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DimensionInfo {
    /// Keys rolled up in the anomaly (value is the aggregation symbol).
    /// These are the ones that can be decomposed.
    pub aggregated_keys: Vec<String>,
    /// Keys pinned to a concrete value; they act as filters.
    pub detail_keys: Vec<String>,
}

impl DimensionInfo {
    pub fn has_aggregated(&self) -> bool {
        !self.aggregated_keys.is_empty()
    }

    /// The detail keys' required values, taken from the anomaly dimension.
    pub fn detail_filter(&self, anomaly: &Dimension) -> Dimension {
        anomaly.subset(&self.detail_keys)
    }
}

/// Classify every key of `anomaly` as aggregated or detail.
pub fn classify_dimensions(anomaly: &Dimension, aggregation_symbol: &DimensionValue) -> DimensionInfo {
    let mut info = DimensionInfo::default();
    for (key, value) in anomaly.iter() {
        if value == aggregation_symbol {
            info.aggregated_keys.push(key.clone());
        } else {
            info.detail_keys.push(key.clone());
        }
    }
    info
}
