//! Binary entropy and value distributions used to rank candidate
//! dimensions.

use std::collections::BTreeMap;

use rootcause_core::{DimensionValue, Point};

/// Number of points per concrete value of one dimension key, in value order.
pub type Distribution = BTreeMap<DimensionValue, usize>;

/// Binary entropy (bits) of `anomalous` out of `total`.
///
/// 0 when the split is pure (ratio 0 or 1) or there is nothing to split.
pub fn entropy(total: usize, anomalous: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let ratio = anomalous as f64 / total as f64;
    if ratio == 0.0 || ratio == 1.0 {
        return 0.0;
    }
    -(ratio * ratio.log2() + (1.0 - ratio) * (1.0 - ratio).log2())
}

/// Count points per value of `key`. Points without the key are ignored.
pub fn distribution(points: &[&Point], key: &str) -> Distribution {
    let mut dist = Distribution::new();
    for point in points {
        if let Some(value) = point.dimension().get(key) {
            *dist.entry(value.clone()).or_insert(0) += 1;
        }
    }
    dist
}

pub fn total(dist: &Distribution) -> usize {
    dist.values().sum()
}

/// Entropy remaining after splitting on a dimension: per-value entropies
/// weighted by each value's share of all points.
pub fn dimension_entropy(points: &Distribution, anomalies: &Distribution) -> f64 {
    let total = total(points);
    if total == 0 {
        return 0.0;
    }
    anomalies
        .iter()
        .map(|(value, &anomalous)| {
            let count = points.get(value).copied().unwrap_or(0);
            entropy(count, anomalous) * count as f64 / total as f64
        })
        .sum()
}

/// Split information of a distribution. Large for high-cardinality
/// dimensions; 0 when there is at most one distinct value.
pub fn intrinsic_value(dist: &Distribution) -> f64 {
    let total = total(dist);
    if total == 0 {
        return 0.0;
    }
    dist.values()
        .filter(|&&count| count > 0)
        .map(|&count| {
            let share = count as f64 / total as f64;
            -share * share.log2()
        })
        .sum()
}

/// `gain / intrinsic`, or 0 when the intrinsic value is 0.
pub fn gain_ratio(gain: f64, intrinsic: f64) -> f64 {
    if intrinsic <= 0.0 {
        0.0
    } else {
        gain / intrinsic
    }
}
