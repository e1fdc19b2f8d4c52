use std::collections::HashMap;

use rootcause_core::{Dimension, Point, RcaError, Result, RootCauseLocalizationInput};
use tracing::{debug, warn};

use super::dimensions::DimensionInfo;
use super::tree::{PointTree, TreeBuilder};

/// Points at the anomaly timestamp that fall under the anomaly's detail
/// filter, classified twice: once over all of them and once over the
/// anomalous ones only.
#[derive(Debug, Default)]
pub struct PointIndex<'a> {
    pub all: PointTree<'a>,
    pub anomalies: PointTree<'a>,
    by_dimension: HashMap<&'a Dimension, &'a Point>,
}

impl<'a> PointIndex<'a> {
    /// Scan the slice at the anomaly timestamp. A missing slice yields an
    /// empty index.
    ///
    /// Only the first point seen per dimension vector is kept; later
    /// duplicates are dropped with a warning.
    pub fn build(input: &'a RootCauseLocalizationInput, info: &DimensionInfo) -> Result<Self> {
        let slices = input
            .slices
            .iter()
            .filter(|s| s.timestamp == input.anomaly_timestamp)
            .count();
        if slices > 1 {
            warn!(
                "{} slices share timestamp {}; using the last one",
                slices, input.anomaly_timestamp
            );
        }

        let points = input.points_at_anomaly();
        let filter = info.detail_filter(&input.anomaly_dimension);

        let mut all = TreeBuilder::new(&info.aggregated_keys, &input.aggregation_symbol);
        let mut anomalies = TreeBuilder::new(&info.aggregated_keys, &input.aggregation_symbol);
        let mut by_dimension: HashMap<&'a Dimension, &'a Point> = HashMap::new();
        let mut duplicates = 0usize;

        for point in points {
            if let Some(key) = info.detail_keys.iter().find(|k| !point.dimension().contains_key(k)) {
                return Err(RcaError::MalformedInput {
                    point: point.dimension().signature(),
                    key: key.clone(),
                });
            }
            if !point.dimension().contains_all(&filter) {
                continue;
            }
            if by_dimension.contains_key(point.dimension()) {
                duplicates += 1;
                continue;
            }

            all.push(point)?;
            if point.is_anomaly() {
                anomalies.push(point)?;
            }
            by_dimension.insert(point.dimension(), point);
        }

        if duplicates > 0 {
            warn!(
                "Dropped {} duplicate point(s) at {}; first occurrence kept",
                duplicates, input.anomaly_timestamp
            );
        }
        debug!(
            "Indexed {} of {} point(s) under filter [{}]",
            by_dimension.len(),
            points.len(),
            filter
        );

        Ok(Self {
            all: all.finish(),
            anomalies: anomalies.finish(),
            by_dimension,
        })
    }

    /// The indexed point with exactly this dimension vector.
    pub fn get(&self, dimension: &Dimension) -> Option<&'a Point> {
        self.by_dimension.get(dimension).copied()
    }

    pub fn len(&self) -> usize {
        self.by_dimension.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_dimension.is_empty()
    }
}
