//! One-level classification of points relative to an anomaly's
//! aggregated keys.
//!
//! With aggregated keys `[country, device]`:
//! - `{country: *, device: *}` is the root (the rollup itself)
//! - `{country: US, device: *}` is a child under `country`
//! - `{country: US, device: web}` is a leaf
//!
//! With a single aggregated key a detailed point is both a child and a
//! leaf. Points unrolled on more than one but not all aggregated keys
//! are ignored.

use std::collections::BTreeMap;

use rootcause_core::{DimensionValue, Point, RcaError, Result};

#[derive(Debug, Clone, Default)]
pub struct PointTree<'a> {
    pub root: Option<&'a Point>,
    /// Points unrolled on exactly one aggregated key, bucketed by that key.
    pub children: BTreeMap<String, Vec<&'a Point>>,
    /// Points unrolled on every aggregated key.
    pub leaves: Vec<&'a Point>,
}

impl<'a> PointTree<'a> {
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none() && self.children.is_empty() && self.leaves.is_empty()
    }
}

/// Where a point lands in a [`PointTree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    Root,
    Child(String),
    Leaf,
    /// Only possible with a single aggregated key: the point is one short
    /// of the root and fully detailed at the same time.
    ChildAndLeaf(String),
    Skip,
}

/// Accumulates points into a [`PointTree`].
pub struct TreeBuilder<'k, 'a> {
    aggregated_keys: &'k [String],
    aggregation_symbol: &'k DimensionValue,
    tree: PointTree<'a>,
}

impl<'k, 'a> TreeBuilder<'k, 'a> {
    pub fn new(aggregated_keys: &'k [String], aggregation_symbol: &'k DimensionValue) -> Self {
        Self {
            aggregated_keys,
            aggregation_symbol,
            tree: PointTree::default(),
        }
    }

    /// Decide where `point` belongs without inserting it.
    pub fn placement(&self, point: &Point) -> Result<Placement> {
        let mut aggregated = 0usize;
        let mut unrolled: Option<&String> = None;

        for key in self.aggregated_keys {
            let value = point
                .dimension()
                .get(key)
                .ok_or_else(|| RcaError::MalformedInput {
                    point: point.dimension().signature(),
                    key: key.clone(),
                })?;
            if value == self.aggregation_symbol {
                aggregated += 1;
            } else {
                unrolled = Some(key);
            }
        }

        let total = self.aggregated_keys.len();
        let one_short = aggregated + 1 == total;
        Ok(match (aggregated, unrolled) {
            (n, _) if n == total => Placement::Root,
            (0, Some(key)) if one_short => Placement::ChildAndLeaf(key.clone()),
            (0, _) => Placement::Leaf,
            (_, Some(key)) if one_short => Placement::Child(key.clone()),
            _ => Placement::Skip,
        })
    }

    pub fn push(&mut self, point: &'a Point) -> Result<Placement> {
        let placement = self.placement(point)?;
        match &placement {
            Placement::Root => self.tree.root = Some(point),
            Placement::Child(key) => self.tree.children.entry(key.clone()).or_default().push(point),
            Placement::Leaf => self.tree.leaves.push(point),
            Placement::ChildAndLeaf(key) => {
                self.tree.children.entry(key.clone()).or_default().push(point);
                self.tree.leaves.push(point);
            }
            Placement::Skip => {}
        }
        Ok(placement)
    }

    pub fn finish(self) -> PointTree<'a> {
        self.tree
    }
}
