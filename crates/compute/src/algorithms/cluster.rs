use rootcause_core::{LocalizerConfig, Point};
use tracing::debug;

/// Find the smallest prefix of the anomalous children, largest deviation
/// first, that accounts for the root's deviation.
///
/// `comparison` is the full set of sibling points (anomalous or not) the
/// cluster size is measured against. Returns `None` when no compact cluster
/// explains the root.
pub fn top_anomalies<'a>(
    anomalies: &[&'a Point],
    root: &Point,
    comparison: &[&Point],
    config: &LocalizerConfig,
) -> Option<Vec<&'a Point>> {
    if anomalies.is_empty() {
        return None;
    }

    let mut ordered = anomalies.to_vec();
    ordered.sort_by(|a, b| {
        a.delta()
            .total_cmp(&b.delta())
            .then_with(|| a.dimension().cmp(b.dimension()))
    });
    if root.delta() > 0.0 {
        ordered.reverse();
    }

    if ordered.len() == 1 {
        return Some(ordered);
    }

    let mut accumulated = 0.0;
    let mut previous = 0.0;
    let mut cluster = Vec::new();
    for point in ordered {
        if should_stop(accumulated, root.delta(), point.delta(), previous, config) {
            break;
        }
        accumulated += point.delta();
        previous = point.delta();
        cluster.push(point);
    }

    if explains_root(accumulated, root.delta(), comparison.len(), cluster.len(), config) {
        debug!(
            "Cluster of {} child(ren) explains {:.2} of root delta {:.2}",
            cluster.len(),
            accumulated,
            root.delta()
        );
        Some(cluster)
    } else {
        debug!(
            "No compact cluster: {} child(ren) of {} reach {:.2} of root delta {:.2}",
            cluster.len(),
            comparison.len(),
            accumulated,
            root.delta()
        );
        None
    }
}

/// Stop before adding `current` once the running total covers the parent
/// and `current` is much smaller than the previous child. With no previous
/// child (`previous == 0`) the ratio test never fires.
fn should_stop(
    accumulated: f64,
    parent: f64,
    current: f64,
    previous: f64,
    config: &LocalizerConfig,
) -> bool {
    if accumulated.abs() < parent.abs() * config.delta_threshold {
        return false;
    }
    previous.abs() / current.abs() > config.pre_delta_ratio
}

fn explains_root(
    accumulated: f64,
    parent: f64,
    candidate_count: usize,
    cluster_size: usize,
    config: &LocalizerConfig,
) -> bool {
    if accumulated.abs() < parent.abs() * config.delta_threshold {
        return false;
    }
    if cluster_size == candidate_count && cluster_size == 1 {
        return true;
    }
    cluster_size as f64 <= candidate_count as f64 * config.cluster_ratio
}
