use common::{Cluster, DistributionSeries, Feature, FeatureDistribution, HistogramBin};

use super::stats::{box_stats, sorted_finite};
use crate::filter::FilteredView;

/// Histogram and box summary of one feature, per cluster.
///
/// Bin edges are shared by all clusters so the bars line up; counts are turned
/// into a percent of each cluster's own customers. When every value is equal a
/// single unit-wide bin is centered on it.
pub fn feature_distribution(
    view: &FilteredView<'_>,
    feature: Feature,
    bins: usize,
) -> FeatureDistribution {
    let bins = bins.max(1);

    let values: Vec<(Cluster, Vec<f64>)> = Cluster::ALL
        .into_iter()
        .map(|cluster| {
            let sorted = sorted_finite(
                view.customers_in(cluster)
                    .map(|customer| customer.feature(feature)),
            );
            (cluster, sorted)
        })
        .filter(|(_, sorted)| !sorted.is_empty())
        .collect();

    let low = values
        .iter()
        .filter_map(|(_, sorted)| sorted.first().copied())
        .fold(f64::INFINITY, f64::min);
    let high = values
        .iter()
        .filter_map(|(_, sorted)| sorted.last().copied())
        .fold(f64::NEG_INFINITY, f64::max);
    let edges = bin_edges(low, high, bins);

    let series = values
        .into_iter()
        .map(|(cluster, sorted)| DistributionSeries {
            cluster,
            label: cluster.label().to_string(),
            color: cluster.color().to_string(),
            count: sorted.len(),
            bins: histogram(&sorted, &edges),
            box_stats: box_stats(&sorted),
            values: sorted,
        })
        .collect();

    FeatureDistribution {
        title: format!("Distribution of {} by Segment", feature.label()),
        feature,
        feature_label: feature.label().to_string(),
        series,
    }
}

fn bin_edges(low: f64, high: f64, bins: usize) -> Vec<f64> {
    if !low.is_finite() || !high.is_finite() {
        return Vec::new();
    }
    if high <= low {
        return vec![low - 0.5, low + 0.5];
    }
    let width = (high - low) / bins as f64;
    (0..=bins)
        .map(|edge| if edge == bins { high } else { low + width * edge as f64 })
        .collect()
}

fn histogram(sorted: &[f64], edges: &[f64]) -> Vec<HistogramBin> {
    let Some((&low, &high)) = edges.first().zip(edges.last()) else {
        return Vec::new();
    };
    let bins = edges.len() - 1;
    let width = (high - low) / bins as f64;

    let mut counts = vec![0usize; bins];
    for &value in sorted {
        let index = ((value - low) / width).floor().max(0.0) as usize;
        counts[index.min(bins - 1)] += 1;
    }

    let total = sorted.len();
    edges
        .windows(2)
        .zip(counts)
        .map(|(edge, count)| HistogramBin {
            start: edge[0],
            end: edge[1],
            count,
            percent: if total > 0 {
                count as f64 / total as f64 * 100.0
            } else {
                0.0
            },
        })
        .collect()
}
