use common::{Cluster, Feature, RadarAxis, RadarSeries, SegmentRadar};

use super::stats::mean;
use crate::filter::FilteredView;

/// Features the radar shows unless configured otherwise.
pub const DEFAULT_RADAR_FEATURES: [Feature; 4] = [
    Feature::Monetary,
    Feature::Frequency,
    Feature::Recency,
    Feature::CustomerValueScore,
];

/// Mean of each feature per cluster, scaled by the largest mean across
/// clusters so every axis runs from 0 to 1.
///
/// Axes where lower is better are flipped to `1 - mean / max`. An axis whose
/// max is zero (or undefined) is drawn at 0 for every cluster.
pub fn segment_radar(view: &FilteredView<'_>, features: &[Feature]) -> SegmentRadar {
    let axes = features
        .iter()
        .map(|&feature| RadarAxis {
            feature,
            label: feature.label().to_string(),
            inverted: feature.lower_is_better(),
        })
        .collect();

    let means: Vec<(Cluster, Vec<f64>)> = Cluster::ALL
        .into_iter()
        .filter(|&cluster| view.customers_in(cluster).next().is_some())
        .map(|cluster| {
            let values = features
                .iter()
                .map(|&feature| {
                    mean(view.customers_in(cluster).map(|customer| customer.feature(feature)))
                        .unwrap_or(0.0)
                })
                .collect();
            (cluster, values)
        })
        .collect();

    let maxima: Vec<f64> = (0..features.len())
        .map(|axis| {
            means
                .iter()
                .map(|(_, values)| values[axis])
                .fold(f64::NEG_INFINITY, f64::max)
        })
        .collect();

    let series = means
        .into_iter()
        .map(|(cluster, values)| {
            let normalized = values
                .iter()
                .zip(features)
                .zip(&maxima)
                .map(|((&value, feature), &max)| normalize(value, max, feature.lower_is_better()))
                .collect();
            RadarSeries {
                cluster,
                label: cluster.label().to_string(),
                color: cluster.color().to_string(),
                values: normalized,
                means: values,
            }
        })
        .collect();

    SegmentRadar {
        title: "Segment Characteristics Comparison".to_string(),
        axes,
        series,
    }
}

fn normalize(value: f64, max: f64, inverted: bool) -> f64 {
    if !max.is_finite() || max <= 0.0 {
        return 0.0;
    }
    let scaled = (value / max).clamp(0.0, 1.0);
    if inverted { 1.0 - scaled } else { scaled }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::segmentation_scenario;

    #[test]
    fn test_radar_normalizes_by_max() {
        let data = segmentation_scenario();
        let radar = segment_radar(&FilteredView::overall(&data), &DEFAULT_RADAR_FEATURES);

        assert_eq!(radar.axes.len(), 4);
        assert!(radar.axes[2].inverted);
        assert_eq!(radar.series.len(), 2);

        let occasional = &radar.series[0];
        let loyal = &radar.series[1];
        assert_eq!(occasional.cluster, Cluster::OccasionalBuyers);

        // monetary: means 75 and 500
        assert_eq!(occasional.means[0], 75.0);
        assert_eq!(loyal.values[0], 1.0);
        assert_eq!(occasional.values[0], 0.15);

        // recency is inverted: means 105 and 15
        assert_eq!(occasional.values[2], 0.0);
        assert!((loyal.values[2] - (1.0 - 15.0 / 105.0)).abs() < 1e-12);

        for series in &radar.series {
            assert!(series.values.iter().all(|v| (0.0..=1.0).contains(v)));
        }
    }

    #[test]
    fn test_zero_max_normalizes_to_zero() {
        assert_eq!(normalize(0.0, 0.0, false), 0.0);
        assert_eq!(normalize(0.0, 0.0, true), 0.0);
        assert_eq!(normalize(1.0, f64::NAN, false), 0.0);
    }

    #[test]
    fn test_radar_empty_view() {
        let data = model::SegmentationData::default();
        let radar = segment_radar(&FilteredView::overall(&data), &DEFAULT_RADAR_FEATURES);

        assert!(radar.is_empty());
        assert_eq!(radar.axes.len(), 4);
    }
}
