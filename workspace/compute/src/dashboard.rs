use common::{DashboardCharts, DashboardData, Feature, TimeBucket};
use model::SegmentationData;
use tracing::{debug, instrument};

use crate::charts::{
    DEFAULT_RADAR_FEATURES, feature_distribution, rfm_scatter, segment_donut, segment_radar,
    timeseries,
};
use crate::filter::{FilteredView, ResolvedSelection, apply_filter};
use crate::summary::compare_to_overall;

/// Chart inputs that are not part of the filter selection.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Feature shown in the histogram and box plot
    pub feature: Feature,
    pub bins: usize,
    pub bucket: TimeBucket,
    pub radar_features: Vec<Feature>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            feature: Feature::Monetary,
            bins: 30,
            bucket: TimeBucket::Month,
            radar_features: DEFAULT_RADAR_FEATURES.to_vec(),
        }
    }
}

/// Renders every chart panel from one filtered view.
pub fn render_charts(view: &FilteredView<'_>, options: &RenderOptions) -> DashboardCharts {
    DashboardCharts {
        donut: segment_donut(view),
        radar: segment_radar(view, &options.radar_features),
        scatter: rfm_scatter(view),
        distribution: feature_distribution(view, options.feature, options.bins),
        timeseries: timeseries(view, options.bucket),
    }
}

/// Runs the whole pipeline for one selection: filter, then summary and charts.
#[instrument(skip(data, resolved, options), fields(segment = %resolved.selection.segment))]
pub fn build_dashboard(
    data: &SegmentationData,
    resolved: ResolvedSelection,
    options: &RenderOptions,
) -> DashboardData {
    let view = apply_filter(data, &resolved.selection);
    let overall = FilteredView::overall(data);

    let summary = compare_to_overall(&view, &overall);
    let charts = render_charts(&view, options);

    debug!(
        customers = summary.metrics.total_customers,
        transactions = summary.metrics.total_transactions,
        "Dashboard built"
    );

    DashboardData {
        selection: resolved.selection,
        summary,
        charts,
        notices: resolved.notices,
    }
}
