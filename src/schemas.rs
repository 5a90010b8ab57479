use common::{
    BoxStats, CustomerRow, DashboardCharts, DashboardData, DatasetInfo, DateRange,
    DistributionSeries, Feature, FeatureDistribution, FilterOptions, FilterSelection,
    HistogramBin, OptionEntry, RadarAxis, RadarSeries, RawView, RfmScatter, ScatterPoint,
    ScatterSeries, SegmentDonut, SegmentRadar, SegmentSlice, SummaryComparison, SummaryMetrics,
    TimeBucket, TimeseriesChart, TimeseriesMetric, TimeseriesPoint, TimeseriesSeries,
    TransactionRow,
};
use model::SegmentationData;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, OpenApi, ToSchema};
use validator::Validate;

use crate::config::Settings;

pub use common::ApiResponse;

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Both source tables, loaded at startup and never mutated
    pub data: Arc<SegmentationData>,
    pub settings: Arc<Settings>,
}

/// Filter and chart parameters accepted by every dashboard endpoint.
///
/// All of them are optional; empty values count as absent.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct DashboardQuery {
    /// Customer segment: `all`, `0` (Occasional Buyers) or `1` (High-Value Loyalists)
    pub segment: Option<String>,
    /// First day of the date range (YYYY-MM-DD), defaults to the first order date
    pub start_date: Option<String>,
    /// Last day of the date range (YYYY-MM-DD), defaults to the last order date
    pub end_date: Option<String>,
    /// Feature for the distribution chart (e.g. `monetary`, `recency`)
    pub feature: Option<String>,
    /// Time series granularity: `day`, `week` or `month`
    pub bucket: Option<String>,
    /// Number of histogram bins (2-200)
    #[validate(range(min = 2, max = 200))]
    pub bins: Option<usize>,
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Row counts of the loaded tables
    pub dataset: DatasetInfo,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::filters::get_filter_options,
        crate::handlers::dashboard::get_dashboard,
        crate::handlers::summary::get_summary,
        crate::handlers::charts::get_segment_donut,
        crate::handlers::charts::get_segment_radar,
        crate::handlers::charts::get_rfm_scatter,
        crate::handlers::charts::get_feature_distribution,
        crate::handlers::charts::get_timeseries,
        crate::handlers::view::get_raw_view,
    ),
    components(
        schemas(
            ApiResponse<DashboardData>,
            ApiResponse<FilterOptions>,
            ApiResponse<SummaryComparison>,
            ApiResponse<RawView>,
            ErrorResponse,
            HealthResponse,
            DashboardQuery,
            DatasetInfo,
            DashboardData,
            FilterOptions,
            FilterSelection,
            OptionEntry,
            DateRange,
            Feature,
            TimeBucket,
            SummaryComparison,
            SummaryMetrics,
            DashboardCharts,
            SegmentDonut,
            SegmentSlice,
            SegmentRadar,
            RadarAxis,
            RadarSeries,
            RfmScatter,
            ScatterSeries,
            ScatterPoint,
            FeatureDistribution,
            DistributionSeries,
            HistogramBin,
            BoxStats,
            TimeseriesChart,
            TimeseriesSeries,
            TimeseriesPoint,
            TimeseriesMetric,
            RawView,
            CustomerRow,
            TransactionRow,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "dashboard", description = "Filter options, summary metrics and the full dashboard"),
        (name = "charts", description = "Individual chart descriptions"),
        (name = "view", description = "Raw filtered data"),
    ),
    info(
        title = "segdash API",
        description = "Customer segmentation dashboard: summary metrics and chart data over clustered customer features",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
