//! Common transport-layer types shared between the compute layer and the web server.
//! These structs are the request/response payloads of the dashboard API, so the
//! HTML view and JSON clients deserialize the same shapes.

mod charts;
mod filters;
mod format;
mod summary;

pub use charts::{
    BoxStats, DashboardCharts, DistributionSeries, FeatureDistribution, HistogramBin,
    RadarAxis, RadarSeries, RfmScatter, ScatterPoint, ScatterSeries, SegmentDonut,
    SegmentRadar, SegmentSlice, TimeseriesChart, TimeseriesMetric, TimeseriesPoint,
    TimeseriesSeries,
};
pub use filters::{
    Cluster, DateRange, Feature, FilterOptions, FilterSelection, OptionEntry, ParseError,
    Segment, TimeBucket,
};
pub use format::{format_money, format_pct};
pub use summary::{SummaryComparison, SummaryMetrics};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Generic API response wrapper. The server re-exports it, so JSON clients
/// deserialize exactly what the handlers produce.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success flag
    pub success: bool,
}

// ===================== Dashboard =====================

/// Everything one render of the dashboard needs: the resolved selection,
/// the metric cards and every chart.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct DashboardData {
    pub selection: FilterSelection,
    pub summary: SummaryComparison,
    pub charts: DashboardCharts,
    /// User-visible messages produced while resolving the selection
    /// (clamped dates, rejected input).
    pub notices: Vec<String>,
}

// ===================== Raw data =====================

/// One transaction row of the filtered view.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct TransactionRow {
    pub customer_id: String,
    pub order_date: chrono::NaiveDateTime,
    #[schema(value_type = String)]
    pub purchase_amount: Decimal,
    pub currency: String,
}

/// One customer feature row of the filtered view.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct CustomerRow {
    pub customer_id: String,
    pub recency: f64,
    pub frequency: f64,
    pub monetary: f64,
    pub purchase_variability: f64,
    pub first_purchase: chrono::NaiveDateTime,
    pub last_purchase: chrono::NaiveDateTime,
    pub tenure_days: f64,
    pub purchases_per_day: f64,
    pub spend_per_day: f64,
    pub recency_ratio: f64,
    pub customer_value_score: f64,
    #[schema(value_type = u8)]
    pub cluster: Cluster,
}

/// The filtered tables themselves.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct RawView {
    pub selection: FilterSelection,
    pub customers: Vec<CustomerRow>,
    pub transactions: Vec<TransactionRow>,
}

// ===================== Health =====================

/// Row counts of the tables loaded at startup.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct DatasetInfo {
    pub transactions: usize,
    pub customers: usize,
    pub first_order: Option<NaiveDate>,
    pub last_order: Option<NaiveDate>,
}
