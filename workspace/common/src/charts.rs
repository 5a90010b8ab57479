//! Chart descriptions. Each one is plain data that the page hands to plotly.js;
//! an empty description is the placeholder state for an empty filtered view.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::filters::{Cluster, Feature, TimeBucket};

/// One slice of the segment donut.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct SegmentSlice {
    #[schema(value_type = u8)]
    pub cluster: Cluster,
    pub label: String,
    pub color: String,
    pub count: usize,
    pub percentage: f64,
}

/// Proportion of customers per cluster.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct SegmentDonut {
    pub title: String,
    /// Relative size of the hole, 0..1
    pub hole: f64,
    pub slices: Vec<SegmentSlice>,
}

impl SegmentDonut {
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct RadarAxis {
    pub feature: Feature,
    pub label: String,
    /// Axis is drawn as `1 - value/max` so that "further out" is always better
    pub inverted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct RadarSeries {
    #[schema(value_type = u8)]
    pub cluster: Cluster,
    pub label: String,
    pub color: String,
    /// Normalized values in 0..=1, one per axis
    pub values: Vec<f64>,
    /// Cluster means before normalization, one per axis
    pub means: Vec<f64>,
}

/// Normalized comparison of mean feature values between clusters.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct SegmentRadar {
    pub title: String,
    pub axes: Vec<RadarAxis>,
    pub series: Vec<RadarSeries>,
}

impl SegmentRadar {
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ScatterPoint {
    pub customer_id: String,
    pub frequency: f64,
    pub monetary: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ScatterSeries {
    #[schema(value_type = u8)]
    pub cluster: Cluster,
    pub label: String,
    pub color: String,
    pub points: Vec<ScatterPoint>,
}

/// Monetary (y) against frequency (x), one point per customer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct RfmScatter {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<ScatterSeries>,
}

impl RfmScatter {
    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|series| series.points.is_empty())
    }
}

/// Half-open histogram bin `[start, end)`; the last bin also contains its end.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
    /// Share of the cluster's customers that fall in this bin
    pub percent: f64,
}

/// Five-number summary plus whiskers at 1.5 IQR.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct BoxStats {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct DistributionSeries {
    #[schema(value_type = u8)]
    pub cluster: Cluster,
    pub label: String,
    pub color: String,
    pub count: usize,
    pub bins: Vec<HistogramBin>,
    pub box_stats: Option<BoxStats>,
    /// Raw values, so the client can draw the marginal box plot itself
    pub values: Vec<f64>,
}

/// Histogram and box plot of one feature, grouped by cluster.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct FeatureDistribution {
    pub title: String,
    pub feature: Feature,
    pub feature_label: String,
    pub series: Vec<DistributionSeries>,
}

impl FeatureDistribution {
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TimeseriesMetric {
    Revenue,
    ActiveCustomers,
    AvgOrderValue,
}

impl TimeseriesMetric {
    pub const ALL: [TimeseriesMetric; 3] = [
        TimeseriesMetric::Revenue,
        TimeseriesMetric::ActiveCustomers,
        TimeseriesMetric::AvgOrderValue,
    ];

    pub fn title(self) -> &'static str {
        match self {
            TimeseriesMetric::Revenue => "Revenue Trends",
            TimeseriesMetric::ActiveCustomers => "Customer Activity",
            TimeseriesMetric::AvgOrderValue => "Average Order Value",
        }
    }

    pub fn axis_label(self) -> &'static str {
        match self {
            TimeseriesMetric::Revenue => "Total Revenue",
            TimeseriesMetric::ActiveCustomers => "Number of Active Customers",
            TimeseriesMetric::AvgOrderValue => "Average Order Value",
        }
    }
}

/// Aggregates of one cluster in one time bucket.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct TimeseriesPoint {
    /// First day of the bucket
    pub period: NaiveDate,
    pub revenue: f64,
    pub active_customers: usize,
    pub avg_order_value: f64,
    pub order_count: usize,
}

impl TimeseriesPoint {
    pub fn value(&self, metric: TimeseriesMetric) -> f64 {
        match metric {
            TimeseriesMetric::Revenue => self.revenue,
            TimeseriesMetric::ActiveCustomers => self.active_customers as f64,
            TimeseriesMetric::AvgOrderValue => self.avg_order_value,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct TimeseriesSeries {
    #[schema(value_type = u8)]
    pub cluster: Cluster,
    pub label: String,
    pub color: String,
    pub points: Vec<TimeseriesPoint>,
}

/// Revenue, active customers and average order value per time bucket.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct TimeseriesChart {
    pub title: String,
    pub bucket: TimeBucket,
    /// One panel per metric, in display order
    pub metrics: Vec<TimeseriesMetric>,
    pub series: Vec<TimeseriesSeries>,
}

impl TimeseriesChart {
    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|series| series.points.is_empty())
    }
}

/// All chart panels of the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct DashboardCharts {
    pub donut: SegmentDonut,
    pub radar: SegmentRadar,
    pub scatter: RfmScatter,
    pub distribution: FeatureDistribution,
    pub timeseries: TimeseriesChart,
}
