use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Error returned when a filter value from the query string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} '{}'", self.kind, self.value)
    }
}

impl std::error::Error for ParseError {}

/// Binary customer segment assigned upstream.
///
/// Serialized as its numeric code (`0` or `1`), the same way it appears in
/// the clustered features table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Cluster {
    OccasionalBuyers,
    HighValueLoyalists,
}

impl Cluster {
    pub const ALL: [Cluster; 2] = [Cluster::OccasionalBuyers, Cluster::HighValueLoyalists];

    pub fn code(self) -> u8 {
        match self {
            Cluster::OccasionalBuyers => 0,
            Cluster::HighValueLoyalists => 1,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Cluster::OccasionalBuyers),
            1 => Some(Cluster::HighValueLoyalists),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Cluster::OccasionalBuyers => "Occasional Buyers",
            Cluster::HighValueLoyalists => "High-Value Loyalists",
        }
    }

    /// Plot color used for this segment in every chart.
    pub fn color(self) -> &'static str {
        match self {
            Cluster::OccasionalBuyers => "#ff7f0e",
            Cluster::HighValueLoyalists => "#1f77b4",
        }
    }
}

impl TryFrom<u8> for Cluster {
    type Error = ParseError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Cluster::from_code(code as i64).ok_or_else(|| ParseError::new("cluster", &code.to_string()))
    }
}

impl From<Cluster> for u8 {
    fn from(cluster: Cluster) -> Self {
        cluster.code()
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Segment filter: every customer, or only one cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Segment {
    #[default]
    All,
    Only(Cluster),
}

impl Segment {
    pub const ALL: [Segment; 3] = [
        Segment::All,
        Segment::Only(Cluster::OccasionalBuyers),
        Segment::Only(Cluster::HighValueLoyalists),
    ];

    /// Whether a customer with the given cluster (or none, when the customer
    /// has no feature record) belongs to this segment.
    pub fn matches(self, cluster: Option<Cluster>) -> bool {
        match self {
            Segment::All => true,
            Segment::Only(wanted) => cluster == Some(wanted),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Segment::All => "All",
            Segment::Only(cluster) => cluster.label(),
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::All => write!(f, "all"),
            Segment::Only(cluster) => write!(f, "{}", cluster),
        }
    }
}

impl FromStr for Segment {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(Segment::All);
        }
        trimmed
            .parse::<i64>()
            .ok()
            .and_then(Cluster::from_code)
            .map(Segment::Only)
            .ok_or_else(|| ParseError::new("segment", s))
    }
}

impl TryFrom<String> for Segment {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Segment> for String {
    fn from(segment: Segment) -> Self {
        segment.to_string()
    }
}

/// Numeric columns of the customer features table that can be charted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Monetary,
    Frequency,
    Recency,
    PurchaseVariability,
    TenureDays,
    PurchasesPerDay,
    SpendPerDay,
    RecencyRatio,
    CustomerValueScore,
}

impl Feature {
    pub const ALL: [Feature; 9] = [
        Feature::Monetary,
        Feature::Frequency,
        Feature::Recency,
        Feature::PurchaseVariability,
        Feature::TenureDays,
        Feature::PurchasesPerDay,
        Feature::SpendPerDay,
        Feature::RecencyRatio,
        Feature::CustomerValueScore,
    ];

    /// Column name in the clustered features table.
    pub fn column(self) -> &'static str {
        match self {
            Feature::Monetary => "monetary",
            Feature::Frequency => "frequency",
            Feature::Recency => "recency",
            Feature::PurchaseVariability => "purchase_variability",
            Feature::TenureDays => "tenure_days",
            Feature::PurchasesPerDay => "purchases_per_day",
            Feature::SpendPerDay => "spend_per_day",
            Feature::RecencyRatio => "recency_ratio",
            Feature::CustomerValueScore => "customer_value_score",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Feature::Monetary => "Total Spend",
            Feature::Frequency => "Purchase Frequency",
            Feature::Recency => "Days Since Last Purchase",
            Feature::PurchaseVariability => "Purchase Variability",
            Feature::TenureDays => "Customer Tenure (days)",
            Feature::PurchasesPerDay => "Purchases per Day",
            Feature::SpendPerDay => "Spend per Day",
            Feature::RecencyRatio => "Recency Ratio",
            Feature::CustomerValueScore => "Customer Value Score",
        }
    }

    /// Features where a smaller value describes a better customer.
    pub fn lower_is_better(self) -> bool {
        matches!(self, Feature::Recency)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for Feature {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Feature::ALL
            .into_iter()
            .find(|feature| feature.column().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseError::new("feature", s))
    }
}

/// Granularity of the time-series aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TimeBucket {
    Day,
    /// ISO weeks, starting on Monday
    Week,
    #[default]
    Month,
}

impl TimeBucket {
    pub const ALL: [TimeBucket; 3] = [TimeBucket::Day, TimeBucket::Week, TimeBucket::Month];

    /// First day of the bucket that contains `date`.
    pub fn start_of(self, date: NaiveDate) -> NaiveDate {
        match self {
            TimeBucket::Day => date,
            TimeBucket::Week => {
                date - Duration::days(date.weekday().num_days_from_monday() as i64)
            }
            TimeBucket::Month => date.with_day(1).unwrap_or(date),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimeBucket::Day => "day",
            TimeBucket::Week => "week",
            TimeBucket::Month => "month",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeBucket::Day => "Day",
            TimeBucket::Week => "Week",
            TimeBucket::Month => "Month",
        }
    }
}

impl fmt::Display for TimeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeBucket {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        TimeBucket::ALL
            .into_iter()
            .find(|bucket| bucket.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseError::new("time bucket", s))
    }
}

/// Inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

/// The active filter: a query predicate over the two source tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FilterSelection {
    #[schema(value_type = String)]
    pub segment: Segment,
    pub date_range: DateRange,
}

impl FilterSelection {
    pub fn new(segment: Segment, date_range: DateRange) -> Self {
        Self {
            segment,
            date_range,
        }
    }
}

/// A value/label pair for a select input.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct OptionEntry {
    pub value: String,
    pub label: String,
}

impl OptionEntry {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Inputs the UI offers and the selection it starts from.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct FilterOptions {
    pub segments: Vec<OptionEntry>,
    pub features: Vec<OptionEntry>,
    pub buckets: Vec<OptionEntry>,
    /// Earliest and latest order date in the transactions table
    pub date_bounds: Option<DateRange>,
    pub default_selection: FilterSelection,
    pub default_feature: Feature,
    pub default_bucket: TimeBucket,
}

impl FilterOptions {
    pub fn new(
        date_bounds: Option<DateRange>,
        default_selection: FilterSelection,
        default_feature: Feature,
        default_bucket: TimeBucket,
    ) -> Self {
        Self {
            segments: Segment::ALL
                .into_iter()
                .map(|segment| OptionEntry::new(segment.to_string(), segment.label()))
                .collect(),
            features: Feature::ALL
                .into_iter()
                .map(|feature| OptionEntry::new(feature.column(), feature.label()))
                .collect(),
            buckets: TimeBucket::ALL
                .into_iter()
                .map(|bucket| OptionEntry::new(bucket.as_str(), bucket.label()))
                .collect(),
            date_bounds,
            default_selection,
            default_feature,
            default_bucket,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_selection_schema_documents_segment_as_string() {
        let (name, schema) = FilterSelection::schema();
        assert_eq!(name, "FilterSelection");

        let json = serde_json::to_value(&schema).unwrap();
        assert_eq!(json["properties"]["segment"]["type"], "string");
    }

    #[test]
    fn test_segment_parsing() {
        assert_eq!("all".parse::<Segment>().unwrap(), Segment::All);
        assert_eq!("All".parse::<Segment>().unwrap(), Segment::All);
        assert_eq!(
            "0".parse::<Segment>().unwrap(),
            Segment::Only(Cluster::OccasionalBuyers)
        );
        assert_eq!(
            " 1 ".parse::<Segment>().unwrap(),
            Segment::Only(Cluster::HighValueLoyalists)
        );
        assert!("2".parse::<Segment>().is_err());
        assert!("loyal".parse::<Segment>().is_err());
    }

    #[test]
    fn test_segment_matches() {
        assert!(Segment::All.matches(None));
        assert!(Segment::All.matches(Some(Cluster::HighValueLoyalists)));
        assert!(Segment::Only(Cluster::OccasionalBuyers).matches(Some(Cluster::OccasionalBuyers)));
        assert!(!Segment::Only(Cluster::OccasionalBuyers).matches(Some(Cluster::HighValueLoyalists)));
        assert!(!Segment::Only(Cluster::OccasionalBuyers).matches(None));
    }

    #[test]
    fn test_selection_serializes_codes() {
        let selection = FilterSelection::new(
            Segment::Only(Cluster::HighValueLoyalists),
            DateRange::new(date(2024, 1, 1), date(2024, 3, 31)),
        );
        let json = serde_json::to_value(selection).unwrap();
        assert_eq!(json["segment"], "1");
        assert_eq!(json["date_range"]["start"], "2024-01-01");

        let back: FilterSelection = serde_json::from_value(json).unwrap();
        assert_eq!(back, selection);
        assert_eq!(serde_json::to_value(Cluster::OccasionalBuyers).unwrap(), 0);
    }

    #[test]
    fn test_feature_parsing() {
        assert_eq!("monetary".parse::<Feature>().unwrap(), Feature::Monetary);
        assert_eq!(
            "Customer_Value_Score".parse::<Feature>().unwrap(),
            Feature::CustomerValueScore
        );
        assert!("cluster".parse::<Feature>().is_err());
        assert!(Feature::Recency.lower_is_better());
        assert!(!Feature::Monetary.lower_is_better());
    }

    #[test]
    fn test_time_bucket_start_of() {
        // 2024-05-15 is a Wednesday
        let day = date(2024, 5, 15);
        assert_eq!(TimeBucket::Day.start_of(day), day);
        assert_eq!(TimeBucket::Week.start_of(day), date(2024, 5, 13));
        assert_eq!(TimeBucket::Month.start_of(day), date(2024, 5, 1));
        assert_eq!(TimeBucket::Week.start_of(date(2024, 5, 13)), date(2024, 5, 13));
        assert_eq!("WEEK".parse::<TimeBucket>().unwrap(), TimeBucket::Week);
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 31));
        assert!(range.contains(date(2024, 1, 1)));
        assert!(range.contains(date(2024, 1, 31)));
        assert!(!range.contains(date(2024, 2, 1)));
        assert!(range.overlaps(&DateRange::new(date(2024, 1, 31), date(2024, 2, 5))));
        assert!(!range.overlaps(&DateRange::new(date(2024, 2, 1), date(2024, 2, 5))));
    }
}
