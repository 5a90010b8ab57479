use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Aggregate statistics over a filtered view.
///
/// Every average is zero when its denominator is empty, so an empty view
/// produces an all-zero summary instead of an undefined value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct SummaryMetrics {
    /// Distinct customers in the view
    pub total_customers: usize,
    /// Transactions in the view
    pub total_transactions: usize,
    /// Sum of purchase amounts
    #[schema(value_type = String)]
    pub total_revenue: Decimal,
    /// Revenue divided by transaction count
    #[schema(value_type = String)]
    pub avg_order_value: Decimal,
    /// Mean `frequency` over the customer records in the view
    pub avg_purchase_frequency: f64,
    /// Currency code shared by every transaction in the view, if there is exactly one
    pub currency: Option<String>,
}

impl SummaryMetrics {
    pub fn is_empty(&self) -> bool {
        self.total_customers == 0 && self.total_transactions == 0
    }
}

/// Summary of the filtered view next to its share of / deviation from the whole dataset.
///
/// Percentages are `None` (shown as "N/A") when the overall value they are
/// relative to is zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct SummaryComparison {
    pub metrics: SummaryMetrics,
    pub overall: SummaryMetrics,
    pub customer_share_pct: Option<f64>,
    pub revenue_share_pct: Option<f64>,
    pub avg_order_value_delta_pct: Option<f64>,
    pub avg_frequency_delta_pct: Option<f64>,
}
