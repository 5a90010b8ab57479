use chrono::NaiveDateTime;
use common::{Cluster, Feature};

/// Per-customer features computed upstream, with the cluster label assigned
/// by the segmentation model.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerFeatureRecord {
    pub customer_id: String,
    pub recency: f64,
    pub frequency: f64,
    pub monetary: f64,
    pub purchase_variability: f64,
    pub first_purchase: NaiveDateTime,
    pub last_purchase: NaiveDateTime,
    pub tenure_days: f64,
    pub purchases_per_day: f64,
    pub spend_per_day: f64,
    pub recency_ratio: f64,
    pub customer_value_score: f64,
    pub cluster: Cluster,
}

impl CustomerFeatureRecord {
    /// Value of a numeric feature column.
    pub fn feature(&self, feature: Feature) -> f64 {
        match feature {
            Feature::Monetary => self.monetary,
            Feature::Frequency => self.frequency,
            Feature::Recency => self.recency,
            Feature::PurchaseVariability => self.purchase_variability,
            Feature::TenureDays => self.tenure_days,
            Feature::PurchasesPerDay => self.purchases_per_day,
            Feature::SpendPerDay => self.spend_per_day,
            Feature::RecencyRatio => self.recency_ratio,
            Feature::CustomerValueScore => self.customer_value_score,
        }
    }
}
