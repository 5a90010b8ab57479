use chrono::NaiveDate;
use common::{Cluster, DateRange};
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::customer::CustomerFeatureRecord;
use crate::transaction::Transaction;

/// The two source tables, immutable for the lifetime of the process.
///
/// Customer ids are expected to be unique in the features table. This is not
/// repaired: when an id repeats, lookups resolve to its first record.
#[derive(Debug, Clone, Default)]
pub struct SegmentationData {
    transactions: Vec<Transaction>,
    customers: Vec<CustomerFeatureRecord>,
    index: HashMap<String, usize>,
}

impl SegmentationData {
    pub fn new(transactions: Vec<Transaction>, customers: Vec<CustomerFeatureRecord>) -> Self {
        let mut index = HashMap::with_capacity(customers.len());
        let mut duplicates = 0usize;
        for (position, customer) in customers.iter().enumerate() {
            if index.contains_key(&customer.customer_id) {
                duplicates += 1;
                continue;
            }
            index.insert(customer.customer_id.clone(), position);
        }

        if duplicates > 0 {
            warn!(
                duplicates,
                "Customer features table contains repeated customer ids; first record wins"
            );
        }
        debug!(
            transactions = transactions.len(),
            customers = customers.len(),
            "Segmentation data assembled"
        );

        Self {
            transactions,
            customers,
            index,
        }
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn customers(&self) -> &[CustomerFeatureRecord] {
        &self.customers
    }

    pub fn customer(&self, customer_id: &str) -> Option<&CustomerFeatureRecord> {
        self.index
            .get(customer_id)
            .map(|&position| &self.customers[position])
    }

    /// Cluster of a customer, `None` when the customer has no feature record.
    pub fn cluster_of(&self, customer_id: &str) -> Option<Cluster> {
        self.customer(customer_id).map(|customer| customer.cluster)
    }

    /// Earliest and latest order day, `None` for an empty transactions table.
    pub fn date_bounds(&self) -> Option<DateRange> {
        let mut days = self.transactions.iter().map(Transaction::date);
        let first = days.next()?;
        let (min, max) = days.fold((first, first), |(min, max), day: NaiveDate| {
            (min.min(day), max.max(day))
        });
        Some(DateRange::new(min, max))
    }
}
