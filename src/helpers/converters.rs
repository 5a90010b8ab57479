use common::{CustomerRow, DatasetInfo, FilterSelection, RawView, TransactionRow};
use compute::FilteredView;
use model::{CustomerFeatureRecord, SegmentationData, Transaction};

/// Convert a transaction into its API row.
pub fn transaction_row(transaction: &Transaction) -> TransactionRow {
    TransactionRow {
        customer_id: transaction.customer_id().to_string(),
        order_date: transaction.order_date(),
        purchase_amount: transaction.purchase_amount(),
        currency: transaction.currency().to_string(),
    }
}

/// Convert a customer feature record into its API row.
pub fn customer_row(customer: &CustomerFeatureRecord) -> CustomerRow {
    CustomerRow {
        customer_id: customer.customer_id.clone(),
        recency: customer.recency,
        frequency: customer.frequency,
        monetary: customer.monetary,
        purchase_variability: customer.purchase_variability,
        first_purchase: customer.first_purchase,
        last_purchase: customer.last_purchase,
        tenure_days: customer.tenure_days,
        purchases_per_day: customer.purchases_per_day,
        spend_per_day: customer.spend_per_day,
        recency_ratio: customer.recency_ratio,
        customer_value_score: customer.customer_value_score,
        cluster: customer.cluster,
    }
}

/// The filtered tables as returned by the raw data endpoint.
pub fn raw_view(view: &FilteredView<'_>, selection: FilterSelection) -> RawView {
    RawView {
        selection,
        customers: view.customers().iter().map(|c| customer_row(c)).collect(),
        transactions: view
            .transactions()
            .iter()
            .map(|t| transaction_row(t))
            .collect(),
    }
}

/// Row counts and date bounds of the loaded data.
pub fn dataset_info(data: &SegmentationData) -> DatasetInfo {
    let bounds = data.date_bounds();
    DatasetInfo {
        transactions: data.transactions().len(),
        customers: data.customers().len(),
        first_order: bounds.map(|range| range.start),
        last_order: bounds.map(|range| range.end),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use compute::apply_filter;
    use compute::testing::{day, three_customer_scenario};
    use common::{Cluster, DateRange, Segment};
    use rust_decimal::Decimal;

    #[test]
    fn test_raw_view_rows() {
        let data = three_customer_scenario();
        let selection = FilterSelection::new(
            Segment::Only(Cluster::HighValueLoyalists),
            DateRange::new(day(2024, 1, 1), day(2024, 1, 31)),
        );
        let view = apply_filter(&data, &selection);
        let raw = raw_view(&view, selection);

        assert_eq!(raw.selection, selection);
        assert_eq!(raw.customers.len(), 1);
        assert_eq!(raw.customers[0].customer_id, "c3");
        assert_eq!(raw.customers[0].cluster, Cluster::HighValueLoyalists);
        assert_eq!(raw.transactions.len(), 1);
        assert_eq!(raw.transactions[0].purchase_amount, Decimal::new(300, 0));
    }

    #[test]
    fn test_dataset_info() {
        let info = dataset_info(&three_customer_scenario());

        assert_eq!(info.transactions, 3);
        assert_eq!(info.customers, 3);
        assert_eq!(info.first_order, Some(day(2024, 1, 1)));
        assert_eq!(info.last_order, Some(day(2024, 1, 3)));

        let empty = dataset_info(&SegmentationData::default());
        assert_eq!(empty.first_order, None);
    }
}
