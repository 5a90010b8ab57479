//! Metrics summarizer: the four metric cards, and how the filtered view
//! compares to the whole dataset.

use common::{SummaryComparison, SummaryMetrics};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

use crate::charts::stats::mean;
use crate::filter::FilteredView;

/// Summarizes a filtered view. Averages over an empty denominator are zero.
///
/// Customers are counted by id over both the transactions and the feature
/// records in the view, so a buyer without a feature record still counts.
pub fn summarize(view: &FilteredView<'_>) -> SummaryMetrics {
    let total_customers = view
        .transactions()
        .iter()
        .map(|transaction| transaction.customer_id())
        .chain(
            view.customers()
                .iter()
                .map(|customer| customer.customer_id.as_str()),
        )
        .collect::<HashSet<_>>()
        .len();

    let total_transactions = view.transactions().len();
    let total_revenue: Decimal = view
        .transactions()
        .iter()
        .map(|transaction| transaction.purchase_amount())
        .sum();

    let avg_order_value = if total_transactions > 0 {
        total_revenue / Decimal::from(total_transactions)
    } else {
        Decimal::ZERO
    };

    let avg_purchase_frequency =
        mean(view.customers().iter().map(|customer| customer.frequency)).unwrap_or(0.0);

    let currencies: BTreeSet<&str> = view
        .transactions()
        .iter()
        .map(|transaction| transaction.currency())
        .collect();
    let currency = match currencies.len() {
        1 => currencies.into_iter().next().map(str::to_string),
        _ => None,
    };

    debug!(
        total_customers,
        total_transactions,
        %total_revenue,
        "Summary computed"
    );

    SummaryMetrics {
        total_customers,
        total_transactions,
        total_revenue,
        avg_order_value,
        avg_purchase_frequency,
        currency,
    }
}

/// Summarizes `view` and relates it to `overall`, normally the unfiltered data.
pub fn compare_to_overall(view: &FilteredView<'_>, overall: &FilteredView<'_>) -> SummaryComparison {
    let metrics = summarize(view);
    let overall = summarize(overall);

    SummaryComparison {
        customer_share_pct: share_pct(
            metrics.total_customers as f64,
            overall.total_customers as f64,
        ),
        revenue_share_pct: decimal_share_pct(metrics.total_revenue, overall.total_revenue),
        avg_order_value_delta_pct: delta_pct(
            metrics.avg_order_value.to_f64().unwrap_or(0.0),
            overall.avg_order_value.to_f64().unwrap_or(0.0),
        ),
        avg_frequency_delta_pct: delta_pct(
            metrics.avg_purchase_frequency,
            overall.avg_purchase_frequency,
        ),
        metrics,
        overall,
    }
}

fn share_pct(part: f64, whole: f64) -> Option<f64> {
    (whole != 0.0).then(|| part / whole * 100.0)
}

fn decimal_share_pct(part: Decimal, whole: Decimal) -> Option<f64> {
    if whole.is_zero() {
        return None;
    }
    (part / whole * Decimal::ONE_HUNDRED).to_f64()
}

fn delta_pct(value: f64, base: f64) -> Option<f64> {
    (base != 0.0 && base.is_finite()).then(|| (value - base) / base * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::apply_filter;
    use crate::testing::{day, five_row_fixture, segmentation_scenario, three_customer_scenario};
    use common::{Cluster, DateRange, FilterSelection, Segment};

    #[test]
    fn test_single_cluster_scenario() {
        let data = three_customer_scenario();
        let selection = FilterSelection::new(
            Segment::Only(Cluster::HighValueLoyalists),
            data.date_bounds().unwrap(),
        );
        let summary = summarize(&apply_filter(&data, &selection));

        assert_eq!(summary.total_customers, 1);
        assert_eq!(summary.total_revenue, Decimal::new(300, 0));
        assert_eq!(summary.avg_order_value, Decimal::new(300, 0));
        assert_eq!(summary.currency.as_deref(), Some("USD"));
    }

    #[test]
    fn test_average_order_value_over_sub_range() {
        let data = five_row_fixture();
        let selection =
            FilterSelection::new(Segment::All, DateRange::new(day(2024, 5, 2), day(2024, 5, 4)));
        let summary = summarize(&apply_filter(&data, &selection));

        assert_eq!(summary.total_transactions, 3);
        assert_eq!(summary.total_revenue, Decimal::new(90, 0));
        assert_eq!(summary.avg_order_value, Decimal::new(30, 0));
        assert_eq!(summary.total_customers, 2);
        assert_eq!(summary.avg_purchase_frequency, 2.5);
    }

    #[test]
    fn test_empty_view_summarizes_to_zero() {
        let data = segmentation_scenario();
        let selection =
            FilterSelection::new(Segment::All, DateRange::new(day(2030, 1, 1), day(2030, 1, 2)));
        let summary = summarize(&apply_filter(&data, &selection));

        assert_eq!(summary.total_customers, 0);
        assert_eq!(summary.total_revenue, Decimal::ZERO);
        assert_eq!(summary.avg_order_value, Decimal::ZERO);
        assert_eq!(summary.avg_purchase_frequency, 0.0);
        assert_eq!(summary.currency, None);
        assert!(summary.is_empty());
    }

    #[test]
    fn test_buyers_without_feature_record_are_counted() {
        let data = segmentation_scenario();
        let selection =
            FilterSelection::new(Segment::All, DateRange::new(day(2024, 2, 15), day(2024, 2, 15)));
        let view = apply_filter(&data, &selection);
        assert!(view.customers().is_empty());

        let summary = summarize(&view);
        assert_eq!(summary.total_customers, 1);
        assert_eq!(summary.total_transactions, 1);
        assert_eq!(summary.total_revenue, Decimal::new(50, 0));
        assert_eq!(summary.avg_order_value, Decimal::new(50, 0));
        // frequency comes from feature records only
        assert_eq!(summary.avg_purchase_frequency, 0.0);
    }

    #[test]
    fn test_no_customers_means_no_order_value() {
        let data = segmentation_scenario();
        let bounds = data.date_bounds().unwrap();
        let mut day_cursor = bounds.start;
        while day_cursor <= bounds.end {
            for segment in Segment::ALL {
                let selection =
                    FilterSelection::new(segment, DateRange::new(day_cursor, day_cursor));
                let summary = summarize(&apply_filter(&data, &selection));
                if summary.total_customers == 0 {
                    assert_eq!(summary.avg_order_value, Decimal::ZERO);
                    assert_eq!(summary.avg_purchase_frequency, 0.0);
                }
            }
            day_cursor = day_cursor.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_summary_is_idempotent() {
        let data = segmentation_scenario();
        let selection = FilterSelection::new(
            Segment::Only(Cluster::OccasionalBuyers),
            data.date_bounds().unwrap(),
        );

        let first = summarize(&apply_filter(&data, &selection));
        let second = summarize(&apply_filter(&data, &selection));
        assert_eq!(first, second);
    }

    #[test]
    fn test_compare_to_overall() {
        let data = three_customer_scenario();
        let selection = FilterSelection::new(
            Segment::Only(Cluster::HighValueLoyalists),
            data.date_bounds().unwrap(),
        );
        let view = apply_filter(&data, &selection);
        let comparison = compare_to_overall(&view, &FilteredView::overall(&data));

        assert_eq!(comparison.overall.total_customers, 3);
        assert_eq!(comparison.overall.total_revenue, Decimal::new(600, 0));
        assert_eq!(comparison.revenue_share_pct, Some(50.0));
        let share = comparison.customer_share_pct.unwrap();
        assert!((share - 100.0 / 3.0).abs() < 1e-9);
        // 300 against an overall AOV of 200
        assert_eq!(comparison.avg_order_value_delta_pct, Some(50.0));
        assert_eq!(comparison.avg_frequency_delta_pct, Some(0.0));
    }

    #[test]
    fn test_compare_against_empty_dataset() {
        let data = model::SegmentationData::default();
        let overall = FilteredView::overall(&data);
        let comparison = compare_to_overall(&overall, &overall);

        assert_eq!(comparison.customer_share_pct, None);
        assert_eq!(comparison.revenue_share_pct, None);
        assert_eq!(comparison.avg_order_value_delta_pct, None);
        assert_eq!(comparison.avg_frequency_delta_pct, None);
    }
}
