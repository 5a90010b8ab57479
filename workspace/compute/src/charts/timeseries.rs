use chrono::NaiveDate;
use common::{Cluster, TimeBucket, TimeseriesChart, TimeseriesMetric, TimeseriesPoint, TimeseriesSeries};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::collections::{BTreeMap, HashSet};
use tracing::trace;

use crate::filter::FilteredView;

#[derive(Default)]
struct Bucket<'a> {
    revenue: Decimal,
    orders: usize,
    customers: HashSet<&'a str>,
}

/// Revenue, distinct active customers and average order value per cluster and
/// time bucket. Buckets are labelled by their first day.
///
/// Transactions of customers without a feature record have no cluster and are
/// left out.
pub fn timeseries(view: &FilteredView<'_>, bucket: TimeBucket) -> TimeseriesChart {
    let mut buckets: BTreeMap<(Cluster, NaiveDate), Bucket<'_>> = BTreeMap::new();
    let mut skipped = 0usize;

    for transaction in view.transactions() {
        let Some(cluster) = view.cluster_of(transaction) else {
            skipped += 1;
            continue;
        };
        let entry = buckets
            .entry((cluster, bucket.start_of(transaction.date())))
            .or_default();
        entry.revenue += transaction.purchase_amount();
        entry.orders += 1;
        entry.customers.insert(transaction.customer_id());
    }
    trace!(buckets = buckets.len(), skipped, "Time series aggregated");

    let mut points: BTreeMap<Cluster, Vec<TimeseriesPoint>> = BTreeMap::new();
    for ((cluster, period), aggregate) in buckets {
        let revenue = aggregate.revenue.to_f64().unwrap_or(0.0);
        points.entry(cluster).or_default().push(TimeseriesPoint {
            period,
            revenue,
            active_customers: aggregate.customers.len(),
            avg_order_value: if aggregate.orders > 0 {
                revenue / aggregate.orders as f64
            } else {
                0.0
            },
            order_count: aggregate.orders,
        });
    }

    let series = points
        .into_iter()
        .map(|(cluster, points)| TimeseriesSeries {
            cluster,
            label: cluster.label().to_string(),
            color: cluster.color().to_string(),
            points,
        })
        .collect();

    TimeseriesChart {
        title: format!("Segment Trends ({})", bucket.label()),
        bucket,
        metrics: TimeseriesMetric::ALL.to_vec(),
        series,
    }
}
