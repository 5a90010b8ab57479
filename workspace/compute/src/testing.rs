//! Small hand-built datasets shared by the compute tests and the HTTP tests
//! of the server crate.

use chrono::NaiveDate;
use common::Cluster;
use model::{CustomerFeatureRecord, SegmentationData, Transaction};
use rust_decimal::Decimal;

pub fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid fixture date")
}

/// Builds a customer record from its RFM values; the derived features are
/// filled in from them.
pub fn customer(
    id: &str,
    cluster: Cluster,
    recency: f64,
    frequency: f64,
    monetary: f64,
) -> CustomerFeatureRecord {
    let first = day(2024, 1, 1).and_hms_opt(0, 0, 0).expect("valid fixture time");
    let tenure_days = 90.0;
    CustomerFeatureRecord {
        customer_id: id.to_string(),
        recency,
        frequency,
        monetary,
        purchase_variability: monetary / 10.0,
        first_purchase: first,
        last_purchase: first + chrono::Duration::days(tenure_days as i64),
        tenure_days,
        purchases_per_day: frequency / tenure_days,
        spend_per_day: monetary / tenure_days,
        recency_ratio: recency / tenure_days,
        customer_value_score: monetary / 1000.0,
        cluster,
    }
}

fn purchase(id: &str, date: NaiveDate, cents: i64) -> Transaction {
    Transaction::on_day(id, date, Decimal::new(cents, 2), "USD")
}

/// Three customers with clusters {0, 0, 1} and monetary {100, 200, 300}, each
/// with a single purchase equal to their monetary value on consecutive days
/// from 2024-01-01.
pub fn three_customer_scenario() -> SegmentationData {
    let customers = vec![
        customer("c1", Cluster::OccasionalBuyers, 30.0, 1.0, 100.0),
        customer("c2", Cluster::OccasionalBuyers, 20.0, 1.0, 200.0),
        customer("c3", Cluster::HighValueLoyalists, 10.0, 1.0, 300.0),
    ];
    let transactions = vec![
        purchase("c1", day(2024, 1, 1), 10000),
        purchase("c2", day(2024, 1, 2), 20000),
        purchase("c3", day(2024, 1, 3), 30000),
    ];
    SegmentationData::new(transactions, customers)
}

/// Five purchases of 10, 20, 30, 40 and 50 on 2024-05-01 through 2024-05-05.
pub fn five_row_fixture() -> SegmentationData {
    let customers = vec![
        customer("x", Cluster::OccasionalBuyers, 4.0, 3.0, 90.0),
        customer("y", Cluster::HighValueLoyalists, 1.0, 2.0, 60.0),
    ];
    let transactions = vec![
        purchase("x", day(2024, 5, 1), 1000),
        purchase("y", day(2024, 5, 2), 2000),
        purchase("x", day(2024, 5, 3), 3000),
        purchase("y", day(2024, 5, 4), 4000),
        purchase("x", day(2024, 5, 5), 5000),
    ];
    SegmentationData::new(transactions, customers)
}

/// Four clustered customers over January to March 2024, plus a "ghost"
/// customer who has transactions but no feature record.
pub fn segmentation_scenario() -> SegmentationData {
    let customers = vec![
        customer("a", Cluster::OccasionalBuyers, 120.0, 2.0, 60.0),
        customer("b", Cluster::OccasionalBuyers, 90.0, 3.0, 90.0),
        customer("c", Cluster::HighValueLoyalists, 10.0, 3.0, 600.0),
        customer("d", Cluster::HighValueLoyalists, 20.0, 2.0, 400.0),
    ];
    let transactions = vec![
        purchase("a", day(2024, 1, 5), 2500),
        purchase("a", day(2024, 2, 10), 3500),
        purchase("b", day(2024, 1, 10), 3000),
        purchase("b", day(2024, 2, 20), 3000),
        purchase("b", day(2024, 3, 15), 3000),
        purchase("c", day(2024, 1, 10), 15000),
        purchase("c", day(2024, 2, 5), 15000),
        purchase("c", day(2024, 3, 1), 30000),
        purchase("d", day(2024, 1, 25), 20000),
        purchase("d", day(2024, 3, 20), 20000),
        purchase("ghost", day(2024, 2, 15), 5000),
    ];
    SegmentationData::new(transactions, customers)
}
