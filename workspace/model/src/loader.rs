//! Reads the two source tables from CSV with Polars and converts them into
//! typed records.
//!
//! Schema problems (a missing column, an unreadable amount, a cluster label
//! other than 0/1) are fatal. Missing feature values are kept as `NaN` and are
//! skipped by every aggregation downstream.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use common::Cluster;
use polars::prelude::*;
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, instrument, warn};

use crate::customer::CustomerFeatureRecord;
use crate::dataset::SegmentationData;
use crate::error::{ModelError, Result};
use crate::transaction::Transaction;

const TRANSACTIONS: &str = "transactions";
const CUSTOMER_FEATURES: &str = "customer features";

/// Columns the transactions table must provide.
pub const TRANSACTION_COLUMNS: [&str; 4] =
    ["customer_id", "order_date", "purchase_amount", "currency"];

/// Columns the clustered customer features table must provide.
pub const CUSTOMER_FEATURE_COLUMNS: [&str; 13] = [
    "customer_id",
    "recency",
    "frequency",
    "monetary",
    "purchase_variability",
    "first_purchase",
    "last_purchase",
    "tenure_days",
    "purchases_per_day",
    "spend_per_day",
    "recency_ratio",
    "customer_value_score",
    "cluster",
];

/// Loads both tables and assembles the read-only dataset.
#[instrument(fields(transactions = %transactions_path.display(), features = %features_path.display()))]
pub fn load_segmentation_data(
    transactions_path: &Path,
    features_path: &Path,
) -> Result<SegmentationData> {
    let transactions = load_transactions(transactions_path)?;
    let customers = load_customer_features(features_path)?;

    info!(
        "Loaded {} transactions and {} customer feature records",
        transactions.len(),
        customers.len()
    );

    Ok(SegmentationData::new(transactions, customers))
}

/// Reads the transactions CSV.
pub fn load_transactions(path: &Path) -> Result<Vec<Transaction>> {
    let df = read_table(TRANSACTIONS, path)?;
    transactions_from_frame(&df)
}

/// Reads the clustered customer features CSV.
pub fn load_customer_features(path: &Path) -> Result<Vec<CustomerFeatureRecord>> {
    let df = read_table(CUSTOMER_FEATURES, path)?;
    customers_from_frame(&df)
}

fn read_table(table: &'static str, path: &Path) -> Result<DataFrame> {
    if !path.is_file() {
        return Err(ModelError::NotFound {
            table,
            path: path.to_path_buf(),
        });
    }

    // Every column is read as text; ids keep leading zeros and numbers are
    // parsed per row below.
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    debug!(table, rows = df.height(), columns = df.width(), "CSV table read");
    Ok(df)
}

/// Converts a transactions DataFrame into records.
pub fn transactions_from_frame(df: &DataFrame) -> Result<Vec<Transaction>> {
    ensure_columns(df, TRANSACTIONS, &TRANSACTION_COLUMNS)?;

    let customer_ids = required_text(df, TRANSACTIONS, "customer_id")?;
    let order_dates = required_timestamps(df, TRANSACTIONS, "order_date")?;
    let currencies = required_text(df, TRANSACTIONS, "currency")?;
    let amounts = optional_text(df, TRANSACTIONS, "purchase_amount")?;

    let mut transactions = Vec::with_capacity(df.height());
    for (row, (((customer_id, order_date), currency), amount)) in customer_ids
        .into_iter()
        .zip(order_dates)
        .zip(currencies)
        .zip(amounts)
        .enumerate()
    {
        let raw = amount.ok_or_else(|| {
            invalid(TRANSACTIONS, "purchase_amount", row, "missing value".to_string())
        })?;
        let purchase_amount = parse_decimal(&raw).ok_or_else(|| {
            invalid(
                TRANSACTIONS,
                "purchase_amount",
                row,
                format!("'{}' is not a decimal amount", raw),
            )
        })?;
        if purchase_amount.is_sign_negative() && !purchase_amount.is_zero() {
            return Err(invalid(
                TRANSACTIONS,
                "purchase_amount",
                row,
                format!("amount {} is negative", purchase_amount),
            ));
        }

        transactions.push(Transaction::new(
            customer_id,
            order_date,
            purchase_amount,
            currency,
        ));
    }

    Ok(transactions)
}

/// Converts a clustered customer features DataFrame into records.
pub fn customers_from_frame(df: &DataFrame) -> Result<Vec<CustomerFeatureRecord>> {
    ensure_columns(df, CUSTOMER_FEATURES, &CUSTOMER_FEATURE_COLUMNS)?;

    let customer_ids = required_text(df, CUSTOMER_FEATURES, "customer_id")?;
    let first_purchases = required_timestamps(df, CUSTOMER_FEATURES, "first_purchase")?;
    let last_purchases = required_timestamps(df, CUSTOMER_FEATURES, "last_purchase")?;
    let clusters = required_clusters(df)?;

    let recency = feature_values(df, "recency")?;
    let frequency = feature_values(df, "frequency")?;
    let monetary = feature_values(df, "monetary")?;
    let purchase_variability = feature_values(df, "purchase_variability")?;
    let tenure_days = feature_values(df, "tenure_days")?;
    let purchases_per_day = feature_values(df, "purchases_per_day")?;
    let spend_per_day = feature_values(df, "spend_per_day")?;
    let recency_ratio = feature_values(df, "recency_ratio")?;
    let customer_value_score = feature_values(df, "customer_value_score")?;

    let customers = customer_ids
        .into_iter()
        .enumerate()
        .map(|(row, customer_id)| CustomerFeatureRecord {
            customer_id,
            recency: recency[row],
            frequency: frequency[row],
            monetary: monetary[row],
            purchase_variability: purchase_variability[row],
            first_purchase: first_purchases[row],
            last_purchase: last_purchases[row],
            tenure_days: tenure_days[row],
            purchases_per_day: purchases_per_day[row],
            spend_per_day: spend_per_day[row],
            recency_ratio: recency_ratio[row],
            customer_value_score: customer_value_score[row],
            cluster: clusters[row],
        })
        .collect();

    Ok(customers)
}

fn ensure_columns(df: &DataFrame, table: &'static str, columns: &[&'static str]) -> Result<()> {
    for &column in columns {
        if df.column(column).is_err() {
            return Err(ModelError::MissingColumn { table, column });
        }
    }
    Ok(())
}

fn invalid(table: &'static str, column: &'static str, row: usize, reason: String) -> ModelError {
    ModelError::InvalidValue {
        table,
        column,
        row,
        reason,
    }
}

fn optional_text(
    df: &DataFrame,
    table: &'static str,
    column: &'static str,
) -> Result<Vec<Option<String>>> {
    let casted = df
        .column(column)
        .map_err(|_| ModelError::MissingColumn { table, column })?
        .cast(&DataType::String)?;
    let values = casted.str()?;

    Ok(values
        .into_iter()
        .map(|value| {
            value
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        })
        .collect())
}

fn required_text(df: &DataFrame, table: &'static str, column: &'static str) -> Result<Vec<String>> {
    optional_text(df, table, column)?
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            value.ok_or_else(|| invalid(table, column, row, "missing value".to_string()))
        })
        .collect()
}

fn required_timestamps(
    df: &DataFrame,
    table: &'static str,
    column: &'static str,
) -> Result<Vec<NaiveDateTime>> {
    required_text(df, table, column)?
        .into_iter()
        .enumerate()
        .map(|(row, raw)| {
            parse_timestamp(&raw).ok_or_else(|| {
                invalid(table, column, row, format!("'{}' is not a date or timestamp", raw))
            })
        })
        .collect()
}

fn optional_numbers(
    df: &DataFrame,
    table: &'static str,
    column: &'static str,
) -> Result<Vec<Option<f64>>> {
    optional_text(df, table, column)?
        .into_iter()
        .enumerate()
        .map(|(row, value)| match value {
            None => Ok(None),
            Some(raw) => raw.parse::<f64>().map(Some).map_err(|_| {
                invalid(table, column, row, format!("'{}' is not a number", raw))
            }),
        })
        .collect()
}

fn feature_values(df: &DataFrame, column: &'static str) -> Result<Vec<f64>> {
    let values = optional_numbers(df, CUSTOMER_FEATURES, column)?;
    let missing = values.iter().filter(|value| value.is_none()).count();
    if missing > 0 {
        warn!(column, missing, "Feature column has missing values; they are ignored in aggregates");
    }
    Ok(values
        .into_iter()
        .map(|value| value.unwrap_or(f64::NAN))
        .collect())
}

fn required_clusters(df: &DataFrame) -> Result<Vec<Cluster>> {
    optional_numbers(df, CUSTOMER_FEATURES, "cluster")?
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            value
                .filter(|code| code.fract() == 0.0)
                .and_then(|code| Cluster::from_code(code as i64))
                .ok_or_else(|| {
                    invalid(
                        CUSTOMER_FEATURES,
                        "cluster",
                        row,
                        format!("expected cluster 0 or 1, found {:?}", value),
                    )
                })
        })
        .collect()
}

/// Parses an amount, accepting plain and scientific notation.
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

/// Parses the timestamp formats the upstream export produces.
///
/// Offsets in RFC 3339 values are dropped and the wall-clock time kept, so the
/// calendar day matches what was recorded.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.naive_local());
    }

    const FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];
    for format in FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed);
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|day| day.and_time(NaiveTime::MIN))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const FEATURES_HEADER: &str = "customer_id,recency,frequency,monetary,purchase_variability,first_purchase,last_purchase,tenure_days,purchases_per_day,spend_per_day,recency_ratio,customer_value_score,cluster";

    fn write_csv(lines: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_transactions() {
        let file = write_csv(&[
            "customer_id,order_date,purchase_amount,currency",
            "101,2023-01-05,19.99,USD",
            "101,2023-02-10 14:30:00,5,USD",
            "202,2023-03-01T08:00:00Z,120.5,USD",
        ]);

        let transactions = load_transactions(file.path()).unwrap();
        assert_eq!(transactions.len(), 3);

        assert_eq!(transactions[0].customer_id(), "101");
        assert_eq!(transactions[0].purchase_amount(), Decimal::new(1999, 2));
        assert_eq!(
            transactions[0].date(),
            NaiveDate::from_ymd_opt(2023, 1, 5).unwrap()
        );
        assert_eq!(transactions[1].purchase_amount(), Decimal::new(5, 0));
        assert_eq!(
            transactions[1].order_date(),
            NaiveDate::from_ymd_opt(2023, 2, 10)
                .unwrap()
                .and_hms_opt(14, 30, 0)
                .unwrap()
        );
        assert_eq!(transactions[2].currency(), "USD");
        assert_eq!(transactions[2].purchase_amount(), Decimal::new(1205, 1));
    }

    #[test]
    fn test_amount_types_are_not_inferred_from_leading_rows() {
        let mut lines = vec!["customer_id,order_date,purchase_amount,currency".to_string()];
        for _ in 0..150 {
            lines.push("101,2023-01-05,10,USD".to_string());
        }
        lines.push("101,2023-01-06,12.5,USD".to_string());
        let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
        let file = write_csv(&lines);

        let transactions = load_transactions(file.path()).unwrap();
        assert_eq!(transactions.len(), 151);
        assert_eq!(transactions[150].purchase_amount(), Decimal::new(125, 1));
    }

    #[test]
    fn test_customer_ids_keep_leading_zeros() {
        let file = write_csv(&[
            "customer_id,order_date,purchase_amount,currency",
            "00101,2023-01-05,19.99,USD",
            "101,2023-01-06,5,USD",
        ]);
        let transactions = load_transactions(file.path()).unwrap();
        assert_eq!(transactions[0].customer_id(), "00101");
        assert_eq!(transactions[1].customer_id(), "101");

        let features = write_csv(&[
            FEATURES_HEADER,
            "00101,30,4,250.5,12.1,2022-01-01,2022-12-01,334,0.012,0.75,0.08,0.61,1",
        ]);
        let customers = load_customer_features(features.path()).unwrap();
        assert_eq!(customers[0].customer_id, "00101");
    }

    #[test]
    fn test_non_numeric_feature_is_rejected() {
        let file = write_csv(&[
            FEATURES_HEADER,
            "101,soon,4,250.5,12.1,2022-01-01,2022-12-01,334,0.012,0.75,0.08,0.61,1",
        ]);

        let err = load_customer_features(file.path()).unwrap_err();
        assert!(matches!(
            err,
            ModelError::InvalidValue {
                column: "recency",
                row: 0,
                ..
            }
        ));
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let file = write_csv(&[
            "customer_id,order_date,currency",
            "101,2023-01-05,USD",
        ]);

        let err = load_transactions(file.path()).unwrap_err();
        assert!(matches!(
            err,
            ModelError::MissingColumn {
                column: "purchase_amount",
                ..
            }
        ));
    }

    #[test]
    fn test_negative_amount_is_rejected() {
        let file = write_csv(&[
            "customer_id,order_date,purchase_amount,currency",
            "101,2023-01-05,-3.50,USD",
        ]);

        let err = load_transactions(file.path()).unwrap_err();
        assert!(matches!(
            err,
            ModelError::InvalidValue {
                column: "purchase_amount",
                row: 0,
                ..
            }
        ));
    }

    #[test]
    fn test_unreadable_date_is_rejected() {
        let file = write_csv(&[
            "customer_id,order_date,purchase_amount,currency",
            "101,yesterday,3.50,USD",
        ]);

        let err = load_transactions(file.path()).unwrap_err();
        assert!(matches!(
            err,
            ModelError::InvalidValue {
                column: "order_date",
                ..
            }
        ));
    }

    #[test]
    fn test_load_customer_features() {
        let file = write_csv(&[
            FEATURES_HEADER,
            "101,30,4,250.5,12.1,2022-01-01,2022-12-01,334,0.012,0.75,0.08,0.61,1",
            "202,200,1,20,,2022-06-01,2022-06-01,0,1,20,1,0.05,0",
        ]);

        let customers = load_customer_features(file.path()).unwrap();
        assert_eq!(customers.len(), 2);

        assert_eq!(customers[0].customer_id, "101");
        assert_eq!(customers[0].cluster, Cluster::HighValueLoyalists);
        assert_eq!(customers[0].monetary, 250.5);
        assert_eq!(customers[0].frequency, 4.0);

        assert_eq!(customers[1].cluster, Cluster::OccasionalBuyers);
        assert!(customers[1].purchase_variability.is_nan());
        assert_eq!(
            customers[1].first_purchase.date(),
            NaiveDate::from_ymd_opt(2022, 6, 1).unwrap()
        );
    }

    #[test]
    fn test_unknown_cluster_is_fatal() {
        let file = write_csv(&[
            FEATURES_HEADER,
            "101,30,4,250.5,12.1,2022-01-01,2022-12-01,334,0.012,0.75,0.08,0.61,2",
        ]);

        let err = load_customer_features(file.path()).unwrap_err();
        assert!(matches!(
            err,
            ModelError::InvalidValue {
                column: "cluster",
                ..
            }
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = load_transactions(Path::new("/nonexistent/transactions.csv")).unwrap_err();
        assert!(matches!(err, ModelError::NotFound { .. }));
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = NaiveDate::from_ymd_opt(2023, 7, 4)
            .unwrap()
            .and_hms_opt(9, 15, 0)
            .unwrap();
        assert_eq!(parse_timestamp("2023-07-04 09:15:00"), Some(expected));
        assert_eq!(parse_timestamp("2023-07-04T09:15:00"), Some(expected));
        assert_eq!(parse_timestamp("2023-07-04 09:15"), Some(expected));
        assert_eq!(parse_timestamp("2023-07-04T09:15:00+02:00"), Some(expected));
        assert_eq!(
            parse_timestamp("2023-07-04"),
            NaiveDate::from_ymd_opt(2023, 7, 4).unwrap().and_hms_opt(0, 0, 0)
        );
        assert_eq!(parse_timestamp("07/04/2023"), None);
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("12.50"), Some(Decimal::new(1250, 2)));
        assert_eq!(parse_decimal("1e2"), Some(Decimal::new(100, 0)));
        assert_eq!(parse_decimal("abc"), None);
    }
}
