//! Filter controller: turns the raw query inputs into a `FilterSelection` and
//! applies it to the source tables.

use chrono::{NaiveDate, Utc};
use common::{Cluster, DateRange, FilterSelection, Segment};
use model::{CustomerFeatureRecord, SegmentationData, Transaction};
use std::collections::HashSet;
use tracing::{debug, instrument, trace};

use crate::error::FilterError;

/// Raw, unparsed filter inputs as they arrive from a form or query string.
/// Empty strings count as absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectionRequest<'q> {
    pub segment: Option<&'q str>,
    pub start_date: Option<&'q str>,
    pub end_date: Option<&'q str>,
}

/// A selection ready to be applied, plus messages about any adjustment made
/// to the requested dates.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSelection {
    pub selection: FilterSelection,
    pub notices: Vec<String>,
}

impl ResolvedSelection {
    pub fn new(selection: FilterSelection) -> Self {
        Self {
            selection,
            notices: Vec::new(),
        }
    }
}

/// The selection the dashboard opens with: every segment over the full order
/// history. An empty dataset gets today..today.
pub fn default_selection(data: &SegmentationData) -> FilterSelection {
    FilterSelection::new(Segment::All, date_bounds_or_today(data))
}

fn date_bounds_or_today(data: &SegmentationData) -> DateRange {
    data.date_bounds().unwrap_or_else(|| {
        let today = Utc::now().date_naive();
        DateRange::new(today, today)
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn parse_date(field: &'static str, value: Option<&str>) -> Result<Option<NaiveDate>, FilterError> {
    non_empty(value)
        .map(|raw| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| FilterError::InvalidDate {
                field,
                value: raw.to_string(),
            })
        })
        .transpose()
}

/// Resolves raw inputs against the loaded data.
///
/// Missing dates fall back to the data's first/last order day. A range that
/// overlaps the data but reaches past it is clamped to it; a range that misses
/// it entirely is kept and yields an empty view. Both cases add a notice.
pub fn resolve_selection(
    data: &SegmentationData,
    request: &SelectionRequest<'_>,
) -> Result<ResolvedSelection, FilterError> {
    let segment = match non_empty(request.segment) {
        Some(raw) => raw.parse::<Segment>()?,
        None => Segment::All,
    };

    let start = parse_date("start_date", request.start_date)?;
    let end = parse_date("end_date", request.end_date)?;

    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            return Err(FilterError::InvertedDateRange { start, end });
        }
    }

    let bounds = date_bounds_or_today(data);
    let start = start.unwrap_or_else(|| end.map_or(bounds.start, |end| end.min(bounds.start)));
    let end = end.unwrap_or_else(|| bounds.end.max(start));

    let mut notices = Vec::new();
    let mut range = DateRange::new(start, end);

    if data.date_bounds().is_some() {
        if range.overlaps(&bounds) {
            let clamped = DateRange::new(range.start.max(bounds.start), range.end.min(bounds.end));
            if clamped != range {
                notices.push(format!(
                    "Date range adjusted to the available data: {} to {}",
                    clamped.start, clamped.end
                ));
                range = clamped;
            }
        } else {
            notices.push(format!(
                "No transactions between {} and {}; data covers {} to {}",
                range.start, range.end, bounds.start, bounds.end
            ));
        }
    }

    debug!(%segment, start = %range.start, end = %range.end, "Selection resolved");

    Ok(ResolvedSelection {
        selection: FilterSelection::new(segment, range),
        notices,
    })
}

/// The subset of both tables that matches a selection. Borrowed from the
/// loaded data and dropped after the request.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    data: &'a SegmentationData,
    transactions: Vec<&'a Transaction>,
    customers: Vec<&'a CustomerFeatureRecord>,
}

impl<'a> FilteredView<'a> {
    /// The whole dataset, unfiltered.
    pub fn overall(data: &'a SegmentationData) -> Self {
        Self {
            data,
            transactions: data.transactions().iter().collect(),
            customers: data.customers().iter().collect(),
        }
    }

    pub fn transactions(&self) -> &[&'a Transaction] {
        &self.transactions
    }

    pub fn customers(&self) -> &[&'a CustomerFeatureRecord] {
        &self.customers
    }

    /// Cluster of the customer who placed a transaction, if they have a record.
    pub fn cluster_of(&self, transaction: &Transaction) -> Option<Cluster> {
        self.data.cluster_of(transaction.customer_id())
    }

    /// Customer records of one cluster.
    pub fn customers_in(&self, cluster: Cluster) -> impl Iterator<Item = &'a CustomerFeatureRecord> + '_ {
        self.customers
            .iter()
            .copied()
            .filter(move |customer| customer.cluster == cluster)
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty() && self.customers.is_empty()
    }
}

/// Applies a selection.
///
/// Transactions are kept when their day lies in the range (inclusive) and
/// their customer matches the segment. Customer records are kept when their
/// cluster matches and they ordered at least once in the range.
#[instrument(skip(data), fields(segment = %selection.segment))]
pub fn apply_filter<'a>(data: &'a SegmentationData, selection: &FilterSelection) -> FilteredView<'a> {
    let range = selection.date_range;
    let segment = selection.segment;

    let transactions: Vec<&Transaction> = data
        .transactions()
        .iter()
        .filter(|transaction| range.contains(transaction.date()))
        .filter(|transaction| segment.matches(data.cluster_of(transaction.customer_id())))
        .collect();

    let active: HashSet<&str> = transactions
        .iter()
        .map(|transaction| transaction.customer_id())
        .collect();

    let customers: Vec<&CustomerFeatureRecord> = data
        .customers()
        .iter()
        .filter(|customer| segment.matches(Some(customer.cluster)))
        .filter(|customer| active.contains(customer.customer_id.as_str()))
        .collect();

    trace!(
        transactions = transactions.len(),
        customers = customers.len(),
        "Filter applied"
    );

    FilteredView {
        data,
        transactions,
        customers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{day, segmentation_scenario, three_customer_scenario};

    fn request<'q>(
        segment: Option<&'q str>,
        start: Option<&'q str>,
        end: Option<&'q str>,
    ) -> SelectionRequest<'q> {
        SelectionRequest {
            segment,
            start_date: start,
            end_date: end,
        }
    }

    #[test]
    fn test_segment_filter_keeps_only_matching_cluster() {
        let data = segmentation_scenario();
        let bounds = data.date_bounds().unwrap();

        for cluster in Cluster::ALL {
            let selection = FilterSelection::new(Segment::Only(cluster), bounds);
            let view = apply_filter(&data, &selection);

            assert!(!view.customers().is_empty());
            assert!(view.customers().iter().all(|c| c.cluster == cluster));
            assert!(
                view.transactions()
                    .iter()
                    .all(|t| data.cluster_of(t.customer_id()) == Some(cluster))
            );
        }
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let data = segmentation_scenario();
        let range = DateRange::new(day(2024, 1, 10), day(2024, 2, 10));
        let view = apply_filter(&data, &FilterSelection::new(Segment::All, range));

        assert!(!view.transactions().is_empty());
        assert!(view.transactions().iter().all(|t| range.contains(t.date())));
        assert!(view.transactions().iter().any(|t| t.date() == range.start));
        assert!(view.transactions().iter().any(|t| t.date() == range.end));
    }

    #[test]
    fn test_segment_all_includes_customers_without_record() {
        let data = segmentation_scenario();
        let bounds = data.date_bounds().unwrap();

        let all = apply_filter(&data, &FilterSelection::new(Segment::All, bounds));
        assert!(all.transactions().iter().any(|t| t.customer_id() == "ghost"));

        let loyal = apply_filter(
            &data,
            &FilterSelection::new(Segment::Only(Cluster::HighValueLoyalists), bounds),
        );
        assert!(loyal.transactions().iter().all(|t| t.customer_id() != "ghost"));
    }

    #[test]
    fn test_customers_need_a_transaction_in_range() {
        let data = three_customer_scenario();
        let range = DateRange::new(day(2024, 1, 1), day(2024, 1, 1));
        let view = apply_filter(&data, &FilterSelection::new(Segment::All, range));

        assert_eq!(view.customers().len(), 1);
        assert_eq!(view.customers()[0].customer_id, "c1");
    }

    #[test]
    fn test_range_outside_data_is_empty() {
        let data = segmentation_scenario();
        let range = DateRange::new(day(2030, 1, 1), day(2030, 12, 31));
        let view = apply_filter(&data, &FilterSelection::new(Segment::All, range));

        assert!(view.is_empty());
    }

    #[test]
    fn test_filter_is_idempotent() {
        let data = segmentation_scenario();
        let selection = FilterSelection::new(
            Segment::Only(Cluster::OccasionalBuyers),
            DateRange::new(day(2024, 1, 5), day(2024, 3, 1)),
        );

        let first = apply_filter(&data, &selection);
        let second = apply_filter(&data, &selection);
        assert_eq!(first.transactions(), second.transactions());
        assert_eq!(first.customers(), second.customers());
    }

    #[test]
    fn test_resolve_defaults_to_data_bounds() {
        let data = segmentation_scenario();
        let resolved = resolve_selection(&data, &SelectionRequest::default()).unwrap();

        assert_eq!(resolved.selection, default_selection(&data));
        assert!(resolved.notices.is_empty());
    }

    #[test]
    fn test_resolve_parses_segment_and_dates() {
        let data = segmentation_scenario();
        let resolved = resolve_selection(
            &data,
            &request(Some("1"), Some("2024-01-10"), Some("2024-02-10")),
        )
        .unwrap();

        assert_eq!(
            resolved.selection.segment,
            Segment::Only(Cluster::HighValueLoyalists)
        );
        assert_eq!(
            resolved.selection.date_range,
            DateRange::new(day(2024, 1, 10), day(2024, 2, 10))
        );
    }

    #[test]
    fn test_resolve_treats_empty_strings_as_missing() {
        let data = segmentation_scenario();
        let resolved = resolve_selection(&data, &request(Some(""), Some(""), Some(" "))).unwrap();

        assert_eq!(resolved.selection, default_selection(&data));
    }

    #[test]
    fn test_resolve_rejects_inverted_range() {
        let data = segmentation_scenario();
        let err = resolve_selection(&data, &request(None, Some("2024-03-01"), Some("2024-01-01")))
            .unwrap_err();

        assert!(matches!(err, FilterError::InvertedDateRange { .. }));
        assert_eq!(err.code(), "INVALID_DATE_RANGE");
    }

    #[test]
    fn test_resolve_rejects_bad_input() {
        let data = segmentation_scenario();

        let err = resolve_selection(&data, &request(Some("2"), None, None)).unwrap_err();
        assert_eq!(err, FilterError::UnknownSegment("2".to_string()));
        assert_eq!(err.code(), "INVALID_SEGMENT");

        let err = resolve_selection(&data, &request(None, Some("01/02/2024"), None)).unwrap_err();
        assert!(matches!(err, FilterError::InvalidDate { field: "start_date", .. }));
    }

    #[test]
    fn test_resolve_clamps_overlapping_range() {
        let data = segmentation_scenario();
        let bounds = data.date_bounds().unwrap();
        let resolved = resolve_selection(
            &data,
            &request(None, Some("2000-01-01"), Some("2024-02-10")),
        )
        .unwrap();

        assert_eq!(
            resolved.selection.date_range,
            DateRange::new(bounds.start, day(2024, 2, 10))
        );
        assert_eq!(resolved.notices.len(), 1);
    }

    #[test]
    fn test_resolve_keeps_disjoint_range_with_notice() {
        let data = segmentation_scenario();
        let resolved = resolve_selection(&data, &request(None, Some("2031-01-01"), None)).unwrap();

        assert_eq!(resolved.selection.date_range.start, day(2031, 1, 1));
        assert_eq!(resolved.selection.date_range.end, day(2031, 1, 1));
        assert_eq!(resolved.notices.len(), 1);
        assert!(apply_filter(&data, &resolved.selection).is_empty());
    }

    #[test]
    fn test_empty_dataset_selects_today() {
        let data = SegmentationData::default();
        let today = Utc::now().date_naive();
        let selection = default_selection(&data);

        assert_eq!(selection.date_range, DateRange::new(today, today));
        assert!(apply_filter(&data, &selection).is_empty());
    }
}
