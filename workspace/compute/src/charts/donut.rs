use common::{Cluster, SegmentDonut, SegmentSlice};
use std::collections::HashSet;

use crate::filter::FilteredView;

/// Customers per cluster with their share of the view. Clusters without
/// customers get no slice.
pub fn segment_donut(view: &FilteredView<'_>) -> SegmentDonut {
    let counts: Vec<(Cluster, usize)> = Cluster::ALL
        .into_iter()
        .map(|cluster| {
            let ids: HashSet<&str> = view
                .customers_in(cluster)
                .map(|customer| customer.customer_id.as_str())
                .collect();
            (cluster, ids.len())
        })
        .collect();
    let total: usize = counts.iter().map(|(_, count)| count).sum();

    let slices = counts
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|(cluster, count)| SegmentSlice {
            cluster,
            label: cluster.label().to_string(),
            color: cluster.color().to_string(),
            count,
            percentage: count as f64 / total as f64 * 100.0,
        })
        .collect();

    SegmentDonut {
        title: "Customer Segment Distribution".to_string(),
        hole: 0.4,
        slices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FilteredView, apply_filter};
    use crate::testing::{day, three_customer_scenario};
    use common::{DateRange, FilterSelection, Segment};

    #[test]
    fn test_donut_counts_and_percentages() {
        let data = three_customer_scenario();
        let donut = segment_donut(&FilteredView::overall(&data));

        assert_eq!(donut.hole, 0.4);
        assert_eq!(donut.slices.len(), 2);
        assert_eq!(donut.slices[0].cluster, Cluster::OccasionalBuyers);
        assert_eq!(donut.slices[0].count, 2);
        assert_eq!(donut.slices[1].count, 1);

        let total: f64 = donut.slices.iter().map(|slice| slice.percentage).sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_donut_skips_absent_cluster() {
        let data = three_customer_scenario();
        let selection = FilterSelection::new(
            Segment::Only(Cluster::HighValueLoyalists),
            data.date_bounds().unwrap(),
        );
        let donut = segment_donut(&apply_filter(&data, &selection));

        assert_eq!(donut.slices.len(), 1);
        assert_eq!(donut.slices[0].percentage, 100.0);
    }

    #[test]
    fn test_donut_empty_view() {
        let data = three_customer_scenario();
        let selection =
            FilterSelection::new(Segment::All, DateRange::new(day(2030, 1, 1), day(2030, 1, 1)));

        assert!(segment_donut(&apply_filter(&data, &selection)).is_empty());
    }
}
