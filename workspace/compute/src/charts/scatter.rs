use common::{Cluster, RfmScatter, ScatterPoint, ScatterSeries};

use crate::filter::FilteredView;

/// Monetary against frequency, one series per cluster present in the view.
/// Customers with a missing value are left out.
pub fn rfm_scatter(view: &FilteredView<'_>) -> RfmScatter {
    let series = Cluster::ALL
        .into_iter()
        .filter_map(|cluster| {
            let points: Vec<ScatterPoint> = view
                .customers_in(cluster)
                .filter(|customer| customer.frequency.is_finite() && customer.monetary.is_finite())
                .map(|customer| ScatterPoint {
                    customer_id: customer.customer_id.clone(),
                    frequency: customer.frequency,
                    monetary: customer.monetary,
                })
                .collect();
            (!points.is_empty()).then(|| ScatterSeries {
                cluster,
                label: cluster.label().to_string(),
                color: cluster.color().to_string(),
                points,
            })
        })
        .collect();

    RfmScatter {
        title: "RFM Analysis".to_string(),
        x_label: "Purchase Frequency".to_string(),
        y_label: "Total Spend".to_string(),
        series,
    }
}
