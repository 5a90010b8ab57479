use anyhow::Result;
use common::{Cluster, format_money, format_pct};
use compute::{FilteredView, summarize};
use tracing::{info, trace};

use crate::config::{Settings, initialize_app_state};

/// Loads both tables, which validates their schemas, then prints what was
/// found.
pub fn check(settings: Settings) -> Result<()> {
    trace!("Entering check function");
    let state = initialize_app_state(settings)?;
    let data = state.data.as_ref();

    let overall = FilteredView::overall(data);
    let summary = summarize(&overall);
    let unclustered = data
        .transactions()
        .iter()
        .filter(|transaction| data.cluster_of(transaction.customer_id()).is_none())
        .count();

    println!("Transactions:        {}", data.transactions().len());
    println!("Customer records:    {}", data.customers().len());
    match data.date_bounds() {
        Some(bounds) => println!("Order dates:         {} to {}", bounds.start, bounds.end),
        None => println!("Order dates:         none"),
    }
    for cluster in Cluster::ALL {
        let count = overall.customers_in(cluster).count();
        let share = (!data.customers().is_empty())
            .then(|| count as f64 / data.customers().len() as f64 * 100.0);
        println!(
            "Cluster {} {:<22}{} ({})",
            cluster,
            format!("({}):", cluster.label()),
            count,
            format_pct(share)
        );
    }
    println!(
        "Total revenue:       {}",
        format_money(summary.total_revenue, summary.currency.as_deref())
    );
    println!(
        "Average order value: {}",
        format_money(summary.avg_order_value, summary.currency.as_deref())
    );
    if unclustered > 0 {
        println!("Transactions without a customer record: {}", unclustered);
    }

    info!("Data check passed");
    Ok(())
}
