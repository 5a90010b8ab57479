//! View composer: lays the dashboard out as one HTML document.
//!
//! Charts are drawn in the browser by plotly.js from the chart descriptions,
//! which are embedded in the page as JSON.

use common::{
    DashboardData, Feature, FilterOptions, OptionEntry, SummaryComparison, TimeBucket,
    TimeseriesMetric, format_money, format_pct,
};
use serde::Serialize;
use tracing::error;

const PLOTLY_JS: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";
const DASHBOARD_CSS: &str = include_str!("view/dashboard.css");
const DASHBOARD_JS: &str = include_str!("view/dashboard.js");

/// Everything the page shows.
#[derive(Debug, Clone)]
pub struct DashboardPage {
    pub dashboard: DashboardData,
    pub filters: FilterOptions,
    pub feature: Feature,
    pub bucket: TimeBucket,
    pub bins: usize,
}

#[derive(Serialize)]
struct EmbeddedCharts<'a> {
    charts: &'a common::DashboardCharts,
    timeseries_metrics: Vec<EmbeddedMetric>,
}

#[derive(Serialize)]
struct EmbeddedMetric {
    key: TimeseriesMetric,
    title: &'static str,
    axis_label: &'static str,
}

/// Escape text for use in HTML content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Serialize a value for a `<script type="application/json">` block.
fn embed_json<T: Serialize>(value: &T) -> String {
    match serde_json::to_string(value) {
        Ok(json) => json.replace("</", "<\\/"),
        Err(e) => {
            error!("Failed to serialize chart data: {}", e);
            "null".to_string()
        }
    }
}

fn select(name: &str, label: &str, options: &[OptionEntry], selected: &str) -> String {
    let mut html = format!(
        "<label class=\"field\"><span>{}</span><select name=\"{}\">",
        escape_html(label),
        name
    );
    for option in options {
        let marker = if option.value == selected { " selected" } else { "" };
        html.push_str(&format!(
            "<option value=\"{}\"{}>{}</option>",
            escape_html(&option.value),
            marker,
            escape_html(&option.label)
        ));
    }
    html.push_str("</select></label>");
    html
}

fn filter_form(page: &DashboardPage) -> String {
    let selection = &page.dashboard.selection;
    let (min, max) = match page.filters.date_bounds {
        Some(bounds) => (
            format!(" min=\"{}\"", bounds.start),
            format!(" max=\"{}\"", bounds.end),
        ),
        None => (String::new(), String::new()),
    };

    let mut html = String::from("<form class=\"filters\" method=\"get\" action=\"/\">");
    html.push_str(&select(
        "segment",
        "Customer Segment",
        &page.filters.segments,
        &selection.segment.to_string(),
    ));
    html.push_str(&format!(
        "<label class=\"field\"><span>Start Date</span><input type=\"date\" name=\"start_date\" value=\"{}\"{}{}></label>",
        selection.date_range.start, min, max
    ));
    html.push_str(&format!(
        "<label class=\"field\"><span>End Date</span><input type=\"date\" name=\"end_date\" value=\"{}\"{}{}></label>",
        selection.date_range.end, min, max
    ));
    html.push_str(&select(
        "feature",
        "Distribution Feature",
        &page.filters.features,
        page.feature.column(),
    ));
    html.push_str(&select(
        "bucket",
        "Time Bucket",
        &page.filters.buckets,
        page.bucket.as_str(),
    ));
    html.push_str(&format!(
        "<label class=\"field\"><span>Bins</span><input type=\"number\" name=\"bins\" min=\"2\" max=\"200\" value=\"{}\"></label>",
        page.bins
    ));
    html.push_str("<button type=\"submit\">Apply</button></form>");
    html
}

fn metric_card(title: &str, value: &str, delta: &str, delta_label: &str) -> String {
    format!(
        "<div class=\"card\"><div class=\"card-title\">{}</div><div class=\"card-value\">{}</div><div class=\"card-delta\">{} {}</div></div>",
        escape_html(title),
        escape_html(value),
        escape_html(delta),
        escape_html(delta_label)
    )
}

fn metric_cards(summary: &SummaryComparison) -> String {
    let metrics = &summary.metrics;
    let currency = metrics.currency.as_deref();

    let mut html = String::from("<section class=\"cards\">");
    html.push_str(&metric_card(
        "Total Customers",
        &metrics.total_customers.to_string(),
        &format_pct(summary.customer_share_pct),
        "of all customers",
    ));
    html.push_str(&metric_card(
        "Total Revenue",
        &format_money(metrics.total_revenue, currency),
        &format_pct(summary.revenue_share_pct),
        "of all revenue",
    ));
    html.push_str(&metric_card(
        "Average Order Value",
        &format_money(metrics.avg_order_value, currency),
        &format_pct(summary.avg_order_value_delta_pct),
        "vs. overall",
    ));
    html.push_str(&metric_card(
        "Average Purchase Frequency",
        &format!("{:.2}", metrics.avg_purchase_frequency),
        &format_pct(summary.avg_frequency_delta_pct),
        "vs. overall",
    ));
    html.push_str("</section>");
    html
}

fn query_string(page: &DashboardPage) -> String {
    let selection = &page.dashboard.selection;
    format!(
        "segment={}&start_date={}&end_date={}&feature={}&bucket={}&bins={}",
        selection.segment,
        selection.date_range.start,
        selection.date_range.end,
        page.feature.column(),
        page.bucket.as_str(),
        page.bins
    )
}

fn chart_panel(id: &str, title: &str) -> String {
    format!(
        "<div class=\"panel\"><h2>{}</h2><div id=\"{}\" class=\"chart\"></div></div>",
        escape_html(title),
        id
    )
}

/// Render the full page.
pub fn render_page(page: &DashboardPage) -> String {
    let dashboard = &page.dashboard;
    let charts = &dashboard.charts;

    let mut html = String::from("<!doctype html><html lang=\"en\"><head><meta charset=\"utf-8\">");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">");
    html.push_str("<title>Customer Segmentation Analysis</title>");
    html.push_str(&format!("<style>{}</style>", DASHBOARD_CSS));
    html.push_str(&format!("<script src=\"{}\" charset=\"utf-8\"></script>", PLOTLY_JS));
    html.push_str("</head><body><header><h1>Customer Segmentation Analysis Dashboard</h1>");
    html.push_str("<p>High-Value Loyalists buy frequently and spend more; Occasional Buyers buy rarely and spend less.</p></header>");

    if !dashboard.notices.is_empty() {
        html.push_str("<section class=\"notices\">");
        for notice in &dashboard.notices {
            html.push_str(&format!("<p>{}</p>", escape_html(notice)));
        }
        html.push_str("</section>");
    }

    html.push_str(&filter_form(page));
    html.push_str(&metric_cards(&dashboard.summary));

    html.push_str("<section class=\"row\">");
    html.push_str(&chart_panel("chart-donut", &charts.donut.title));
    html.push_str(&chart_panel("chart-radar", &charts.radar.title));
    html.push_str("</section><section class=\"row\">");
    html.push_str(&chart_panel("chart-scatter", &charts.scatter.title));
    html.push_str(&chart_panel("chart-distribution", &charts.distribution.title));
    html.push_str("</section><section class=\"row timeseries\">");
    for metric in TimeseriesMetric::ALL {
        html.push_str(&chart_panel(&format!("chart-{}", metric_key(metric)), metric.title()));
    }
    html.push_str("</section>");

    let query = query_string(page);
    html.push_str(&format!(
        "<section class=\"raw\"><h2>Raw Data</h2><a href=\"/api/v1/view?{q}\">Show filtered customers and transactions</a> <a href=\"/api/v1/dashboard?{q}\">Dashboard JSON</a></section>",
        q = escape_html(&query)
    ));

    let embedded = EmbeddedCharts {
        charts,
        timeseries_metrics: TimeseriesMetric::ALL
            .into_iter()
            .map(|metric| EmbeddedMetric {
                key: metric,
                title: metric.title(),
                axis_label: metric.axis_label(),
            })
            .collect(),
    };
    html.push_str(&format!(
        "<script id=\"dashboard-data\" type=\"application/json\">{}</script>",
        embed_json(&embedded)
    ));
    html.push_str(&format!("<script>{}</script>", DASHBOARD_JS));
    html.push_str("</body></html>");
    html
}

fn metric_key(metric: TimeseriesMetric) -> &'static str {
    match metric {
        TimeseriesMetric::Revenue => "revenue",
        TimeseriesMetric::ActiveCustomers => "active_customers",
        TimeseriesMetric::AvgOrderValue => "avg_order_value",
    }
}
