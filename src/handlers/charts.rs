use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use common::{FeatureDistribution, RfmScatter, SegmentDonut, SegmentRadar, TimeseriesChart};
use compute::charts::{
    feature_distribution, rfm_scatter, segment_donut, segment_radar, timeseries,
};
use compute::{FilteredView, RenderOptions, apply_filter};
use tracing::{debug, instrument};

use crate::helpers::selection::{error_response, resolve_query, response_message};
use crate::schemas::{ApiResponse, AppState, DashboardQuery, ErrorResponse};

type ChartResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), (StatusCode, Json<ErrorResponse>)>;

struct Filtered<'a> {
    view: FilteredView<'a>,
    options: RenderOptions,
    notices: Vec<String>,
}

fn filtered<'a>(
    state: &'a AppState,
    query: &DashboardQuery,
) -> Result<Filtered<'a>, (StatusCode, Json<ErrorResponse>)> {
    let (resolved, options) = resolve_query(state, query).map_err(error_response)?;
    let view = apply_filter(&state.data, &resolved.selection);
    debug!(
        transactions = view.transactions().len(),
        customers = view.customers().len(),
        "Filtered view for chart"
    );
    Ok(Filtered {
        view,
        options,
        notices: resolved.notices,
    })
}

/// Range adjustments come first; otherwise the message says whether the chart is empty.
fn chart_response<T>(chart: T, empty: bool, notices: &[String]) -> ChartResult<T> {
    let default = if empty {
        "No data for the current selection"
    } else {
        "Chart computed successfully"
    };
    Ok((
        StatusCode::OK,
        Json(ApiResponse {
            data: chart,
            message: response_message(notices, default),
            success: true,
        }),
    ))
}

/// Share of customers per segment
#[utoipa::path(
    get,
    path = "/api/v1/charts/segments",
    tag = "charts",
    params(DashboardQuery),
    responses(
        (status = 200, description = "Segment donut computed", body = ApiResponse<SegmentDonut>),
        (status = 400, description = "Invalid filter input", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_segment_donut(
    State(state): State<AppState>,
    Valid(Query(query)): Valid<Query<DashboardQuery>>,
) -> ChartResult<SegmentDonut> {
    let filtered = filtered(&state, &query)?;
    let chart = segment_donut(&filtered.view);
    let empty = chart.is_empty();
    chart_response(chart, empty, &filtered.notices)
}

/// Normalized mean features per segment
#[utoipa::path(
    get,
    path = "/api/v1/charts/radar",
    tag = "charts",
    params(DashboardQuery),
    responses(
        (status = 200, description = "Segment radar computed", body = ApiResponse<SegmentRadar>),
        (status = 400, description = "Invalid filter input", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_segment_radar(
    State(state): State<AppState>,
    Valid(Query(query)): Valid<Query<DashboardQuery>>,
) -> ChartResult<SegmentRadar> {
    let filtered = filtered(&state, &query)?;
    let chart = segment_radar(&filtered.view, &filtered.options.radar_features);
    let empty = chart.is_empty();
    chart_response(chart, empty, &filtered.notices)
}

/// Monetary against frequency per customer
#[utoipa::path(
    get,
    path = "/api/v1/charts/scatter",
    tag = "charts",
    params(DashboardQuery),
    responses(
        (status = 200, description = "RFM scatter computed", body = ApiResponse<RfmScatter>),
        (status = 400, description = "Invalid filter input", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_rfm_scatter(
    State(state): State<AppState>,
    Valid(Query(query)): Valid<Query<DashboardQuery>>,
) -> ChartResult<RfmScatter> {
    let filtered = filtered(&state, &query)?;
    let chart = rfm_scatter(&filtered.view);
    let empty = chart.is_empty();
    chart_response(chart, empty, &filtered.notices)
}

/// Histogram and box plot of one feature per segment
#[utoipa::path(
    get,
    path = "/api/v1/charts/distribution",
    tag = "charts",
    params(DashboardQuery),
    responses(
        (status = 200, description = "Feature distribution computed", body = ApiResponse<FeatureDistribution>),
        (status = 400, description = "Invalid filter input or bin count", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_feature_distribution(
    State(state): State<AppState>,
    Valid(Query(query)): Valid<Query<DashboardQuery>>,
) -> ChartResult<FeatureDistribution> {
    let filtered = filtered(&state, &query)?;
    let chart = feature_distribution(
        &filtered.view,
        filtered.options.feature,
        filtered.options.bins,
    );
    let empty = chart.is_empty();
    chart_response(chart, empty, &filtered.notices)
}

/// Revenue, active customers and average order value over time per segment
#[utoipa::path(
    get,
    path = "/api/v1/charts/timeseries",
    tag = "charts",
    params(DashboardQuery),
    responses(
        (status = 200, description = "Time series computed", body = ApiResponse<TimeseriesChart>),
        (status = 400, description = "Invalid filter input", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_timeseries(
    State(state): State<AppState>,
    Valid(Query(query)): Valid<Query<DashboardQuery>>,
) -> ChartResult<TimeseriesChart> {
    let filtered = filtered(&state, &query)?;
    let chart = timeseries(&filtered.view, filtered.options.bucket);
    let empty = chart.is_empty();
    chart_response(chart, empty, &filtered.notices)
}
