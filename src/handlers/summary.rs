use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use common::SummaryComparison;
use compute::{FilteredView, apply_filter, compare_to_overall};
use tracing::instrument;

use crate::helpers::selection::{error_response, resolve_query, response_message};
use crate::schemas::{ApiResponse, AppState, DashboardQuery, ErrorResponse};

/// Metric cards for the selection, with their share of and deviation from the whole dataset
#[utoipa::path(
    get,
    path = "/api/v1/summary",
    tag = "dashboard",
    params(DashboardQuery),
    responses(
        (status = 200, description = "Summary computed successfully", body = ApiResponse<SummaryComparison>),
        (status = 400, description = "Invalid filter input", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_summary(
    State(state): State<AppState>,
    Valid(Query(query)): Valid<Query<DashboardQuery>>,
) -> Result<(StatusCode, Json<ApiResponse<SummaryComparison>>), (StatusCode, Json<ErrorResponse>)> {
    let (resolved, _) = resolve_query(&state, &query).map_err(error_response)?;

    let view = apply_filter(&state.data, &resolved.selection);
    let summary = compare_to_overall(&view, &FilteredView::overall(&state.data));

    let message = response_message(&resolved.notices, "Summary computed successfully");

    Ok((
        StatusCode::OK,
        Json(ApiResponse {
            data: summary,
            message,
            success: true,
        }),
    ))
}
