use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use common::DashboardData;
use compute::build_dashboard;
use tracing::{info, instrument, trace};

use crate::helpers::selection::{error_response, resolve_query};
use crate::schemas::{ApiResponse, AppState, DashboardQuery, ErrorResponse};

/// Selection, summary metrics and every chart in one response
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    tag = "dashboard",
    params(DashboardQuery),
    responses(
        (status = 200, description = "Dashboard computed successfully", body = ApiResponse<DashboardData>),
        (status = 400, description = "Invalid filter input", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_dashboard(
    State(state): State<AppState>,
    Valid(Query(query)): Valid<Query<DashboardQuery>>,
) -> Result<(StatusCode, Json<ApiResponse<DashboardData>>), (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering get_dashboard function");
    let (resolved, options) = resolve_query(&state, &query).map_err(error_response)?;

    let dashboard = build_dashboard(&state.data, resolved, &options);
    info!(
        customers = dashboard.summary.metrics.total_customers,
        transactions = dashboard.summary.metrics.total_transactions,
        "Dashboard computed"
    );

    Ok((
        StatusCode::OK,
        Json(ApiResponse {
            data: dashboard,
            message: "Dashboard computed successfully".to_string(),
            success: true,
        }),
    ))
}
