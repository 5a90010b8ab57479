use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use common::RawView;
use compute::apply_filter;
use tracing::{debug, instrument};

use crate::helpers::converters::raw_view;
use crate::helpers::selection::{error_response, resolve_query};
use crate::schemas::{ApiResponse, AppState, DashboardQuery, ErrorResponse};

/// Filtered customer records and transactions, as behind the "Show Raw Data" links
#[utoipa::path(
    get,
    path = "/api/v1/view",
    tag = "view",
    params(DashboardQuery),
    responses(
        (status = 200, description = "Filtered data retrieved successfully", body = ApiResponse<RawView>),
        (status = 400, description = "Invalid filter input", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_raw_view(
    State(state): State<AppState>,
    Valid(Query(query)): Valid<Query<DashboardQuery>>,
) -> Result<(StatusCode, Json<ApiResponse<RawView>>), (StatusCode, Json<ErrorResponse>)> {
    let (resolved, _) = resolve_query(&state, &query).map_err(error_response)?;

    let view = apply_filter(&state.data, &resolved.selection);
    let raw = raw_view(&view, resolved.selection);
    debug!(
        customers = raw.customers.len(),
        transactions = raw.transactions.len(),
        "Raw view built"
    );

    Ok((
        StatusCode::OK,
        Json(ApiResponse {
            data: raw,
            message: "Filtered data retrieved successfully".to_string(),
            success: true,
        }),
    ))
}
