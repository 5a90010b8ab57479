use axum::{extract::State, http::StatusCode, response::Json};
use common::{Feature, FilterOptions};
use compute::default_selection;
use tracing::{debug, instrument};

use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Inputs offered by the filter form and the selection the dashboard starts from
#[utoipa::path(
    get,
    path = "/api/v1/filters",
    tag = "dashboard",
    responses(
        (status = 200, description = "Filter options retrieved successfully", body = ApiResponse<FilterOptions>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_filter_options(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ApiResponse<FilterOptions>>), (StatusCode, Json<ErrorResponse>)> {
    let options = FilterOptions::new(
        state.data.date_bounds(),
        default_selection(&state.data),
        Feature::Monetary,
        state.settings.time_bucket,
    );
    debug!(date_bounds = ?options.date_bounds, "Filter options computed");

    Ok((
        StatusCode::OK,
        Json(ApiResponse {
            data: options,
            message: "Filter options retrieved successfully".to_string(),
            success: true,
        }),
    ))
}
