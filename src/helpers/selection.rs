use axum::{http::StatusCode, response::Json};
use common::{Feature, TimeBucket};
use compute::{
    ComputeError, FilterError, RenderOptions, ResolvedSelection, SelectionRequest,
    resolve_selection,
};
use tracing::warn;

use crate::config::Settings;
use crate::schemas::{AppState, DashboardQuery, ErrorResponse};

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|value| !value.is_empty())
}

/// Borrow the filter part of a query.
pub fn selection_request(query: &DashboardQuery) -> SelectionRequest<'_> {
    SelectionRequest {
        segment: query.segment.as_deref(),
        start_date: query.start_date.as_deref(),
        end_date: query.end_date.as_deref(),
    }
}

/// Chart options from the query, falling back to the configured defaults.
pub fn render_options(
    query: &DashboardQuery,
    settings: &Settings,
) -> Result<RenderOptions, FilterError> {
    let mut options = settings.render_options();
    if let Some(raw) = non_empty(&query.feature) {
        options.feature = raw.parse::<Feature>()?;
    }
    if let Some(raw) = non_empty(&query.bucket) {
        options.bucket = raw.parse::<TimeBucket>()?;
    }
    if let Some(bins) = query.bins {
        options.bins = bins;
    }
    Ok(options)
}

/// Resolve everything a dashboard endpoint needs from its query.
pub fn resolve_query(
    state: &AppState,
    query: &DashboardQuery,
) -> compute::Result<(ResolvedSelection, RenderOptions)> {
    let resolved = resolve_selection(&state.data, &selection_request(query))?;
    let options = render_options(query, &state.settings)?;
    Ok((resolved, options))
}

/// Response message: the filter notices when there are any, otherwise `default`.
pub fn response_message(notices: &[String], default: &str) -> String {
    if notices.is_empty() {
        default.to_string()
    } else {
        notices.join("; ")
    }
}

/// Map a compute error to the JSON error response.
pub fn error_response(err: ComputeError) -> (StatusCode, Json<ErrorResponse>) {
    match err {
        ComputeError::Filter(filter_error) => {
            warn!("Rejected filter input: {}", filter_error);
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: filter_error.to_string(),
                    code: filter_error.code().to_string(),
                    success: false,
                }),
            )
        }
    }
}
