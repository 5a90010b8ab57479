use crate::handlers::{
    charts::{
        get_feature_distribution, get_rfm_scatter, get_segment_donut, get_segment_radar,
        get_timeseries,
    },
    dashboard::get_dashboard,
    filters::get_filter_options,
    health::health_check,
    page::dashboard_page,
    summary::get_summary,
    view::get_raw_view,
};
use crate::schemas::{ApiDoc, AppState};
use axum::{Router, routing::get};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.settings.request_timeout_secs);

    Router::new()
        // Dashboard page
        .route("/", get(dashboard_page))
        // Health check
        .route("/health", get(health_check))
        // Dashboard data
        .route("/api/v1/filters", get(get_filter_options))
        .route("/api/v1/dashboard", get(get_dashboard))
        .route("/api/v1/summary", get(get_summary))
        .route("/api/v1/view", get(get_raw_view))
        // Individual charts
        .route("/api/v1/charts/segments", get(get_segment_donut))
        .route("/api/v1/charts/radar", get(get_segment_radar))
        .route("/api/v1/charts/scatter", get(get_rfm_scatter))
        .route("/api/v1/charts/distribution", get(get_feature_distribution))
        .route("/api/v1/charts/timeseries", get(get_timeseries))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(timeout))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
