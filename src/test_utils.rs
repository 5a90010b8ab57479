#[cfg(test)]
pub mod test_utils {
    use crate::config::Settings;
    use crate::router::create_router;
    use crate::schemas::AppState;
    use axum::Router;
    use compute::testing::segmentation_scenario;
    use model::SegmentationData;
    use std::sync::Arc;
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    /// Create AppState over the given data with default settings
    pub fn app_state_with(data: SegmentationData) -> AppState {
        AppState {
            data: Arc::new(data),
            settings: Arc::new(Settings::default()),
        }
    }

    /// Create AppState for testing: four clustered customers from January to
    /// March 2024 plus one customer without a feature record
    pub fn setup_test_app_state() -> AppState {
        app_state_with(segmentation_scenario())
    }

    /// Initialize tracing for tests, captured per test by the test harness.
    ///
    /// The log level is taken from RUST_LOG, defaulting to WARN. The subscriber
    /// is global, so only the first call installs it.
    fn init_test_tracing() {
        let log_level = std::env::var("RUST_LOG")
            .ok()
            .and_then(|level| match level.to_uppercase().as_str() {
                "ERROR" => Some(Level::ERROR),
                "WARN" => Some(Level::WARN),
                "INFO" => Some(Level::INFO),
                "DEBUG" => Some(Level::DEBUG),
                "TRACE" => Some(Level::TRACE),
                _ => None,
            })
            .unwrap_or(Level::WARN);

        let _ = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    }

    /// Create axum app for testing
    pub async fn setup_test_app() -> Router {
        init_test_tracing();

        create_router(setup_test_app_state())
    }

    /// Create axum app over the given data
    pub async fn setup_test_app_with(data: SegmentationData) -> Router {
        init_test_tracing();

        create_router(app_state_with(data))
    }

    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_app_setup_installs_tracing() {
            let _app = setup_test_app().await;
            assert!(tracing::dispatcher::has_been_set());
        }
    }
}
