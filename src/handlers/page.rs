use axum::{
    extract::{Query, State},
    response::Html,
};
use common::{Feature, FilterOptions};
use compute::{
    ResolvedSelection, build_dashboard, default_selection, resolve_selection,
};
use tracing::{debug, instrument, warn};
use validator::Validate;

use crate::helpers::selection::{render_options, selection_request};
use crate::schemas::{AppState, DashboardQuery};
use crate::view::{DashboardPage, render_page};

/// The dashboard page. Input errors never fail the page: they become notices
/// and the affected input falls back to its default.
#[instrument(skip(state))]
pub async fn dashboard_page(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Html<String> {
    let page = compose_page(&state, query);
    Html(render_page(&page))
}

/// Run the whole pipeline for one page view.
pub fn compose_page(state: &AppState, mut query: DashboardQuery) -> DashboardPage {
    let mut notices = Vec::new();

    if query.validate().is_err() {
        warn!(bins = ?query.bins, "Rejected histogram bin count");
        notices.push("Histogram bins must be between 2 and 200; using the default".to_string());
        query.bins = None;
    }

    let resolved = match resolve_selection(&state.data, &selection_request(&query)) {
        Ok(resolved) => resolved,
        Err(err) => {
            warn!("Rejected filter input: {}", err);
            notices.push(format!("{}; showing the default selection", err));
            ResolvedSelection::new(default_selection(&state.data))
        }
    };

    let options = match render_options(&query, &state.settings) {
        Ok(options) => options,
        Err(err) => {
            warn!("Rejected chart option: {}", err);
            notices.push(format!("{}; using the default", err));
            state.settings.render_options()
        }
    };

    let mut dashboard = build_dashboard(&state.data, resolved, &options);
    notices.append(&mut dashboard.notices);
    dashboard.notices = notices;
    debug!(notices = dashboard.notices.len(), "Dashboard page composed");

    DashboardPage {
        filters: FilterOptions::new(
            state.data.date_bounds(),
            default_selection(&state.data),
            Feature::Monetary,
            state.settings.time_bucket,
        ),
        feature: options.feature,
        bucket: options.bucket,
        bins: options.bins,
        dashboard,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_utils::setup_test_app_state;
    use common::{Segment, TimeBucket};

    #[test]
    fn test_invalid_input_becomes_notice() {
        let state = setup_test_app_state();
        let query = DashboardQuery {
            segment: Some("9".to_string()),
            bucket: Some("fortnight".to_string()),
            bins: Some(1),
            ..DashboardQuery::default()
        };
        let page = compose_page(&state, query);

        assert_eq!(page.dashboard.notices.len(), 3);
        assert_eq!(page.dashboard.selection, default_selection(&state.data));
        assert_eq!(page.bucket, state.settings.time_bucket);
        assert_eq!(page.bins, state.settings.histogram_bins);
    }

    #[test]
    fn test_inverted_range_shows_default_selection() {
        let state = setup_test_app_state();
        let query = DashboardQuery {
            segment: Some("1".to_string()),
            start_date: Some("2024-03-01".to_string()),
            end_date: Some("2024-01-01".to_string()),
            ..DashboardQuery::default()
        };
        let page = compose_page(&state, query);

        assert_eq!(page.dashboard.selection.segment, Segment::All);
        assert_eq!(page.dashboard.notices.len(), 1);
        assert!(page.dashboard.notices[0].contains("before start date"));
    }

    #[test]
    fn test_valid_query_is_applied() {
        let state = setup_test_app_state();
        let query = DashboardQuery {
            feature: Some("recency".to_string()),
            bucket: Some("week".to_string()),
            bins: Some(10),
            ..DashboardQuery::default()
        };
        let page = compose_page(&state, query);

        assert!(page.dashboard.notices.is_empty());
        assert_eq!(page.feature, Feature::Recency);
        assert_eq!(page.bucket, TimeBucket::Week);
        assert_eq!(page.bins, 10);
    }
}
