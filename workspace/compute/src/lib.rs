//! Pure computations behind the dashboard: filtering, summary metrics and
//! chart descriptions. Nothing here holds state between calls.

pub mod charts;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod summary;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use dashboard::{RenderOptions, build_dashboard, render_charts};
pub use error::{ComputeError, FilterError, Result};
pub use filter::{
    FilteredView, ResolvedSelection, SelectionRequest, apply_filter, default_selection,
    resolve_selection,
};
pub use summary::{compare_to_overall, summarize};
