//! Chart renderer. Every function here is a pure function of a filtered view
//! and returns a chart description; an empty view gives the empty description.

pub mod distribution;
pub mod donut;
pub mod radar;
pub mod scatter;
pub mod stats;
pub mod timeseries;

pub use distribution::feature_distribution;
pub use donut::segment_donut;
pub use radar::{DEFAULT_RADAR_FEATURES, segment_radar};
pub use scatter::rfm_scatter;
pub use timeseries::timeseries;
