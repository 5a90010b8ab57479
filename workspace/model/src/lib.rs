//! Source tables of the segmentation dashboard: the purchase history and the
//! clustered per-customer features, loaded once from CSV and never mutated.

pub mod customer;
pub mod dataset;
pub mod error;
pub mod loader;
pub mod transaction;

pub use customer::CustomerFeatureRecord;
pub use dataset::SegmentationData;
pub use error::{ModelError, Result};
pub use loader::{load_customer_features, load_segmentation_data, load_transactions};
pub use transaction::Transaction;
