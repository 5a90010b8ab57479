pub mod charts;
pub mod dashboard;
pub mod filters;
pub mod health;
pub mod page;
pub mod summary;
pub mod view;
