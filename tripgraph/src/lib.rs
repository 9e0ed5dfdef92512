pub mod analytics;
pub mod app;
pub mod config;
pub mod graph;
pub mod ingest;

mod error;

pub use error::TripGraphError;
