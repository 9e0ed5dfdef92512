mod ingest_summary;
mod pipeline;
mod staging;
mod trip_reader;
mod trip_record;

pub mod filter;
pub mod timestamp_ops;

pub use ingest_summary::IngestSummary;
pub use pipeline::IngestionPipeline;
pub use staging::{staging_file_name, write_staging_csv, StagingFile};
pub use trip_reader::read_trip_rows;
pub use trip_record::{RawTripRow, TripRecord, TRIP_COLUMNS};
