use std::path::{Path, PathBuf};

use itertools::Itertools;

use crate::{
    config::IngestConfig,
    graph::GraphStore,
    ingest::{
        filter::TripFilterChain, read_trip_rows, staging_file_name, write_staging_csv,
        IngestSummary, RawTripRow, TripRecord,
    },
    TripGraphError,
};

/// loads parquet trip files into a [`GraphStore`].
///
/// each file is read in full, filtered, normalized, written to a staging CSV
/// and bulk loaded. any failure stops the run; nothing already written is
/// rolled back.
pub struct IngestionPipeline<S: GraphStore> {
    store: S,
    filter_chain: TripFilterChain,
    staging_directory: PathBuf,
}

impl<S: GraphStore> IngestionPipeline<S> {
    pub fn new(store: S, config: &IngestConfig) -> Result<Self, TripGraphError> {
        let filter_chain = TripFilterChain::try_from(config)?;
        Ok(Self {
            store,
            filter_chain,
            staging_directory: config.staging_directory.clone(),
        })
    }

    /// runs the full ingestion for one trip file.
    pub fn load_transform_file(&self, input: &Path) -> Result<IngestSummary, TripGraphError> {
        let file_name = staging_file_name(input)?;
        let rows = read_trip_rows(input)?;
        let records = transform_rows(&rows, &self.filter_chain)?;
        log::info!(
            "kept {} of {} trips from {:?} in {} zones",
            records.len(),
            rows.len(),
            input,
            self.filter_chain.zones().len()
        );

        let staging = write_staging_csv(&records, &self.staging_directory, &file_name)?;
        self.store.ensure_location_constraint()?;
        self.store.bulk_load(&staging)?;

        let summary = IngestSummary::new(input.to_owned(), rows.len(), records.len(), &staging);
        log::info!("{summary}");
        Ok(summary)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

/// applies the filter chain and normalizes the surviving rows, preserving
/// input order.
pub fn transform_rows(
    rows: &[RawTripRow],
    filter_chain: &TripFilterChain,
) -> Result<Vec<TripRecord>, TripGraphError> {
    filter_chain
        .apply(rows)
        .into_iter()
        .map(|row| TripRecord::try_from(row))
        .try_collect()
}
