use std::{
    fs::File,
    path::{Path, PathBuf},
};

use csv::QuoteStyle;
use kdam::tqdm;

use crate::{
    ingest::{TripRecord, TRIP_COLUMNS},
    TripGraphError,
};

/// a staging CSV written to the bulk loader's import directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingFile {
    /// location on the local filesystem
    pub path: PathBuf,
    /// file name relative to the import directory
    pub file_name: String,
}

impl StagingFile {
    /// the URL `LOAD CSV` uses to find this file inside the import directory.
    pub fn url(&self) -> String {
        format!("file:///{}", self.file_name)
    }
}

/// the staging file name for an input trip file: the input's file name with
/// its extension replaced by `csv`.
pub fn staging_file_name(input: &Path) -> Result<String, TripGraphError> {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            TripGraphError::InvalidUserInput(format!(
                "cannot derive a staging file name from '{}'",
                input.display()
            ))
        })?;
    Ok(format!("{stem}.csv"))
}

/// writes the trip records to `<staging_directory>/<file_name>` with a header
/// row, creating the directory if needed. an existing file is overwritten.
pub fn write_staging_csv(
    records: &[TripRecord],
    staging_directory: &Path,
    file_name: &str,
) -> Result<StagingFile, TripGraphError> {
    let path = staging_directory.join(file_name);
    let write_error = |message: String| TripGraphError::StagingWriteError {
        path: path.clone(),
        message,
    };
    if !staging_directory.is_dir() {
        std::fs::create_dir_all(staging_directory)
            .map_err(|e| write_error(format!("error building staging directory: {e}")))?;
    }
    let file = File::create(&path).map_err(|e| write_error(e.to_string()))?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Necessary)
        .from_writer(file);
    // header is written up front so that an empty result still has one
    writer
        .write_record(TRIP_COLUMNS)
        .map_err(|e| write_error(format!("failed to write header: {e}")))?;

    let bar_iter = tqdm!(records.iter(), total = records.len(), desc = "write staging csv");
    for record in bar_iter {
        writer
            .serialize(record)
            .map_err(|e| write_error(format!("failed to write row: {e}")))?;
    }
    eprintln!();
    writer
        .flush()
        .map_err(|e| write_error(format!("failed to flush: {e}")))?;

    log::info!("wrote {} trips to staging file {:?}", records.len(), path);
    Ok(StagingFile {
        path: path.clone(),
        file_name: file_name.to_string(),
    })
}
