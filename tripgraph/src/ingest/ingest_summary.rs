use std::{fmt::Display, path::PathBuf};

use serde::Serialize;

use crate::ingest::StagingFile;

/// counts reported after one input file has been ingested.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestSummary {
    pub input: PathBuf,
    pub rows_read: usize,
    pub rows_kept: usize,
    pub staging_file: PathBuf,
}

impl IngestSummary {
    pub fn new(input: PathBuf, rows_read: usize, rows_kept: usize, staging: &StagingFile) -> Self {
        Self {
            input,
            rows_read,
            rows_kept,
            staging_file: staging.path.clone(),
        }
    }

    pub fn rows_dropped(&self) -> usize {
        self.rows_read.saturating_sub(self.rows_kept)
    }
}

impl Display for IngestSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ingested '{}': {} rows read, {} kept, {} dropped, staged at '{}'",
            self.input.display(),
            self.rows_read,
            self.rows_kept,
            self.rows_dropped(),
            self.staging_file.display()
        )
    }
}
