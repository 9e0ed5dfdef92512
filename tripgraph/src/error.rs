use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum TripGraphError {
    #[error("Invalid input: {0}")]
    InvalidUserInput(String),
    #[error("Failed to connect to graph database at '{uri}': {message}")]
    ConnectivityError { uri: String, message: String },
    #[error("Error reading from '{path}': {message}")]
    InputReadError { path: PathBuf, message: String },
    #[error("Failed to transform trip record: {0}")]
    TransformError(String),
    #[error("Error writing staging file '{path}': {message}")]
    StagingWriteError { path: PathBuf, message: String },
    #[error("Graph database query failed during {operation}: {source}")]
    QueryExecutionError {
        operation: String,
        #[source]
        source: neo4rs::Error,
    },
    #[error("Failed to serialize result: {0}")]
    SerializationError(String),
    #[error("In-memory graph store failure: {0}")]
    GraphStoreError(String),
    #[error("Error creating a runtime to handle async code: {0}")]
    RuntimeError(String),
}

impl TripGraphError {
    /// helper for wrapping driver failures with the name of the operation that failed.
    pub fn query(operation: &str, source: neo4rs::Error) -> Self {
        Self::QueryExecutionError {
            operation: operation.to_string(),
            source,
        }
    }
}
