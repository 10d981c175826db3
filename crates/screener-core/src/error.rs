//! Error types for the screening engine.
//!
//! Insufficient history and malformed bar fields never show up here: they
//! are represented as absent values in the data model. Only failures at the
//! collaborator boundary (missing data source, broken files, unknown jobs)
//! become errors.

use thiserror::Error;

/// Top-level screening error.
#[derive(Error, Debug)]
pub enum ScreenerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Ingest error: {0}")]
    Ingest(#[from] IngestError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Data source errors.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("No data available for the requested universe")]
    NoDataAvailable,

    /// The upstream snapshot or data directory cannot be reached. This is a
    /// request-level failure, distinct from an empty screening result.
    #[error("Data source unavailable: {0}")]
    Unavailable(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Universe error: {0}")]
    Universe(String),

    #[error("Data source error: {0}")]
    Internal(String),
}

/// Ingestion job errors.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Job not found: {0}")]
    JobNotFound(String),

    #[error("Ingest failed: {0}")]
    Failed(String),

    #[error("Data error: {0}")]
    Data(#[from] DataError),
}

/// Result type alias for screening operations.
pub type ScreenerResult<T> = Result<T, ScreenerError>;
