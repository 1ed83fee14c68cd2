//! Error types for the progression engine.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by a persistence backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing file could not be written.
    #[error("cannot write {path}: {source}")]
    Io {
        /// The file being written.
        path: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The stored values could not be encoded.
    #[error("cannot encode store: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur while driving a learning session.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A scenario index outside the catalog was requested.
    #[error("scenario {index} does not exist (catalog has {count})")]
    ScenarioOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of scenarios in the catalog.
        count: usize,
    },

    /// A review item outside the mistake queue was requested.
    #[error("review item {index} does not exist (queue has {count})")]
    ReviewOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of reviewable missions.
        count: usize,
    },

    /// Invalid choice or input.
    #[error("invalid choice: {0}")]
    InvalidChoice(String),

    /// Unknown command.
    #[error("unknown command: {0}")]
    UnknownCommand(String),
}
