//! Error types for the order book pipeline.

use polars::prelude::{DataType, PolarsError};
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the order book pipeline.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data error (invalid or missing data).
    #[error("Data error: {0}")]
    Data(String),

    /// A column could not be converted to the type the schema asks for.
    #[error("Cast error: column {column} to {target}: {reason}")]
    Cast {
        column: String,
        target: DataType,
        reason: String,
    },

    /// Data frame read, write or compute error.
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a data error.
    pub fn data(msg: impl Into<String>) -> Self {
        Error::Data(msg.into())
    }

    /// Create a cast error.
    pub fn cast(column: impl Into<String>, target: DataType, reason: impl Into<String>) -> Self {
        Error::Cast {
            column: column.into(),
            target,
            reason: reason.into(),
        }
    }
}
