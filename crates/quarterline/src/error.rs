//! Error types for quarterline.
//!
//! This module defines all error types used throughout the quarterline crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for quarterline operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Dataset Errors ===
    /// A quarter label did not match any accepted format.
    #[error("invalid quarter format: '{label}' (expected Qn-YYYY)")]
    InvalidQuarterFormat {
        /// The offending label.
        label: String,
    },

    /// The same quarter appeared more than once in a single dataset.
    #[error("duplicate quarter in dataset: {label}")]
    DuplicateQuarter {
        /// Label of the repeated quarter.
        label: String,
    },

    /// A trend delta could not be parsed as a number.
    #[error("invalid trend delta: '{input}'")]
    InvalidTrend {
        /// The raw input.
        input: String,
    },

    /// The payload was valid JSON but not a dataset shape.
    #[error("unexpected payload: expected an array or an object, found {found}")]
    UnexpectedPayload {
        /// The JSON kind that was found instead.
        found: &'static str,
    },

    /// Failed to read a dataset file.
    #[error("failed to read dataset {path}: {source}")]
    DatasetRead {
        /// Path to the dataset file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for quarterline operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create an invalid quarter format error.
    #[must_use]
    pub fn invalid_quarter(label: impl Into<String>) -> Self {
        Self::InvalidQuarterFormat {
            label: label.into(),
        }
    }

    /// Create a duplicate quarter error.
    #[must_use]
    pub fn duplicate_quarter(label: impl Into<String>) -> Self {
        Self::DuplicateQuarter {
            label: label.into(),
        }
    }

    /// Check if this error was caused by malformed or inconsistent input data.
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        match self {
            Self::InvalidQuarterFormat { .. }
            | Self::DuplicateQuarter { .. }
            | Self::InvalidTrend { .. }
            | Self::UnexpectedPayload { .. } => true,
            Self::Json(err) => !err.is_io(),
            Self::DatasetRead { .. } | Self::ConfigLoad(_) | Self::ConfigValidation { .. } => false,
        }
    }
}
