//! Error types for odt-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in odt-core
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Raw column name missing from the odt lookup table
    #[error("entry '{name}' in '{path}' is not in the column lookup table")]
    UnknownColumn { path: PathBuf, name: String },

    /// A data token that is not a floating-point number
    #[error("invalid number '{token}' on line {line} of '{path}'")]
    InvalidNumber {
        path: PathBuf,
        line: usize,
        token: String,
    },

    /// Row length does not match the column count
    #[error("row {row} in '{path}' has {found} values, expected {expected}")]
    RowLength {
        path: PathBuf,
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Units line length does not match the column count
    #[error("'{path}' lists {found} units for {expected} columns")]
    UnitCount {
        path: PathBuf,
        expected: usize,
        found: usize,
    },

    /// A required header line is absent
    #[error("no '{marker}' header line in '{path}'")]
    MissingHeader { path: PathBuf, marker: String },

    /// Time alignment requested for a table without a time column
    #[error("cannot merge on time: '{path}' has no time column")]
    MissingTimeColumn { path: PathBuf },

    /// Nothing to merge
    #[error("no tables to merge")]
    NoTables,

    /// Column lookup by name failed
    #[error("column '{0}' not found")]
    ColumnNotFound(String),

    /// Units were requested from a format that carries none
    #[error("'{path}' has no units header")]
    UnitsUnavailable { path: PathBuf },

    /// Two columns of one table share a name
    #[error("column '{name}' appears more than once in '{path}'")]
    DuplicateColumn { path: PathBuf, name: String },

    /// An input column collides with a column the merge derives itself
    #[error("'{path}' already has a '{name}' column, which a time merge derives")]
    ReservedColumn { path: PathBuf, name: String },

    /// An operation needs an independent variable and none is set
    #[error("no independent variable specified")]
    NoIndependentVariable,

    /// Independent variable values are not evenly spaced
    #[error("independent variable '{column}' spacing is not even")]
    UnevenSpacing { column: String },

    /// Not enough rows for a spacing or transform
    #[error("column '{column}' has {found} values, at least {needed} required")]
    TooFewRows {
        column: String,
        needed: usize,
        found: usize,
    },

    /// Inverse transform requested on a real-space table
    #[error("cannot inverse Fourier transform a table which has not been Fourier transformed")]
    NotFourierSpace,

    /// FFT error from the realfft crate
    #[error("FFT error: {0}")]
    Fft(#[from] realfft::FftError),

    /// CSV error from the csv crate
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Directory traversal error
    #[error("failed to traverse directory: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
