//! Error types for payload generation and verification.
//!
//! Building a payment code never fails; these variants cover the CLI surface,
//! batch input parsing and the payload decoder.

use thiserror::Error;

/// Result type alias for crate operations
pub type Result<T> = std::result::Result<T, PayloadError>;

/// Errors that can occur while reading requests or decoding payloads.
#[derive(Error, Debug)]
pub enum PayloadError {
    /// Failed to open or read the input file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid request record
    #[error("Invalid request at row {row}: {message}")]
    InvalidRecord { row: usize, message: String },

    /// Missing input file argument
    #[error("Missing input file argument. Usage: pix-payload <requests.csv> | pix-payload --verify <payload>")]
    MissingArgument,

    /// Payload ended in the middle of a field header or value
    #[error("Payload truncated at offset {offset}")]
    Truncated { offset: usize },

    /// Tag or length is not made of ASCII digits
    #[error("Invalid field header {header:?} at offset {offset}")]
    InvalidHeader { offset: usize, header: String },

    /// Declared length runs past the end of the enclosing value
    #[error("Field {tag} at offset {offset} declares {declared} characters, only {available} remain")]
    LengthOverrun {
        tag: String,
        offset: usize,
        declared: usize,
        available: usize,
    },

    /// Trailing checksum does not match the payload
    #[error("Checksum mismatch: payload carries {actual}, computed {expected}")]
    ChecksumMismatch { expected: String, actual: String },

    /// Mandatory field is absent
    #[error("Missing field {0}")]
    MissingField(&'static str),

    /// Field is present but holds a value this encoder never produces
    #[error("Unexpected value {value:?} in field {tag}")]
    UnexpectedValue { tag: &'static str, value: String },
}
