//! Encoding Error Types

use thiserror::Error;

/// Errors while ingesting profile samples
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodingError {
    /// A batch column does not match the length of the date column
    #[error("{field} has {actual} values, expected {expected}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A date string matched none of the accepted formats
    #[error("invalid observation date at index {index}: {value:?}")]
    InvalidDate { index: usize, value: String },
}
