//! data::errors — validation errors for panel tables and time series.
//!
//! Purpose
//! -------
//! Provide the error enum and result alias used while turning a raw
//! two-level (entity × time) table into validated per-entity series. All of
//! these are configuration errors: they are raised when the panel is
//! constructed and never deferred to the per-entity loop.
//!
//! Conventions
//! -----------
//! - Messages name the offending level, column, or value so that a caller
//!   can fix the input without re-running under a debugger.
//! - Indices are 0-based row positions in the raw table.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

pub type DataResult<T> = Result<T, DataError>;

/// DataError — failures while validating panel tables, series and frequencies.
///
/// Variants
/// --------
/// - `InvalidIndex { reason }`
///   The row index is not a two-level index with exactly one time level.
/// - `ColumnSpec`
///   Exactly one of the `x` / `y` column overrides was given.
/// - `UnknownColumn { name }`
///   A requested column does not exist in the table.
/// - `TooFewColumns { found }`
///   Defaulting `y`/`x` to the first two columns needs at least two columns.
/// - `LengthMismatch { what, expected, actual }`
///   An index level or value column does not have one entry per row.
/// - `NonMonotonicTimes { index }`
///   Timestamps of a series are not strictly increasing at `index`.
/// - `UnknownFrequency { alias }` / `InvalidFrequency { reason }`
///   The resampling frequency could not be parsed or has a zero multiple.
/// - `EmptyPanel`
///   The table contains no rows.
#[derive(Debug, Clone, PartialEq)]
pub enum DataError {
    // ---- Index validation ----
    InvalidIndex { reason: &'static str },

    // ---- Column validation ----
    ColumnSpec,
    UnknownColumn { name: String },
    TooFewColumns { found: usize },
    LengthMismatch { what: String, expected: usize, actual: usize },

    // ---- Series validation ----
    NonMonotonicTimes { index: usize },

    // ---- Frequency ----
    UnknownFrequency { alias: String },
    InvalidFrequency { reason: &'static str },

    // ---- Panel ----
    EmptyPanel,
}

impl std::error::Error for DataError {}

impl std::fmt::Display for DataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Index validation ----
            DataError::InvalidIndex { reason } => {
                write!(f, "Invalid panel index: {reason}")
            }
            // ---- Column validation ----
            DataError::ColumnSpec => write!(
                f,
                "Either both 'x' and 'y' have to be set, or neither (then the first column is \
                 'y' and the second is 'x')."
            ),
            DataError::UnknownColumn { name } => {
                write!(f, "Column '{name}' does not exist in the panel table.")
            }
            DataError::TooFewColumns { found } => {
                write!(f, "At least two value columns are required; found {found}.")
            }
            DataError::LengthMismatch { what, expected, actual } => {
                write!(f, "{what} has {actual} entries, expected {expected} (one per row).")
            }
            // ---- Series validation ----
            DataError::NonMonotonicTimes { index } => {
                write!(f, "Timestamps must be strictly increasing; violated at index {index}.")
            }
            // ---- Frequency ----
            DataError::UnknownFrequency { alias } => {
                write!(f, "Unknown resampling frequency '{alias}'.")
            }
            DataError::InvalidFrequency { reason } => {
                write!(f, "Invalid resampling frequency: {reason}")
            }
            // ---- Panel ----
            DataError::EmptyPanel => write!(f, "The panel table contains no rows."),
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<DataError> for PyErr {
    fn from(err: DataError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Check that payload-carrying variants embed their payload in the
    // rendered message.
    //
    // Given
    // -----
    // - An `UnknownColumn` and a `LengthMismatch` error.
    //
    // Expect
    // ------
    // - The column name and both lengths appear in the messages.
    fn data_error_display_embeds_payloads() {
        // Arrange
        let unknown = DataError::UnknownColumn { name: "sales".to_string() };
        let mismatch =
            DataError::LengthMismatch { what: "column 'y'".to_string(), expected: 4, actual: 3 };

        // Act
        let unknown_msg = unknown.to_string();
        let mismatch_msg = mismatch.to_string();

        // Assert
        assert!(unknown_msg.contains("sales"), "Got: {unknown_msg}");
        assert!(mismatch_msg.contains('4') && mismatch_msg.contains('3'), "Got: {mismatch_msg}");
    }
}
