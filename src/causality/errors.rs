//! causality::errors — error type for single-entity Granger tests.
//!
//! Purpose
//! -------
//! Provide [`GCError`] and [`GCResult`] for lag specification, lagged
//! regressions and the Wald statistic. Variants fall in two groups with
//! different propagation rules upstream:
//!
//! - configuration errors (`InvalidMaxLag`, `EmptyLagList`,
//!   `MultipleLagSetsUnsupported`, `LagListUnsupported`) are raised before
//!   any regression runs and abort a panel run at construction time;
//! - entity-level errors (`InsufficientSample`, `InfeasibleTest`,
//!   `Regression`, `Distribution`) describe one entity's data and are
//!   turned into an "infeasible" marker by the panel orchestrator, see
//!   [`GCError::is_entity_level`].
//! - `MissingColumn` is an internal invariant failure of the lagged table
//!   and belongs to neither group.
//!
//! Conventions
//! -----------
//! - Messages state the violated constraint with the offending numbers.
//! - At the Python boundary every variant maps to `ValueError`.
use crate::regression::errors::OLSError;

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

pub type GCResult<T> = Result<T, GCError>;

/// GCError — failures of the single-entity Granger-causality test.
///
/// Variants
/// --------
/// - `InvalidMaxLag { maxlag }`
///   A lag order of zero was requested.
/// - `EmptyLagList`
///   The list form of `maxlag` was empty.
/// - `MultipleLagSetsUnsupported { count }`
///   The list form of `maxlag` had more than one element; testing several
///   lag sets in one run is not implemented.
/// - `LagListUnsupported`
///   A panel run received the list form of `maxlag`; panels take an
///   integer order and select `{K}` through `single_lag`.
/// - `MissingColumn { name }`
///   The lagged table lacks a column it was built with.
/// - `InsufficientSample { nobs, nexog }`
///   After dropping incomplete rows, `nobs ≤ nexog`.
/// - `InfeasibleTest { reason }`
///   The unrestricted regression fits perfectly or is otherwise degenerate,
///   so the F statistic is undefined.
/// - `Regression(OLSError)`
///   The least-squares solve itself failed.
/// - `Distribution(String)`
///   The F distribution could not be parameterized.
#[derive(Debug, Clone, PartialEq)]
pub enum GCError {
    // ---- Configuration ----
    InvalidMaxLag { maxlag: usize },
    EmptyLagList,
    MultipleLagSetsUnsupported { count: usize },
    LagListUnsupported,

    // ---- Internal ----
    MissingColumn { name: String },

    // ---- Entity level ----
    InsufficientSample { nobs: usize, nexog: usize },
    InfeasibleTest { reason: &'static str },
    Regression(OLSError),
    Distribution(String),
}

impl GCError {
    /// Whether this error describes one entity's data (and should become an
    /// infeasible marker) rather than a bad global configuration.
    pub fn is_entity_level(&self) -> bool {
        matches!(
            self,
            GCError::InsufficientSample { .. }
                | GCError::InfeasibleTest { .. }
                | GCError::Regression(_)
                | GCError::Distribution(_)
        )
    }
}

impl From<OLSError> for GCError {
    fn from(err: OLSError) -> Self {
        GCError::Regression(err)
    }
}

impl std::error::Error for GCError {}

impl std::fmt::Display for GCError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Configuration ----
            GCError::InvalidMaxLag { maxlag } => {
                write!(f, "maxlag must be a positive integer; got {maxlag}.")
            }
            GCError::EmptyLagList => write!(f, "maxlag list must contain exactly one lag order."),
            GCError::MultipleLagSetsUnsupported { count } => write!(
                f,
                "Only one lag at a time can be tested for now; maxlag list has {count} entries."
            ),
            GCError::LagListUnsupported => write!(
                f,
                "Panel runs take an integer maxlag; use single_lag to test one lag order alone."
            ),
            // ---- Internal ----
            GCError::MissingColumn { name } => {
                write!(f, "Lagged design is missing the expected column '{name}'.")
            }
            // ---- Entity level ----
            GCError::InsufficientSample { nobs, nexog } => write!(
                f,
                "The resulting sample ({nobs} rows) is too small to perform the regressions \
                 (#exog variables = {nexog})."
            ),
            GCError::InfeasibleTest { reason } => write!(
                f,
                "The Granger causality test statistic cannot be computed: {reason}."
            ),
            GCError::Regression(err) => write!(f, "{err}"),
            GCError::Distribution(msg) => write!(f, "F distribution error: {msg}"),
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<GCError> for PyErr {
    fn from(err: GCError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Verify the split between configuration and entity-level errors.
    //
    // Given
    // -----
    // - One variant from each group.
    //
    // Expect
    // ------
    // - Only the entity-level variants report `is_entity_level() == true`.
    fn gc_error_classifies_entity_level_variants() {
        // Arrange
        let config = GCError::MultipleLagSetsUnsupported { count: 2 };
        let short = GCError::InsufficientSample { nobs: 3, nexog: 5 };
        let perfect = GCError::InfeasibleTest { reason: "perfect fit" };

        // Act & Assert
        assert!(!config.is_entity_level());
        assert!(!GCError::InvalidMaxLag { maxlag: 0 }.is_entity_level());
        assert!(!GCError::LagListUnsupported.is_entity_level());
        assert!(!GCError::MissingColumn { name: "y_t-1".into() }.is_entity_level());
        assert!(short.is_entity_level());
        assert!(perfect.is_entity_level());
    }

    #[test]
    // Purpose
    // -------
    // Check that sample-size errors report both counts.
    //
    // Given
    // -----
    // - `InsufficientSample { nobs: 3, nexog: 5 }`.
    //
    // Expect
    // ------
    // - Both numbers appear in the message.
    fn insufficient_sample_display_includes_counts() {
        // Arrange
        let err = GCError::InsufficientSample { nobs: 3, nexog: 5 };

        // Act
        let msg = err.to_string();

        // Assert
        assert!(msg.contains('3') && msg.contains('5'), "Got: {msg}");
    }
}
