//! Errors for least-squares fitting.
//!
//! `OLSError` covers malformed inputs to [`RegressionFit::fit`] and
//! failures of the underlying SVD solve. The alias `OLSResult<T>` is used
//! across the regression subtree.
//!
//! [`RegressionFit::fit`]: crate::regression::ols::RegressionFit::fit

pub type OLSResult<T> = Result<T, OLSError>;

/// Failure modes of an ordinary-least-squares fit.
#[derive(Debug, Clone, PartialEq)]
pub enum OLSError {
    /// `endog` and `exog` disagree on the number of observations.
    ShapeMismatch { endog: usize, exog: usize },

    /// No observations or no regressors.
    EmptyDesign { nobs: usize, nexog: usize },

    /// A NaN/±inf entry reached the solver.
    NonFiniteInput { row: usize },

    /// The SVD solve reported an error.
    Decomposition(String),
}

impl std::error::Error for OLSError {}

impl std::fmt::Display for OLSError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OLSError::ShapeMismatch { endog, exog } => write!(
                f,
                "OLS Error: endog has {endog} observations but exog has {exog} rows"
            ),
            OLSError::EmptyDesign { nobs, nexog } => write!(
                f,
                "OLS Error: empty design ({nobs} observations, {nexog} regressors)"
            ),
            OLSError::NonFiniteInput { row } => {
                write!(f, "OLS Error: non-finite value in observation {row}")
            }
            OLSError::Decomposition(msg) => write!(f, "OLS Error: SVD solve failed: {msg}"),
        }
    }
}
