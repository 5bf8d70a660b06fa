//! regression — the least-squares primitive behind the causality tests.
//!
//! [`RegressionFit`] fits a response on a design matrix by SVD and exposes
//! the residual/total sums of squares, degrees of freedom, and intercept
//! flag used by Wald statistics. Failures are reported as [`OLSError`].

pub mod errors;
pub mod ols;

pub use self::errors::{OLSError, OLSResult};
pub use self::ols::RegressionFit;
