//! regression::ols — ordinary least squares by SVD pseudo-inverse.
//!
//! Purpose
//! -------
//! Provide the one regression primitive the Granger tests need: fit a
//! response vector on an exogenous design matrix and report the residual
//! and total sums of squares, degrees of freedom and intercept detection
//! required to form Wald statistics and degeneracy checks.
//!
//! Key behaviors
//! -------------
//! - Coefficients are the minimum-norm least-squares solution from an SVD
//!   with singular-value cut-off `1e-15 · σ_max`, so collinear designs
//!   still produce a full coefficient vector.
//! - The numerical rank uses the `σ_max · max(n, k) · ε` tolerance and
//!   drives `df_model` / `df_resid`.
//! - A column that is constant and non-zero marks the fit as having an
//!   intercept (`k_constant`), which selects centered vs uncentered TSS
//!   for R².
//!
//! Conventions
//! -----------
//! - Inputs are `ndarray` views; the design is copied once into a
//!   `nalgebra::DMatrix` for the decomposition.
//! - The fit never mutates after construction.
use crate::regression::errors::{OLSError, OLSResult};
use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, ArrayView1, ArrayView2};

/// Relative singular-value cut-off for the pseudo-inverse solve.
const PINV_RCOND: f64 = 1e-15;

/// RegressionFit — result of one OLS fit.
///
/// Fields
/// ------
/// - `params`: fitted coefficients, one per exogenous column.
/// - `ssr`: residual sum of squares.
/// - `nobs`: number of observations.
/// - `rank`: numerical rank of the design.
/// - `df_model`: `rank − k_constant`.
/// - `df_resid`: `nobs − rank`.
/// - `centered_tss` / `uncentered_tss`: `Σ(y − ȳ)²` and `Σy²`.
/// - `k_constant`: whether an intercept column was detected.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionFit {
    params: Array1<f64>,
    ssr: f64,
    nobs: usize,
    rank: usize,
    df_model: f64,
    df_resid: f64,
    centered_tss: f64,
    uncentered_tss: f64,
    k_constant: bool,
}

impl RegressionFit {
    /// Fit `endog` on `exog` by ordinary least squares.
    ///
    /// Parameters
    /// ----------
    /// - `endog`: `ArrayView1<f64>`
    ///   Response of length `n`; must be finite.
    /// - `exog`: `ArrayView2<f64>`
    ///   `n × k` design; include a column of ones for an intercept.
    ///
    /// Returns
    /// -------
    /// `OLSResult<RegressionFit>`
    ///
    /// Errors
    /// ------
    /// - `OLSError::ShapeMismatch` if `exog.nrows() != endog.len()`.
    /// - `OLSError::EmptyDesign` if `n == 0` or `k == 0`.
    /// - `OLSError::NonFiniteInput { row }` for any NaN/±inf entry.
    /// - `OLSError::Decomposition` if the SVD solve fails.
    pub fn fit(endog: ArrayView1<f64>, exog: ArrayView2<f64>) -> OLSResult<Self> {
        let (nobs, nexog) = exog.dim();
        if endog.len() != nobs {
            return Err(OLSError::ShapeMismatch { endog: endog.len(), exog: nobs });
        }
        if nobs == 0 || nexog == 0 {
            return Err(OLSError::EmptyDesign { nobs, nexog });
        }
        for (row, (y, x_row)) in endog.iter().zip(exog.rows()).enumerate() {
            if !y.is_finite() || x_row.iter().any(|v| !v.is_finite()) {
                return Err(OLSError::NonFiniteInput { row });
            }
        }

        let x = DMatrix::from_fn(nobs, nexog, |i, j| exog[[i, j]]);
        let y = DVector::from_iterator(nobs, endog.iter().copied());

        let svd = x.clone().svd(true, true);
        let sigma_max = svd.singular_values.max();
        let rank_tol = sigma_max * (nobs.max(nexog) as f64) * f64::EPSILON;
        let rank = svd.singular_values.iter().filter(|&&s| s > rank_tol).count();
        let beta = svd
            .solve(&y, PINV_RCOND * sigma_max)
            .map_err(|msg| OLSError::Decomposition(msg.to_string()))?;

        let resid = &y - &x * &beta;
        let ssr = resid.norm_squared();
        let mean = y.mean();
        let centered_tss = y.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
        let uncentered_tss = y.norm_squared();
        let k_constant = has_constant_column(&exog);

        Ok(RegressionFit {
            params: beta.iter().copied().collect(),
            ssr,
            nobs,
            rank,
            df_model: rank as f64 - if k_constant { 1.0 } else { 0.0 },
            df_resid: (nobs - rank) as f64,
            centered_tss,
            uncentered_tss,
            k_constant,
        })
    }

    pub fn params(&self) -> &Array1<f64> {
        &self.params
    }

    /// Residual sum of squares.
    pub fn ssr(&self) -> f64 {
        self.ssr
    }

    pub fn nobs(&self) -> usize {
        self.nobs
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn df_model(&self) -> f64 {
        self.df_model
    }

    pub fn df_resid(&self) -> f64 {
        self.df_resid
    }

    pub fn centered_tss(&self) -> f64 {
        self.centered_tss
    }

    pub fn uncentered_tss(&self) -> f64 {
        self.uncentered_tss
    }

    pub fn k_constant(&self) -> bool {
        self.k_constant
    }

    /// Total sum of squares matching the intercept setting: centered with
    /// an intercept, uncentered without.
    pub fn tss(&self) -> f64 {
        if self.k_constant { self.centered_tss } else { self.uncentered_tss }
    }

    /// Coefficient of determination, `1 − SSR / TSS`. `NaN` when both are 0.
    pub fn rsquared(&self) -> f64 {
        1.0 - self.ssr / self.tss()
    }
}

/// A column that is constant and non-zero acts as the intercept.
fn has_constant_column(exog: &ArrayView2<f64>) -> bool {
    exog.columns().into_iter().any(|col| {
        let first = col[0];
        first != 0.0 && col.iter().all(|&v| v == first)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Exact recovery of coefficients on noiseless data.
    // - Sums of squares, degrees of freedom and intercept detection.
    // - Rank deficiency handling and input validation.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that OLS recovers known coefficients and reports consistent
    // sums of squares on a small noisy design.
    //
    // Given
    // -----
    // - y = 1 + 2·x plus a residual pattern orthogonal to [1, x].
    //
    // Expect
    // ------
    // - params ≈ [2, 1]; SSR equals the squared norm of the residual
    //   pattern; df_resid = n − 2; an intercept is detected.
    fn fit_recovers_coefficients_and_sums_of_squares() {
        // Arrange
        let x = array![0.0, 1.0, 2.0, 3.0];
        let noise = array![1.0, -1.0, -1.0, 1.0]; // orthogonal to 1 and x
        let y = x.mapv(|v| 1.0 + 2.0 * v) + &noise;
        let mut exog = Array2::ones((4, 2));
        exog.column_mut(0).assign(&x);

        // Act
        let fit = RegressionFit::fit(y.view(), exog.view()).expect("fit should succeed");

        // Assert
        assert!((fit.params()[0] - 2.0).abs() < 1e-10, "slope {}", fit.params()[0]);
        assert!((fit.params()[1] - 1.0).abs() < 1e-10, "intercept {}", fit.params()[1]);
        assert!((fit.ssr() - 4.0).abs() < 1e-10);
        assert_eq!(fit.df_resid(), 2.0);
        assert_eq!(fit.df_model(), 1.0);
        assert!(fit.k_constant());
        assert!(fit.rsquared() > 0.0 && fit.rsquared() < 1.0);
    }

    #[test]
    // Purpose
    // -------
    // Ensure that duplicated regressors do not break the solve and that the
    // rank reflects the collinearity.
    //
    // Given
    // -----
    // - Two identical columns plus an intercept.
    //
    // Expect
    // ------
    // - A full-length coefficient vector, rank 2, df_resid = n − 2.
    fn fit_handles_collinear_columns() {
        // Arrange
        let y = array![1.0, 3.0, 2.0, 5.0, 4.0];
        let col = array![1.0, 2.0, 3.0, 4.0, 5.0];
        let mut exog = Array2::ones((5, 3));
        exog.column_mut(0).assign(&col);
        exog.column_mut(1).assign(&col);

        // Act
        let fit = RegressionFit::fit(y.view(), exog.view()).expect("fit should succeed");

        // Assert
        assert_eq!(fit.params().len(), 3);
        assert_eq!(fit.rank(), 2);
        assert_eq!(fit.df_resid(), 3.0);
        assert!((fit.params()[0] - fit.params()[1]).abs() < 1e-8);
    }

    #[test]
    // Purpose
    // -------
    // Check input validation on shapes and non-finite values.
    //
    // Given
    // -----
    // - A length mismatch and a NaN in the design.
    //
    // Expect
    // ------
    // - `ShapeMismatch` and `NonFiniteInput { row: 1 }` respectively.
    fn fit_rejects_malformed_inputs() {
        // Arrange
        let y = array![1.0, 2.0, 3.0];
        let short = Array2::<f64>::ones((2, 1));
        let with_nan = array![[1.0], [f64::NAN], [3.0]];

        // Act
        let mismatch = RegressionFit::fit(y.view(), short.view());
        let non_finite = RegressionFit::fit(y.view(), with_nan.view());

        // Assert
        assert_eq!(mismatch, Err(OLSError::ShapeMismatch { endog: 3, exog: 2 }));
        assert_eq!(non_finite, Err(OLSError::NonFiniteInput { row: 1 }));
    }
}
