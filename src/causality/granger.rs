//! causality::granger — single-entity Granger-causality F test with gaps.
//!
//! Purpose
//! -------
//! Test whether lagged values of `x` help predict `y` beyond `y`'s own lags
//! for one entity, on data that may contain missing observations and
//! calendar gaps. The test compares a restricted regression (`y` on its own
//! lags) with an unrestricted one (`y` on its own and `x`'s lags) through
//! the SSR-based Wald/F statistic.
//!
//! Key behaviors
//! -------------
//! - Lagged regressors are built through the time index
//!   ([`LaggedTable::build`]), so a missing period yields missing lags
//!   rather than a mis-aligned observation.
//! - Both regressions are fitted on exactly the same rows: any row with a
//!   missing `y` or a missing unrestricted regressor is dropped before
//!   either fit.
//! - Degenerate unrestricted fits (zero TSS, zero SSR, undefined R²,
//!   `SSR/TSS < ε`, or a coefficient count mismatch) fail with
//!   `GCError::InfeasibleTest` instead of returning a meaningless statistic.
//! - The statistic is
//!   `W = ((SSR_own − SSR_full) / SSR_full) / K · df_resid_full`
//!   with an F(K, df_resid_full) upper-tail p-value.
//!
//! Invariants & assumptions
//! ------------------------
//! - `K` is the maximum lag order, also in single-lag mode.
//! - `T` is the number of rows that survive the missing-value filter.
//! - The computation is deterministic: identical inputs give bit-identical
//!   `W`, p-value and `T`.
//!
//! Downstream usage
//! ----------------
//! - The panel orchestrator calls [`GCOutcome::granger_causality`] per
//!   entity and keeps `W` and `T` for the Dumitrescu–Hurlin aggregation.
use crate::{
    causality::{
        errors::{GCError, GCResult},
        lags::{CONST_COLUMN, LagSpec, LaggedTable, MaxLag},
    },
    data::series::TimeSeries2D,
    regression::ols::RegressionFit,
};
use statrs::distribution::{ContinuousCDF, FisherSnedecor};
use std::fmt;

/// GCOutcome — result of one single-entity Granger-causality test.
///
/// Fields
/// ------
/// - `series`: the entity's original series (owned copy).
/// - `cleaned`: lagged table restricted to `y` and the unrestricted
///   regressors, with incomplete rows dropped.
/// - `w`: Wald statistic.
/// - `dfn`, `dfd`: F-distribution degrees of freedom (`K`, full model
///   residual df).
/// - `p_value`: upper-tail F probability of `w`.
/// - `ylags`, `xlags`: names of the lag columns used.
/// - `k`: lag order; `t`: effective sample size.
/// - `own_fit`, `full_fit`: the restricted and unrestricted regressions.
///
/// Invariants
/// ----------
/// - `own_fit.nobs() == full_fit.nobs() == t == cleaned.nrows()`.
/// - `p_value ∈ [0, 1]` and `w ≥ 0` up to rounding for well-posed inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct GCOutcome {
    series: TimeSeries2D,
    cleaned: LaggedTable,
    w: f64,
    dfn: usize,
    dfd: f64,
    p_value: f64,
    ylags: Vec<String>,
    xlags: Vec<String>,
    k: usize,
    t: usize,
    own_fit: RegressionFit,
    full_fit: RegressionFit,
}

impl GCOutcome {
    /// Run the gap-aware Granger-causality test `x → y` on one series.
    ///
    /// Parameters
    /// ----------
    /// - `series`: `&TimeSeries2D`
    ///   The entity's `y`/`x` series on a regular grid; `NaN` marks missing
    ///   values.
    /// - `maxlag`: `&MaxLag`
    ///   `Order(K)` tests lags `1..=K`; `List(vec![K])` tests `{K}` only.
    /// - `add_constant`: `bool`
    ///   Include an intercept in both regressions.
    ///
    /// Returns
    /// -------
    /// `GCResult<GCOutcome>`
    ///
    /// Errors
    /// ------
    /// - `GCError::InvalidMaxLag`, `GCError::EmptyLagList`,
    ///   `GCError::MultipleLagSetsUnsupported` for a bad lag argument; no
    ///   regression is attempted.
    /// - `GCError::InsufficientSample` if the complete-case sample is not
    ///   larger than the number of unrestricted regressors.
    /// - `GCError::InfeasibleTest` if the unrestricted fit is degenerate.
    /// - `GCError::Regression` / `GCError::Distribution` on numerical
    ///   failure of the solver or the F distribution.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use chrono::NaiveDate;
    /// # use ndarray::Array1;
    /// # use panel_causality::causality::{GCOutcome, MaxLag};
    /// # use panel_causality::data::{Frequency, TimeSeries2D};
    /// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
    /// let times = (0..40).map(|d| start + chrono::TimeDelta::days(d)).collect();
    /// let x: Array1<f64> = (0..40).map(|t| ((t * 7 % 11) as f64).sin()).collect();
    /// let y: Array1<f64> = (0..40).map(|t| ((t * 5 % 13) as f64).cos()).collect();
    /// let series = TimeSeries2D::new(Frequency::Days(1), times, y, x).unwrap();
    ///
    /// let outcome = GCOutcome::granger_causality(&series, &MaxLag::Order(2), true).unwrap();
    /// assert_eq!(outcome.t(), 38);
    /// assert!((0.0..=1.0).contains(&outcome.p_value()));
    /// ```
    pub fn granger_causality(
        series: &TimeSeries2D, maxlag: &MaxLag, add_constant: bool,
    ) -> GCResult<Self> {
        let spec = LagSpec::new(maxlag)?;
        let table = LaggedTable::build(series, &spec, add_constant);

        let ylags = spec.y_names();
        let xlags = spec.x_names();
        let constant: Vec<String> =
            if add_constant { vec![CONST_COLUMN.to_string()] } else { Vec::new() };
        let own_exog: Vec<String> = ylags.iter().chain(&constant).cloned().collect();
        let full_exog: Vec<String> = ylags.iter().chain(&xlags).chain(&constant).cloned().collect();

        let mut kept: Vec<&str> = vec!["y"];
        kept.extend(full_exog.iter().map(String::as_str));
        let cleaned = table
            .select_complete(kept.as_slice())
            .ok_or_else(|| missing_column(&table, kept.as_slice()))?;

        let nobs = cleaned.nrows();
        if nobs <= full_exog.len() {
            return Err(GCError::InsufficientSample { nobs, nexog: full_exog.len() });
        }

        let endog = cleaned.column("y").ok_or_else(|| missing_column(&cleaned, &["y"][..]))?;
        let own_design = cleaned
            .design(own_exog.as_slice())
            .ok_or_else(|| missing_column(&cleaned, own_exog.as_slice()))?;
        let full_design = cleaned
            .design(full_exog.as_slice())
            .ok_or_else(|| missing_column(&cleaned, full_exog.as_slice()))?;
        let own_fit = RegressionFit::fit(endog, own_design.view())?;
        let full_fit = RegressionFit::fit(endog, full_design.view())?;

        check_feasible(&full_fit, full_exog.len())?;

        let k = spec.maxlag();
        let dfd = full_fit.df_resid();
        let w = (own_fit.ssr() - full_fit.ssr()) / full_fit.ssr() / k as f64 * dfd;
        let p_value = FisherSnedecor::new(k as f64, dfd)
            .map_err(|e| GCError::Distribution(e.to_string()))?
            .sf(w);

        Ok(GCOutcome {
            series: series.clone(),
            cleaned,
            w,
            dfn: k,
            dfd,
            p_value,
            ylags,
            xlags,
            k,
            t: nobs,
            own_fit,
            full_fit,
        })
    }

    /// Wald statistic `W`.
    pub fn w(&self) -> f64 {
        self.w
    }

    /// Upper-tail F(dfn, dfd) probability of `W`.
    pub fn p_value(&self) -> f64 {
        self.p_value
    }

    pub fn dfn(&self) -> usize {
        self.dfn
    }

    pub fn dfd(&self) -> f64 {
        self.dfd
    }

    /// Lag order `K`.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Effective sample size after gap/missing-value removal.
    pub fn t(&self) -> usize {
        self.t
    }

    pub fn series(&self) -> &TimeSeries2D {
        &self.series
    }

    pub fn cleaned(&self) -> &LaggedTable {
        &self.cleaned
    }

    pub fn ylags(&self) -> &[String] {
        &self.ylags
    }

    pub fn xlags(&self) -> &[String] {
        &self.xlags
    }

    /// Restricted regression: `y` on its own lags.
    pub fn own_fit(&self) -> &RegressionFit {
        &self.own_fit
    }

    /// Unrestricted regression: `y` on its own and `x`'s lags.
    pub fn full_fit(&self) -> &RegressionFit {
        &self.full_fit
    }
}

impl fmt::Display for GCOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.w, self.p_value, self.dfd, self.dfn)
    }
}

/// Name the first of `names` that `table` lacks.
fn missing_column<S: AsRef<str>>(table: &LaggedTable, names: &[S]) -> GCError {
    let name = names
        .iter()
        .map(AsRef::as_ref)
        .find(|name| table.column_index(name).is_none())
        .unwrap_or_default();
    GCError::MissingColumn { name: name.to_string() }
}

/// Reject unrestricted fits for which the F statistic is undefined.
fn check_feasible(full: &RegressionFit, nexog: usize) -> GCResult<()> {
    let tss = full.tss();
    if tss == 0.0
        || full.ssr() == 0.0
        || full.rsquared().is_nan()
        || full.ssr() / tss < f64::EPSILON
        || full.params().len() != nexog
    {
        return Err(GCError::InfeasibleTest {
            reason: "the unrestricted regression has a perfect fit of the data",
        });
    }
    Ok(())
}
