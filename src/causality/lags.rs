//! causality::lags — lag specifications and time-aligned lagged tables.
//!
//! Purpose
//! -------
//! Build the design table for a Granger regression: the current `y` and `x`
//! plus their lags, optionally a constant, with every lagged value looked up
//! through the time index rather than by row position.
//!
//! Key behaviors
//! -------------
//! - [`MaxLag`] is the user-facing lag argument (an integer, or a list that
//!   must currently hold exactly one order).
//! - [`LagSpec`] is the validated set of lags to apply: `1..=K`, or `{K}`
//!   alone in single-lag mode.
//! - [`LaggedTable::build`] produces columns `y`, `x`, `y_t-1 … y_t-K`,
//!   `x_t-1 … x_t-K` (and `const`). Row `t`'s `y_t-k` is the `y` observed at
//!   `freq.shift(time_t, -k)`; if that timestamp is not in the index the
//!   value is missing, so calendar gaps never pull in the wrong period.
//! - [`LaggedTable::select_complete`] projects onto a column subset and
//!   drops rows with any missing value in it.
//!
//! Invariants & assumptions
//! ------------------------
//! - All lags are ≥ 1.
//! - Building never mutates or shares storage with the input series.
use crate::{
    causality::errors::{GCError, GCResult},
    data::series::TimeSeries2D,
};
use chrono::NaiveDateTime;
use ndarray::{Array1, Array2, ArrayView1};

/// Name of the constant column added when requested.
pub const CONST_COLUMN: &str = "const";

/// MaxLag — lag argument as supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum MaxLag {
    /// Test lags `1..=K`.
    Order(usize),
    /// Test the single lag `{K}`; only one-element lists are supported.
    List(Vec<usize>),
}

impl From<usize> for MaxLag {
    fn from(order: usize) -> Self {
        MaxLag::Order(order)
    }
}

/// LagSpec — validated lag set plus the maximum lag order.
///
/// Invariants
/// ----------
/// - `lags` is non-empty, every entry ≥ 1, and `maxlag = max(lags)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LagSpec {
    lags: Vec<usize>,
    maxlag: usize,
}

impl LagSpec {
    /// Validate a [`MaxLag`] argument.
    ///
    /// Errors
    /// ------
    /// - `GCError::InvalidMaxLag` for an order of zero.
    /// - `GCError::EmptyLagList` for an empty list.
    /// - `GCError::MultipleLagSetsUnsupported` for lists longer than one.
    pub fn new(maxlag: &MaxLag) -> GCResult<Self> {
        match maxlag {
            MaxLag::Order(k) => LagSpec::range(*k),
            MaxLag::List(list) => match list.as_slice() {
                [] => Err(GCError::EmptyLagList),
                [k] => LagSpec::single(*k),
                _ => Err(GCError::MultipleLagSetsUnsupported { count: list.len() }),
            },
        }
    }

    /// Lags `1..=k`.
    pub fn range(k: usize) -> GCResult<Self> {
        if k == 0 {
            return Err(GCError::InvalidMaxLag { maxlag: k });
        }
        Ok(LagSpec { lags: (1..=k).collect(), maxlag: k })
    }

    /// The single lag `{k}`.
    pub fn single(k: usize) -> GCResult<Self> {
        if k == 0 {
            return Err(GCError::InvalidMaxLag { maxlag: k });
        }
        Ok(LagSpec { lags: vec![k], maxlag: k })
    }

    pub fn lags(&self) -> &[usize] {
        &self.lags
    }

    pub fn maxlag(&self) -> usize {
        self.maxlag
    }

    /// Lagged `y` column names, in lag order.
    pub fn y_names(&self) -> Vec<String> {
        self.lags.iter().map(|lag| format!("y_t-{lag}")).collect()
    }

    /// Lagged `x` column names, in lag order.
    pub fn x_names(&self) -> Vec<String> {
        self.lags.iter().map(|lag| format!("x_t-{lag}")).collect()
    }
}

/// LaggedTable — named columns over a time index.
///
/// Fields
/// ------
/// - `times`: row timestamps.
/// - `names`: column names, unique.
/// - `data`: `nrows × ncols` values, `NaN` for missing.
#[derive(Debug, Clone, PartialEq)]
pub struct LaggedTable {
    times: Vec<NaiveDateTime>,
    names: Vec<String>,
    data: Array2<f64>,
}

impl LaggedTable {
    /// Build the lagged design table for `series`.
    ///
    /// Parameters
    /// ----------
    /// - `series`: `&TimeSeries2D`
    ///   Source series; its frequency defines what "one period earlier" is.
    /// - `spec`: `&LagSpec`
    ///   Lags to materialize.
    /// - `add_constant`: `bool`
    ///   Append a `const` column of ones.
    ///
    /// Returns
    /// -------
    /// `LaggedTable` with one row per series row and columns `y`, `x`, the
    /// `y` lags, the `x` lags, then `const` if requested.
    pub fn build(series: &TimeSeries2D, spec: &LagSpec, add_constant: bool) -> Self {
        let nrows = series.len();
        let ncols = 2 + 2 * spec.lags().len() + usize::from(add_constant);
        let mut data = Array2::from_elem((nrows, ncols), f64::NAN);
        let mut names = Vec::with_capacity(ncols);

        data.column_mut(0).assign(series.y());
        data.column_mut(1).assign(series.x());
        names.push("y".to_string());
        names.push("x".to_string());

        let lagged_y: Vec<Array1<f64>> =
            spec.lags().iter().map(|&lag| lag_column(series, series.y(), lag)).collect();
        let lagged_x: Vec<Array1<f64>> =
            spec.lags().iter().map(|&lag| lag_column(series, series.x(), lag)).collect();

        let mut col = 2;
        for (column, name) in lagged_y.iter().zip(spec.y_names()) {
            data.column_mut(col).assign(column);
            names.push(name);
            col += 1;
        }
        for (column, name) in lagged_x.iter().zip(spec.x_names()) {
            data.column_mut(col).assign(column);
            names.push(name);
            col += 1;
        }
        if add_constant {
            data.column_mut(col).fill(1.0);
            names.push(CONST_COLUMN.to_string());
        }

        LaggedTable { times: series.times().to_vec(), names, data }
    }

    pub fn times(&self) -> &[NaiveDateTime] {
        &self.times
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }

    pub fn nrows(&self) -> usize {
        self.data.nrows()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn column(&self, name: &str) -> Option<ArrayView1<'_, f64>> {
        self.column_index(name).map(|j| self.data.column(j))
    }

    /// Copy the given columns (in that order) into a design matrix.
    ///
    /// Returns `None` if any name is not a column of this table.
    pub fn design<S: AsRef<str>>(&self, columns: &[S]) -> Option<Array2<f64>> {
        let idx: Vec<usize> =
            columns.iter().map(|c| self.column_index(c.as_ref())).collect::<Option<_>>()?;
        Some(self.data.select(ndarray::Axis(1), &idx))
    }

    /// Project onto `columns` and keep only rows complete in all of them.
    ///
    /// Returns `None` if any name is not a column of this table.
    pub fn select_complete<S: AsRef<str>>(&self, columns: &[S]) -> Option<LaggedTable> {
        let projected = self.design(columns)?;
        let keep: Vec<usize> = projected
            .rows()
            .into_iter()
            .enumerate()
            .filter(|(_, row)| row.iter().all(|v| !v.is_nan()))
            .map(|(i, _)| i)
            .collect();

        Some(LaggedTable {
            times: keep.iter().map(|&i| self.times[i]).collect(),
            names: columns.iter().map(|c| c.as_ref().to_string()).collect(),
            data: projected.select(ndarray::Axis(0), &keep),
        })
    }
}

/// Values of `values` observed `lag` periods before each row's timestamp.
fn lag_column(series: &TimeSeries2D, values: &Array1<f64>, lag: usize) -> Array1<f64> {
    let freq = series.freq();
    let back = -(lag as i64);
    series
        .times()
        .iter()
        .map(|&t| {
            freq.shift(t, back)
                .and_then(|earlier| series.position(earlier))
                .map_or(f64::NAN, |pos| values[pos])
        })
        .collect()
}
