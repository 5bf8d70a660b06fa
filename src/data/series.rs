//! data::series — a single entity's (y, x) series on a time index.
//!
//! Purpose
//! -------
//! Hold one entity's pair of series together with the timestamps they are
//! observed at, and provide the last-observation-per-bucket resampling that
//! places irregular raw observations onto a regular [`Frequency`] grid.
//!
//! Key behaviors
//! -------------
//! - [`TimeSeries2D::new`] validates lengths, frequency and strictly
//!   increasing timestamps.
//! - [`TimeSeries2D::resample`] collapses duplicate or intra-period
//!   observations to the last non-missing value per column and inserts
//!   explicit missing rows for empty periods between the first and last
//!   occupied bucket.
//! - [`TimeSeries2D::position`] looks a timestamp up in the index; lag
//!   construction uses it together with [`Frequency::shift`] so gaps in the
//!   calendar propagate as missing lagged values.
//!
//! Conventions
//! -----------
//! - Missing values are `f64::NAN`, in both inputs and outputs.
use crate::data::{
    errors::{DataError, DataResult},
    frequency::Frequency,
};
use chrono::NaiveDateTime;
use ndarray::Array1;

/// TimeSeries2D — timestamps plus aligned `y` and `x` columns.
///
/// Invariants
/// ----------
/// - `times`, `y` and `x` have equal length.
/// - `times` is strictly increasing.
/// - `freq` has passed [`Frequency::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries2D {
    freq: Frequency,
    times: Vec<NaiveDateTime>,
    y: Array1<f64>,
    x: Array1<f64>,
}

impl TimeSeries2D {
    /// Build a validated series from already-regular data.
    ///
    /// Errors
    /// ------
    /// - `DataError::InvalidFrequency` for a zero frequency multiple.
    /// - `DataError::LengthMismatch` if `y` or `x` do not match `times`.
    /// - `DataError::NonMonotonicTimes { index }` at the first timestamp
    ///   that does not strictly exceed its predecessor.
    pub fn new(
        freq: Frequency, times: Vec<NaiveDateTime>, y: Array1<f64>, x: Array1<f64>,
    ) -> DataResult<Self> {
        freq.validate()?;
        check_len("column 'y'", times.len(), y.len())?;
        check_len("column 'x'", times.len(), x.len())?;
        if let Some(index) = times.windows(2).position(|w| w[1] <= w[0]) {
            return Err(DataError::NonMonotonicTimes { index: index + 1 });
        }
        Ok(TimeSeries2D { freq, times, y, x })
    }

    /// Resample raw observations onto `freq`, keeping the last non-missing
    /// value of each column within each bucket.
    ///
    /// Parameters
    /// ----------
    /// - `freq`: [`Frequency`]
    ///   Target grid.
    /// - `times`: `&[NaiveDateTime]`
    ///   Raw timestamps, non-decreasing. Ties are allowed; the later entry
    ///   wins.
    /// - `y`, `x`: `&[f64]`
    ///   Raw values aligned with `times`; `NaN` marks a missing value.
    ///
    /// Returns
    /// -------
    /// `DataResult<TimeSeries2D>`
    ///   A series whose index is every bucket label from the first to the
    ///   last occupied bucket. Buckets without a valid value for a column
    ///   hold `NaN` in that column.
    ///
    /// Errors
    /// ------
    /// - `DataError::LengthMismatch` when `y`/`x` do not match `times`.
    /// - `DataError::NonMonotonicTimes` when `times` decreases.
    /// - `DataError::InvalidFrequency` for zero multiples or timestamps whose
    ///   bucket labels cannot be represented.
    pub fn resample(
        freq: Frequency, times: &[NaiveDateTime], y: &[f64], x: &[f64],
    ) -> DataResult<Self> {
        freq.validate()?;
        check_len("column 'y'", times.len(), y.len())?;
        check_len("column 'x'", times.len(), x.len())?;
        if let Some(index) = times.windows(2).position(|w| w[1] < w[0]) {
            return Err(DataError::NonMonotonicTimes { index: index + 1 });
        }
        let Some(&first) = times.first() else {
            return TimeSeries2D::new(freq, Vec::new(), Array1::zeros(0), Array1::zeros(0));
        };

        let origin = freq.origin(first);
        let labels: Vec<NaiveDateTime> = times
            .iter()
            .map(|&t| freq.bucket(t, origin).ok_or(OUT_OF_RANGE))
            .collect::<DataResult<_>>()?;

        let mut grid: Vec<NaiveDateTime> = Vec::new();
        let mut label = labels[0];
        let last = labels[labels.len() - 1];
        while label <= last {
            grid.push(label);
            label = freq.shift(label, 1).ok_or(OUT_OF_RANGE)?;
        }

        let mut y_out = Array1::from_elem(grid.len(), f64::NAN);
        let mut x_out = Array1::from_elem(grid.len(), f64::NAN);
        let mut slot = 0;
        for ((&obs_label, &y_val), &x_val) in labels.iter().zip(y).zip(x) {
            while grid[slot] < obs_label {
                slot += 1;
            }
            if !y_val.is_nan() {
                y_out[slot] = y_val;
            }
            if !x_val.is_nan() {
                x_out[slot] = x_val;
            }
        }

        TimeSeries2D::new(freq, grid, y_out, x_out)
    }

    pub fn freq(&self) -> Frequency {
        self.freq
    }

    pub fn times(&self) -> &[NaiveDateTime] {
        &self.times
    }

    pub fn y(&self) -> &Array1<f64> {
        &self.y
    }

    pub fn x(&self) -> &Array1<f64> {
        &self.x
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Row position of timestamp `t`, if it is part of the index.
    pub fn position(&self, t: NaiveDateTime) -> Option<usize> {
        self.times.binary_search(&t).ok()
    }
}

const OUT_OF_RANGE: DataError =
    DataError::InvalidFrequency { reason: "bucket label outside the representable time range" };

fn check_len(what: &str, expected: usize, actual: usize) -> DataResult<()> {
    if expected != actual {
        return Err(DataError::LengthMismatch { what: what.to_string(), expected, actual });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ndarray::array;

    fn day(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap().and_hms_opt(h, 0, 0).unwrap()
    }

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Validation in `TimeSeries2D::new`.
    // - Last-non-missing collapsing and explicit gaps in `resample`.
    //
    // They intentionally DO NOT cover:
    // - Calendar arithmetic itself, tested in `data::frequency`.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Ensure non-increasing timestamps are rejected.
    //
    // Given
    // -----
    // - Three timestamps where the third repeats the second.
    //
    // Expect
    // ------
    // - `NonMonotonicTimes { index: 2 }`.
    fn new_rejects_duplicate_timestamps() {
        // Arrange
        let times = vec![day(1, 0), day(2, 0), day(2, 0)];

        // Act
        let result =
            TimeSeries2D::new(Frequency::Days(1), times, array![1.0, 2.0, 3.0], array![0.0, 0.0, 0.0]);

        // Assert
        assert_eq!(result, Err(DataError::NonMonotonicTimes { index: 2 }));
    }

    #[test]
    // Purpose
    // -------
    // Verify that resampling keeps the last non-missing value per column
    // and materializes empty periods as missing rows.
    //
    // Given
    // -----
    // - Two observations on Jan 1 (the later one with a missing `x`), none
    //   on Jan 2, and one on Jan 3.
    //
    // Expect
    // ------
    // - Three daily rows; Jan 1 has y from the later entry and x from the
    //   earlier one; Jan 2 is all missing.
    fn resample_collapses_intra_period_duplicates_and_fills_gaps() {
        // Arrange
        let times = [day(1, 9), day(1, 17), day(3, 12)];
        let y = [1.0, 2.0, 3.0];
        let x = [10.0, f64::NAN, 30.0];

        // Act
        let series = TimeSeries2D::resample(Frequency::Days(1), &times, &y, &x)
            .expect("resampling should succeed");

        // Assert
        assert_eq!(series.times(), &[day(1, 0), day(2, 0), day(3, 0)]);
        assert_eq!(series.y()[0], 2.0);
        assert_eq!(series.x()[0], 10.0);
        assert!(series.y()[1].is_nan() && series.x()[1].is_nan());
        assert_eq!(series.y()[2], 3.0);
        assert_eq!(series.position(day(3, 0)), Some(2));
    }
}
