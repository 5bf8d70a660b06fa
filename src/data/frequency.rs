//! data::frequency — regular time grids for resampling and lagging.
//!
//! Purpose
//! -------
//! Describe the regular calendar on which each entity's series is observed
//! after resampling, and provide the two calendar operations the rest of
//! the crate needs: mapping an arbitrary timestamp to the label of the
//! bucket that contains it, and moving a bucket label a number of periods
//! forward or backward.
//!
//! Key behaviors
//! -------------
//! - Fixed-span frequencies (seconds, minutes, hours, days, with an integer
//!   multiple) anchor their buckets at midnight of the first observation's
//!   day and label each bucket by its left edge.
//! - Calendar frequencies (weekly ending Sunday, month end, quarter end,
//!   year end) label each bucket by its last calendar day at midnight; a
//!   timestamp belongs to the bucket of its calendar date.
//! - [`Frequency::shift`] is the time-index arithmetic behind lag
//!   construction: `shift(t, -k)` is the label observed `k` periods
//!   before `t`.
//!
//! Conventions
//! -----------
//! - Timestamps are naive (`chrono::NaiveDateTime`); no time-zone logic.
//! - Aliases follow the pandas offset names users already know
//!   (`"D"`, `"5D"`, `"H"`, `"min"`, `"W"`, `"M"`, `"Q"`, `"A"`, …).
use crate::data::errors::{DataError, DataResult};
use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use std::{fmt, str::FromStr};

const MILLIS_PER_SECOND: i64 = 1_000;

/// Frequency — resampling grid for a single entity's series.
///
/// Fixed-span variants carry a strictly positive multiple; calendar
/// variants are always single-period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frequency {
    Seconds(u32),
    Minutes(u32),
    Hours(u32),
    Days(u32),
    /// Weeks ending on Sunday.
    Weekly,
    MonthEnd,
    QuarterEnd,
    YearEnd,
}

impl Frequency {
    /// Reject zero multiples on fixed-span frequencies.
    pub fn validate(&self) -> DataResult<()> {
        match self.span_millis() {
            Some(0) => Err(DataError::InvalidFrequency { reason: "multiple must be positive" }),
            _ => Ok(()),
        }
    }

    /// Span of one period in milliseconds, or `None` for calendar frequencies.
    fn span_millis(&self) -> Option<i64> {
        let seconds = match *self {
            Frequency::Seconds(n) => i64::from(n),
            Frequency::Minutes(n) => 60 * i64::from(n),
            Frequency::Hours(n) => 3_600 * i64::from(n),
            Frequency::Days(n) => 86_400 * i64::from(n),
            _ => return None,
        };
        Some(seconds * MILLIS_PER_SECOND)
    }

    /// Months per period for month-based calendar frequencies.
    fn months_per_period(&self) -> Option<u32> {
        match self {
            Frequency::MonthEnd => Some(1),
            Frequency::QuarterEnd => Some(3),
            Frequency::YearEnd => Some(12),
            _ => None,
        }
    }

    /// Anchor of the bucket grid for a series whose first observation is
    /// `first`: midnight of that day.
    pub fn origin(&self, first: NaiveDateTime) -> NaiveDateTime {
        first.date().and_time(NaiveTime::MIN)
    }

    /// Label of the bucket containing `ts`.
    ///
    /// Parameters
    /// ----------
    /// - `ts`: `NaiveDateTime`
    ///   Timestamp to classify. For fixed-span frequencies it must not lie
    ///   before `origin`.
    /// - `origin`: `NaiveDateTime`
    ///   Grid anchor from [`Frequency::origin`]; ignored by calendar
    ///   frequencies.
    ///
    /// Returns
    /// -------
    /// `Option<NaiveDateTime>`
    ///   The bucket label, or `None` if the label falls outside the range
    ///   `chrono` can represent.
    pub fn bucket(&self, ts: NaiveDateTime, origin: NaiveDateTime) -> Option<NaiveDateTime> {
        if let Some(span) = self.span_millis() {
            let offset = (ts - origin).num_milliseconds();
            let steps = offset.div_euclid(span);
            return origin.checked_add_signed(TimeDelta::try_milliseconds(steps * span)?);
        }

        let date = ts.date();
        let end = match self {
            Frequency::Weekly => {
                let to_sunday = (7 - date.weekday().num_days_from_sunday()) % 7;
                date.checked_add_days(chrono::Days::new(u64::from(to_sunday)))?
            }
            Frequency::MonthEnd => month_end(date.year(), date.month())?,
            Frequency::QuarterEnd => month_end(date.year(), date.month0() / 3 * 3 + 3)?,
            Frequency::YearEnd => month_end(date.year(), 12)?,
            _ => return None,
        };
        Some(end.and_time(NaiveTime::MIN))
    }

    /// Move a bucket label by `periods` periods (negative = into the past).
    ///
    /// Returns `None` when the result cannot be represented.
    pub fn shift(&self, label: NaiveDateTime, periods: i64) -> Option<NaiveDateTime> {
        if let Some(span) = self.span_millis() {
            let delta = TimeDelta::try_milliseconds(span.checked_mul(periods)?)?;
            return label.checked_add_signed(delta);
        }
        if matches!(self, Frequency::Weekly) {
            let delta = TimeDelta::try_days(periods.checked_mul(7)?)?;
            return label.checked_add_signed(delta);
        }

        let months = u32::try_from(periods.unsigned_abs()).ok()?
            .checked_mul(self.months_per_period()?)?;
        let first = label.date().with_day(1)?;
        let moved = if periods >= 0 {
            first.checked_add_months(Months::new(months))?
        } else {
            first.checked_sub_months(Months::new(months))?
        };
        Some(month_end(moved.year(), moved.month())?.and_time(NaiveTime::MIN))
    }
}

/// Last calendar day of `month` in `year`.
fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)?.checked_add_months(Months::new(1))?.pred_opt()
}

impl FromStr for Frequency {
    type Err = DataError;

    /// Parse a pandas-style alias with an optional leading multiple.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let split = trimmed.find(|c: char| !c.is_ascii_digit()).unwrap_or(trimmed.len());
        let (digits, alias) = trimmed.split_at(split);
        let multiple: Option<u32> = if digits.is_empty() {
            None
        } else {
            Some(digits.parse().map_err(|_| DataError::UnknownFrequency { alias: s.to_string() })?)
        };

        let calendar = |freq: Frequency| match multiple {
            None | Some(1) => Ok(freq),
            Some(_) => Err(DataError::InvalidFrequency {
                reason: "calendar frequencies do not support a multiple",
            }),
        };
        let n = multiple.unwrap_or(1);

        let freq = match alias {
            "S" | "s" => Frequency::Seconds(n),
            "T" | "min" => Frequency::Minutes(n),
            "H" | "h" => Frequency::Hours(n),
            "D" | "d" => Frequency::Days(n),
            "W" | "W-SUN" => calendar(Frequency::Weekly)?,
            "M" | "ME" => calendar(Frequency::MonthEnd)?,
            "Q" | "QE" | "Q-DEC" => calendar(Frequency::QuarterEnd)?,
            "A" | "Y" | "YE" | "A-DEC" => calendar(Frequency::YearEnd)?,
            _ => return Err(DataError::UnknownFrequency { alias: s.to_string() }),
        };
        freq.validate()?;
        Ok(freq)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frequency::Seconds(n) => write!(f, "{n}S"),
            Frequency::Minutes(n) => write!(f, "{n}min"),
            Frequency::Hours(n) => write!(f, "{n}H"),
            Frequency::Days(n) => write!(f, "{n}D"),
            Frequency::Weekly => write!(f, "W"),
            Frequency::MonthEnd => write!(f, "M"),
            Frequency::QuarterEnd => write!(f, "Q"),
            Frequency::YearEnd => write!(f, "A"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, 0, 0).unwrap()
    }

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Alias parsing, including multiples and rejected combinations.
    // - Bucket labelling for fixed-span and calendar frequencies.
    // - Label shifting backwards across month and year boundaries.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that pandas-style aliases parse into the expected variants.
    //
    // Given
    // -----
    // - Aliases with and without multiples.
    //
    // Expect
    // ------
    // - Fixed-span aliases keep their multiple; calendar aliases map to
    //   their single-period variants; unknown or zero multiples fail.
    fn frequency_from_str_parses_common_aliases() {
        // Act & Assert
        assert_eq!("D".parse::<Frequency>(), Ok(Frequency::Days(1)));
        assert_eq!("5D".parse::<Frequency>(), Ok(Frequency::Days(5)));
        assert_eq!("15min".parse::<Frequency>(), Ok(Frequency::Minutes(15)));
        assert_eq!("ME".parse::<Frequency>(), Ok(Frequency::MonthEnd));
        assert_eq!("Q".parse::<Frequency>(), Ok(Frequency::QuarterEnd));
        assert!(matches!("2M".parse::<Frequency>(), Err(DataError::InvalidFrequency { .. })));
        assert!(matches!("0D".parse::<Frequency>(), Err(DataError::InvalidFrequency { .. })));
        assert!(matches!("fortnight".parse::<Frequency>(), Err(DataError::UnknownFrequency { .. })));
    }

    #[test]
    // Purpose
    // -------
    // Check fixed-span bucketing anchored at midnight of the first day.
    //
    // Given
    // -----
    // - A 6-hour frequency and an origin at 2024-01-01 00:00.
    //
    // Expect
    // ------
    // - 05:00 falls in the 00:00 bucket and 13:00 in the 12:00 bucket.
    fn bucket_fixed_span_uses_left_edge_labels() {
        // Arrange
        let freq = Frequency::Hours(6);
        let origin = freq.origin(ts(2024, 1, 1, 5));

        // Act
        let first = freq.bucket(ts(2024, 1, 1, 5), origin);
        let second = freq.bucket(ts(2024, 1, 1, 13), origin);

        // Assert
        assert_eq!(first, Some(ts(2024, 1, 1, 0)));
        assert_eq!(second, Some(ts(2024, 1, 1, 12)));
    }

    #[test]
    // Purpose
    // -------
    // Check calendar bucketing by period end date.
    //
    // Given
    // -----
    // - Timestamps inside February 2024 (leap year) and on a Wednesday.
    //
    // Expect
    // ------
    // - Month end is Feb 29; quarter end Mar 31; year end Dec 31; the week
    //   ends on the following Sunday.
    fn bucket_calendar_uses_period_end_labels() {
        // Arrange
        let t = ts(2024, 2, 14, 18); // Wednesday
        let origin = t;

        // Act & Assert
        assert_eq!(Frequency::MonthEnd.bucket(t, origin), Some(ts(2024, 2, 29, 0)));
        assert_eq!(Frequency::QuarterEnd.bucket(t, origin), Some(ts(2024, 3, 31, 0)));
        assert_eq!(Frequency::YearEnd.bucket(t, origin), Some(ts(2024, 12, 31, 0)));
        assert_eq!(Frequency::Weekly.bucket(t, origin), Some(ts(2024, 2, 18, 0)));
    }

    #[test]
    // Purpose
    // -------
    // Verify that shifting month-end labels lands on month ends.
    //
    // Given
    // -----
    // - The label 2024-03-31 under monthly and quarterly frequencies.
    //
    // Expect
    // ------
    // - One month back is Feb 29; one quarter back is Dec 31 of 2023.
    fn shift_month_based_labels_stay_on_period_ends() {
        // Arrange
        let label = ts(2024, 3, 31, 0);

        // Act & Assert
        assert_eq!(Frequency::MonthEnd.shift(label, -1), Some(ts(2024, 2, 29, 0)));
        assert_eq!(Frequency::QuarterEnd.shift(label, -1), Some(ts(2023, 12, 31, 0)));
        assert_eq!(Frequency::Days(2).shift(label, -2), Some(ts(2024, 3, 27, 0)));
    }
}
