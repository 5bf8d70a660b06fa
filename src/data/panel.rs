//! data::panel — two-level (entity × time) tables and their per-entity split.
//!
//! Purpose
//! -------
//! Accept panel data in long format — one row per (entity, time) pair with
//! any number of numeric value columns — validate its index and column
//! selection, and split it into one resampled [`TimeSeries2D`] per entity.
//!
//! Key behaviors
//! -------------
//! - [`PanelFrame`] is the raw table: a row index made of [`IndexLevel`]s
//!   plus named value columns. Its constructor only checks lengths.
//! - [`PanelDataset::from_frame`] enforces the panel contract: exactly two
//!   index levels, exactly one of which is a time axis (either order is
//!   accepted), and a `y`/`x` column choice that is either fully explicit
//!   or fully defaulted to the first two columns.
//! - Entities and times are sorted and only entities that actually occur
//!   are kept; each entity's rows are resampled onto the configured
//!   [`Frequency`].
//! - When every entity label parses as an integer the entities are ordered
//!   numerically (`"2"` before `"10"`), otherwise lexicographically.
//!
//! Invariants & assumptions
//! ------------------------
//! - After construction, every entity maps to a series with strictly
//!   increasing bucket labels and canonical `y`/`x` columns.
//! - Rows are sorted stably, so duplicated (entity, time) rows resolve to
//!   the row that came later in the input.
use crate::data::{
    errors::{DataError, DataResult},
    frequency::Frequency,
    series::TimeSeries2D,
};
use chrono::NaiveDateTime;
use std::{cmp::Ordering, collections::BTreeMap};

/// One level of a panel row index.
#[derive(Debug, Clone, PartialEq)]
pub enum IndexLevel {
    /// Date/time-typed level.
    Time(Vec<NaiveDateTime>),
    /// Any other level; its values identify entities.
    Labels(Vec<String>),
}

impl IndexLevel {
    fn len(&self) -> usize {
        match self {
            IndexLevel::Time(values) => values.len(),
            IndexLevel::Labels(values) => values.len(),
        }
    }
}

/// PanelFrame — raw long-format panel table.
///
/// Fields
/// ------
/// - `index`: `Vec<IndexLevel>`
///   Row index levels; the panel contract expects two of them, but that is
///   checked by [`PanelDataset::from_frame`], not here.
/// - `columns`: `Vec<(String, Vec<f64>)>`
///   Named value columns, one entry per row, `NaN` for missing.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelFrame {
    index: Vec<IndexLevel>,
    columns: Vec<(String, Vec<f64>)>,
}

impl PanelFrame {
    /// Build a frame, checking that every level and column has one entry
    /// per row.
    ///
    /// Errors
    /// ------
    /// - `DataError::InvalidIndex` if `index` is empty.
    /// - `DataError::LengthMismatch` naming the first level or column whose
    ///   length differs from the first level's.
    pub fn new(index: Vec<IndexLevel>, columns: Vec<(String, Vec<f64>)>) -> DataResult<Self> {
        let Some(nrows) = index.first().map(IndexLevel::len) else {
            return Err(DataError::InvalidIndex { reason: "the row index has no levels" });
        };
        for (level, values) in index.iter().enumerate() {
            if values.len() != nrows {
                return Err(DataError::LengthMismatch {
                    what: format!("index level {level}"),
                    expected: nrows,
                    actual: values.len(),
                });
            }
        }
        for (name, values) in &columns {
            if values.len() != nrows {
                return Err(DataError::LengthMismatch {
                    what: format!("column '{name}'"),
                    expected: nrows,
                    actual: values.len(),
                });
            }
        }
        Ok(PanelFrame { index, columns })
    }

    /// Convenience constructor for the common (entity, time) layout.
    pub fn from_long(
        entities: Vec<String>, times: Vec<NaiveDateTime>, columns: Vec<(String, Vec<f64>)>,
    ) -> DataResult<Self> {
        PanelFrame::new(vec![IndexLevel::Labels(entities), IndexLevel::Time(times)], columns)
    }

    pub fn nrows(&self) -> usize {
        self.index.first().map_or(0, IndexLevel::len)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    fn column(&self, name: &str) -> DataResult<&[f64]> {
        self.columns
            .iter()
            .find(|(col, _)| col == name)
            .map(|(_, values)| values.as_slice())
            .ok_or_else(|| DataError::UnknownColumn { name: name.to_string() })
    }
}

/// PanelDataset — validated panel split into per-entity resampled series.
///
/// Invariants
/// ----------
/// - `order` lists every `series` key once, numerically sorted when all
///   labels are integers and lexicographically otherwise; each entity has
///   at least one raw observation.
/// - `times` holds the sorted distinct raw timestamps of the whole panel.
/// - Every series is on `freq` with canonical `y`/`x` columns.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelDataset {
    freq: Frequency,
    y_name: String,
    x_name: String,
    times: Vec<NaiveDateTime>,
    order: Vec<String>,
    series: BTreeMap<String, TimeSeries2D>,
}

impl PanelDataset {
    /// Validate a raw frame and split it into per-entity series.
    ///
    /// Parameters
    /// ----------
    /// - `frame`: `&PanelFrame`
    ///   Raw table with an (entity, time) or (time, entity) index.
    /// - `freq`: [`Frequency`]
    ///   Grid each entity is resampled onto.
    /// - `x`, `y`: `Option<&str>`
    ///   Column overrides. Give both or neither; with neither, the first
    ///   column is `y` and the second is `x`.
    ///
    /// Errors
    /// ------
    /// - `DataError::InvalidIndex` unless there are exactly two levels and
    ///   exactly one is [`IndexLevel::Time`].
    /// - `DataError::ColumnSpec` when only one of `x`/`y` is given.
    /// - `DataError::TooFewColumns` / `DataError::UnknownColumn` when the
    ///   value columns cannot be resolved.
    /// - `DataError::EmptyPanel` when the frame has no rows.
    /// - Resampling errors from [`TimeSeries2D::resample`].
    pub fn from_frame(
        frame: &PanelFrame, freq: Frequency, x: Option<&str>, y: Option<&str>,
    ) -> DataResult<Self> {
        let (entities, times) = match frame.index.as_slice() {
            [IndexLevel::Labels(e), IndexLevel::Time(t)] => (e, t),
            [IndexLevel::Time(t), IndexLevel::Labels(e)] => (e, t),
            [_, _] => {
                return Err(DataError::InvalidIndex {
                    reason: "exactly one of the two levels has to be a time axis",
                });
            }
            _ => {
                return Err(DataError::InvalidIndex {
                    reason: "the row index must have exactly two levels (entity, time)",
                });
            }
        };

        let (y_name, x_name) = match (y, x) {
            (Some(y), Some(x)) => (y.to_string(), x.to_string()),
            (None, None) => {
                let mut names = frame.column_names();
                match (names.next(), names.next()) {
                    (Some(y), Some(x)) => (y.to_string(), x.to_string()),
                    _ => return Err(DataError::TooFewColumns { found: frame.columns.len() }),
                }
            }
            _ => return Err(DataError::ColumnSpec),
        };
        let y_values = frame.column(&y_name)?;
        let x_values = frame.column(&x_name)?;

        if frame.nrows() == 0 {
            return Err(DataError::EmptyPanel);
        }

        let numeric: Option<Vec<i64>> = entities.iter().map(|e| e.trim().parse().ok()).collect();
        let mut rows: Vec<usize> = (0..frame.nrows()).collect();
        rows.sort_by(|&a, &b| {
            numeric
                .as_ref()
                .map_or(Ordering::Equal, |keys| keys[a].cmp(&keys[b]))
                .then_with(|| entities[a].cmp(&entities[b]))
                .then(times[a].cmp(&times[b]))
        });

        let mut order = Vec::new();
        let mut series = BTreeMap::new();
        for group in rows.chunk_by(|&a, &b| entities[a] == entities[b]) {
            let group_times: Vec<NaiveDateTime> = group.iter().map(|&r| times[r]).collect();
            let group_y: Vec<f64> = group.iter().map(|&r| y_values[r]).collect();
            let group_x: Vec<f64> = group.iter().map(|&r| x_values[r]).collect();
            let resampled = TimeSeries2D::resample(freq, &group_times, &group_y, &group_x)?;
            let entity = entities[group[0]].clone();
            order.push(entity.clone());
            series.insert(entity, resampled);
        }

        let mut distinct_times = times.clone();
        distinct_times.sort_unstable();
        distinct_times.dedup();

        Ok(PanelDataset { freq, y_name, x_name, times: distinct_times, order, series })
    }

    pub fn freq(&self) -> Frequency {
        self.freq
    }

    /// Raw column names mapped to `y` and `x`, in that order.
    pub fn value_columns(&self) -> (&str, &str) {
        (&self.y_name, &self.x_name)
    }

    /// Entity identifiers in panel order.
    pub fn entities(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Sorted distinct timestamps across all entities (before resampling).
    pub fn times(&self) -> &[NaiveDateTime] {
        &self.times
    }

    pub fn n_entities(&self) -> usize {
        self.series.len()
    }

    pub fn series(&self, entity: &str) -> Option<&TimeSeries2D> {
        self.series.get(entity)
    }

    /// `(entity, series)` pairs in panel order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TimeSeries2D)> {
        self.order
            .iter()
            .filter_map(|entity| self.series.get(entity).map(|series| (entity.as_str(), series)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    fn columns() -> Vec<(String, Vec<f64>)> {
        vec![
            ("sales".to_string(), vec![1.0, 2.0, 3.0, 4.0]),
            ("ads".to_string(), vec![0.1, 0.2, 0.3, 0.4]),
            ("other".to_string(), vec![9.0, 9.0, 9.0, 9.0]),
        ]
    }

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Index-shape validation (level count and time-level count).
    // - The all-or-nothing x/y column rule and column defaulting.
    // - Per-entity splitting with either level order.
    // - Numeric ordering of integer entity labels.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Ensure that indexes with zero or two time levels are rejected.
    //
    // Given
    // -----
    // - A frame with two label levels and one with two time levels.
    //
    // Expect
    // ------
    // - Both return `DataError::InvalidIndex`.
    fn from_frame_rejects_wrong_number_of_time_levels() {
        // Arrange
        let labels = IndexLevel::Labels(vec!["a".into(), "a".into(), "b".into(), "b".into()]);
        let times = IndexLevel::Time(vec![day(1), day(2), day(1), day(2)]);
        let no_time = PanelFrame::new(vec![labels.clone(), labels], columns()).unwrap();
        let two_time = PanelFrame::new(vec![times.clone(), times], columns()).unwrap();

        // Act
        let r1 = PanelDataset::from_frame(&no_time, Frequency::Days(1), None, None);
        let r2 = PanelDataset::from_frame(&two_time, Frequency::Days(1), None, None);

        // Assert
        assert!(matches!(r1, Err(DataError::InvalidIndex { .. })), "got {r1:?}");
        assert!(matches!(r2, Err(DataError::InvalidIndex { .. })), "got {r2:?}");
    }

    #[test]
    // Purpose
    // -------
    // Verify the x/y override rule.
    //
    // Given
    // -----
    // - A valid two-level frame with three value columns.
    //
    // Expect
    // ------
    // - Only `y` given fails with `ColumnSpec`; neither given defaults to
    //   the first two columns; both given selects them.
    fn from_frame_applies_column_selection_rules() {
        // Arrange
        let frame = PanelFrame::from_long(
            vec!["a".into(), "a".into(), "b".into(), "b".into()],
            vec![day(1), day(2), day(1), day(2)],
            columns(),
        )
        .unwrap();

        // Act
        let partial = PanelDataset::from_frame(&frame, Frequency::Days(1), None, Some("sales"));
        let defaulted = PanelDataset::from_frame(&frame, Frequency::Days(1), None, None).unwrap();
        let explicit =
            PanelDataset::from_frame(&frame, Frequency::Days(1), Some("other"), Some("ads"))
                .unwrap();

        // Assert
        assert_eq!(partial, Err(DataError::ColumnSpec));
        assert_eq!(defaulted.value_columns(), ("sales", "ads"));
        assert_eq!(explicit.value_columns(), ("ads", "other"));
        assert_eq!(explicit.series("b").unwrap().y()[1], 0.4);
    }

    #[test]
    // Purpose
    // -------
    // Check that a (time, entity) index is accepted and entities come out
    // sorted with their rows in time order.
    //
    // Given
    // -----
    // - Rows listed out of order with the time level first.
    //
    // Expect
    // ------
    // - Entities ["a", "b"]; entity "a" has y = [2.0, 1.0] ordered by time.
    fn from_frame_swaps_levels_and_sorts() {
        // Arrange
        let frame = PanelFrame::new(
            vec![
                IndexLevel::Time(vec![day(2), day(1), day(1), day(2)]),
                IndexLevel::Labels(vec!["b".into(), "a".into(), "b".into(), "a".into()]),
            ],
            vec![
                ("y".to_string(), vec![4.0, 2.0, 3.0, 1.0]),
                ("x".to_string(), vec![0.0; 4]),
            ],
        )
        .unwrap();

        // Act
        let dataset = PanelDataset::from_frame(&frame, Frequency::Days(1), None, None).unwrap();

        // Assert
        assert_eq!(dataset.entities().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(dataset.series("a").unwrap().y().to_vec(), vec![2.0, 1.0]);
        assert_eq!(dataset.series("b").unwrap().y().to_vec(), vec![3.0, 4.0]);
        assert_eq!(dataset.times(), &[day(1), day(2)]);
    }

    #[test]
    // Purpose
    // -------
    // Verify that integer labels are ordered numerically and mixed labels
    // lexicographically.
    //
    // Given
    // -----
    // - Labels "10", "2", "1" (all integers).
    // - Labels "10", "2", "b" (mixed).
    //
    // Expect
    // ------
    // - ["1", "2", "10"] and ["10", "2", "b"] respectively, with `iter()`
    //   following the same order.
    fn from_frame_orders_integer_labels_numerically() {
        // Arrange
        let build = |ids: [&str; 3]| {
            PanelFrame::from_long(
                ids.iter().map(|s| s.to_string()).collect(),
                vec![day(1), day(1), day(1)],
                vec![("y".to_string(), vec![1.0, 2.0, 3.0]), ("x".to_string(), vec![0.0; 3])],
            )
            .unwrap()
        };

        // Act
        let numeric =
            PanelDataset::from_frame(&build(["10", "2", "1"]), Frequency::Days(1), None, None)
                .unwrap();
        let mixed =
            PanelDataset::from_frame(&build(["10", "2", "b"]), Frequency::Days(1), None, None)
                .unwrap();

        // Assert
        assert_eq!(numeric.entities().collect::<Vec<_>>(), vec!["1", "2", "10"]);
        assert_eq!(numeric.iter().map(|(e, _)| e).collect::<Vec<_>>(), vec!["1", "2", "10"]);
        assert_eq!(numeric.series("10").unwrap().y()[0], 1.0);
        assert_eq!(mixed.entities().collect::<Vec<_>>(), vec!["10", "2", "b"]);
    }
}
