//! Conversion helpers for the PyO3 boundary.
//!
//! Turn loosely typed Python inputs (numpy arrays, pandas objects, plain
//! sequences) into the owned Rust values that
//! [`PanelFrame`](crate::data::PanelFrame) is built from.
#[cfg(feature = "python-bindings")]
use chrono::NaiveDateTime;

#[cfg(feature = "python-bindings")]
use numpy::PyReadonlyArray1;

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyTypeError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::data::{
    errors::{DataError, DataResult},
    panel::PanelFrame,
};

/// Copy a 1-D float array-like into a `Vec<f64>`. `NaN` is kept as missing.
#[cfg(feature = "python-bindings")]
pub fn extract_f64_vec(raw: &Bound<'_, PyAny>) -> PyResult<Vec<f64>> {
    if let Ok(arr) = raw.extract::<PyReadonlyArray1<f64>>() {
        return Ok(arr.as_array().to_vec());
    }

    if let Ok(obj) = raw.call_method("to_numpy", (false,), None) {
        if let Ok(arr) = obj.extract::<PyReadonlyArray1<f64>>() {
            return Ok(arr.as_array().to_vec());
        }
    }

    raw.extract().map_err(|_| {
        PyTypeError::new_err("expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64")
    })
}

/// Read timestamps from a sequence of `datetime` objects or a pandas
/// datetime index/series (via `to_pydatetime`).
#[cfg(feature = "python-bindings")]
pub fn extract_timestamps(raw: &Bound<'_, PyAny>) -> PyResult<Vec<NaiveDateTime>> {
    if let Ok(times) = raw.extract::<Vec<NaiveDateTime>>() {
        return Ok(times);
    }
    let converted = raw.call_method0("to_pydatetime").map_err(|_| {
        PyTypeError::new_err("expected a sequence of naive datetime.datetime values")
    })?;
    converted.try_iter()?.map(|item| item?.extract::<NaiveDateTime>()).collect()
}

/// Read entity identifiers; any hashable label is accepted through `str()`.
/// Integer ids keep their numeric order, see
/// [`PanelDataset::from_frame`](crate::data::PanelDataset::from_frame).
#[cfg(feature = "python-bindings")]
pub fn extract_labels(raw: &Bound<'_, PyAny>) -> PyResult<Vec<String>> {
    raw.try_iter()?.map(|item| Ok(item?.str()?.to_string())).collect()
}

/// Assemble a long-format frame with value columns `y` and `x`.
#[cfg(feature = "python-bindings")]
pub fn build_frame(
    entities: Vec<String>, times: Vec<NaiveDateTime>, y: Vec<f64>, x: Vec<f64>,
) -> DataResult<PanelFrame> {
    if entities.is_empty() {
        return Err(DataError::EmptyPanel);
    }
    PanelFrame::from_long(entities, times, vec![("y".to_string(), y), ("x".to_string(), x)])
}
