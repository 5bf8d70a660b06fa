//! panel_causality — Dumitrescu–Hurlin panel Granger causality with Python
//! bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the panel Granger-causality test to Python via the
//! `_panel_causality` extension module.
//!
//! Key behaviors
//! -------------
//! - Re-export the core modules: `data` (panel tables, frequencies,
//!   resampling), `regression` (OLS), `causality` (single-entity Granger
//!   test) and `panel` (orchestration and Dumitrescu–Hurlin aggregation).
//! - Define the `PanelGrangerCausality` `#[pyclass]` and the `#[pymodule]`
//!   initializer when the `python-bindings` feature is enabled.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work lives in the inner modules; this file performs only
//!   FFI glue and error mapping.
//! - Missing values are `NaN` on both sides of the boundary.
//!
//! Conventions
//! -----------
//! - Errors from core Rust code are propagated as rich error types and
//!   converted to `ValueError` at the PyO3 boundary.
//! - The Python result record is a `dict` with keys `W_bar`,
//!   `Z_bar_tilde`, `p_value`, `lag_order`, `N`, and, when applicable,
//!   `Z_bar`, `N_masked`, `Entities_unused`.
//!
//! Testing notes
//! -------------
//! - Core behavior is covered by unit tests in the inner modules and by
//!   `tests/integration_panel_pipeline.rs`.

pub mod causality;
pub mod data;
pub mod panel;
pub mod regression;
pub mod utils;

#[cfg(feature = "python-bindings")]
use pyo3::{
    prelude::*,
    types::{PyAny, PyDict},
};

#[cfg(feature = "python-bindings")]
use crate::{
    data::frequency::Frequency,
    panel::{PanelGC, PanelGCOptions},
    utils::{build_frame, extract_f64_vec, extract_labels, extract_timestamps},
};

/// PanelGrangerCausality — Python-facing wrapper around [`PanelGC`].
///
/// Constructed from Python as
/// `PanelGrangerCausality(entities, times, y, x, maxlag, freq, ...)` with
/// one entry per observation in each of the four sequences.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "panel_causality")]
pub struct PanelGrangerCausality {
    inner: PanelGC,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PanelGrangerCausality {
    #[new]
    #[pyo3(signature = (
        entities, times, y, x, maxlag, freq,
        single_lag = false,
        unused_entity_warning = true,
        initiate_individual_results = false,
        add_constant = true,
        parallel = false
    ))]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        entities: &Bound<'_, PyAny>, times: &Bound<'_, PyAny>, y: &Bound<'_, PyAny>,
        x: &Bound<'_, PyAny>, maxlag: usize, freq: &str, single_lag: bool,
        unused_entity_warning: bool, initiate_individual_results: bool, add_constant: bool,
        parallel: bool,
    ) -> PyResult<Self> {
        let freq: Frequency = freq.parse()?;
        let frame = build_frame(
            extract_labels(entities)?,
            extract_timestamps(times)?,
            extract_f64_vec(y)?,
            extract_f64_vec(x)?,
        )?;
        let options = PanelGCOptions::new(maxlag, freq)
            .with_single_lag(single_lag)
            .with_unused_entity_warning(unused_entity_warning)
            .with_initiate_individual_results(initiate_individual_results)
            .with_add_constant(add_constant)
            .with_parallel(parallel);
        Ok(PanelGrangerCausality { inner: PanelGC::new(&frame, options)? })
    }

    /// Run the panel test and return the result record as a `dict`.
    #[pyo3(signature = (zbar = false))]
    pub fn dh_test<'py>(&mut self, py: Python<'py>, zbar: bool) -> PyResult<Bound<'py, PyDict>> {
        let outcome = self.inner.dh_test(zbar)?;
        let dict = PyDict::new(py);
        dict.set_item("W_bar", outcome.w_bar)?;
        dict.set_item("Z_bar_tilde", outcome.z_bar_tilde)?;
        dict.set_item("p_value", outcome.p_value)?;
        dict.set_item("lag_order", outcome.lag_order)?;
        dict.set_item("N", outcome.n)?;
        if let Some(z_bar) = outcome.z_bar {
            dict.set_item("Z_bar", z_bar)?;
        }
        if let Some(n_masked) = outcome.n_masked {
            dict.set_item("N_masked", n_masked)?;
        }
        if let Some(unused) = outcome.entities_unused {
            dict.set_item("Entities_unused", unused)?;
        }
        Ok(dict)
    }

    #[getter]
    pub fn w_i(&mut self) -> Vec<f64> {
        self.inner.w_i().to_vec()
    }

    #[getter]
    pub fn t_i(&mut self) -> Vec<f64> {
        self.inner.t_i().to_vec()
    }

    #[getter]
    pub fn entities(&self) -> Vec<String> {
        self.inner.entities().to_vec()
    }

    #[getter]
    pub fn lag_order(&self) -> usize {
        self.inner.lag_order()
    }

    #[getter]
    pub fn minimum_flag(&mut self) -> bool {
        self.inner.minimum_flag()
    }
}

#[cfg(feature = "python-bindings")]
#[pymodule]
fn _panel_causality<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    m.add_class::<PanelGrangerCausality>()?;
    Ok(())
}
