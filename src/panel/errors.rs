//! Errors for panel-level Granger-causality runs.
//!
//! `PanelError` is what [`PanelGC`](crate::panel::orchestrator::PanelGC)
//! returns. Construction-time problems (bad index, bad columns, bad lag
//! argument) surface immediately as `Data` or `Config`; per-entity test
//! failures never appear here because the orchestrator records them as
//! infeasible entities instead.
use crate::{causality::errors::GCError, data::errors::DataError};

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

pub type PanelResult<T> = Result<T, PanelError>;

/// Failure modes of a panel run.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelError {
    // ---- Construction ----
    /// Invalid index, columns, frequency or series.
    Data(DataError),

    /// Invalid lag configuration.
    Config(GCError),

    // ---- Lookup ----
    /// The requested entity is not part of the panel.
    EntityNotFound { entity: String },

    // ---- Aggregation ----
    /// The reference normal distribution could not be built.
    Distribution(String),
}

impl From<DataError> for PanelError {
    fn from(err: DataError) -> Self {
        PanelError::Data(err)
    }
}

impl From<GCError> for PanelError {
    fn from(err: GCError) -> Self {
        PanelError::Config(err)
    }
}

impl std::error::Error for PanelError {}

impl std::fmt::Display for PanelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PanelError::Data(err) => write!(f, "Panel Error: {err}"),
            PanelError::Config(err) => write!(f, "Panel Error: {err}"),
            PanelError::EntityNotFound { entity } => {
                write!(f, "Panel Error: entity '{entity}' is not part of the panel")
            }
            PanelError::Distribution(msg) => {
                write!(f, "Panel Error: normal distribution error: {msg}")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<PanelError> for PyErr {
    fn from(err: PanelError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
