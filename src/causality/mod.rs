//! causality — single-entity Granger-causality testing on gapped series.
//!
//! Purpose
//! -------
//! Collect the per-entity building blocks of the panel procedure: lag
//! specifications, time-aligned lagged design tables, and the SSR-based
//! Granger F test with degeneracy detection.
//!
//! Key behaviors
//! -------------
//! - [`MaxLag`] / [`LagSpec`] validate the lag argument (`1..=K` or `{K}`).
//! - [`LaggedTable`] builds `y`, `x`, their lags and an optional constant
//!   through the time index so calendar gaps become missing lags.
//! - [`GCOutcome::granger_causality`] fits the restricted and unrestricted
//!   regressions on a common complete-case sample and returns `W`, the
//!   F p-value, `T` and both fits.
//!
//! Invariants & assumptions
//! ------------------------
//! - Errors are reported through [`GCError`]; entity-level variants are
//!   distinguished by [`GCError::is_entity_level`] so callers running many
//!   entities can record them instead of aborting.
//!
//! Testing notes
//! -------------
//! - `lags` tests cover the one-period-shift identity on gap-free data and
//!   missing-lag propagation across calendar holes.
//! - `granger` tests cover determinism, `W ≥ 0`, p-values in `[0, 1]`,
//!   identical restricted/unrestricted samples, and the insufficient-sample
//!   and perfect-fit failure paths.

pub mod errors;
pub mod granger;
pub mod lags;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{GCError, GCResult};
pub use self::granger::GCOutcome;
pub use self::lags::{LagSpec, LaggedTable, MaxLag};

pub mod prelude {
    pub use super::errors::{GCError, GCResult};
    pub use super::granger::GCOutcome;
    pub use super::lags::{LagSpec, MaxLag};
}
