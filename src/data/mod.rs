//! data — panel tables, per-entity series and resampling grids.
//!
//! Purpose
//! -------
//! Turn long-format panel data into validated, regularly spaced per-entity
//! series that the causality tests can lag by calendar time rather than by
//! row position.
//!
//! Key behaviors
//! -------------
//! - [`Frequency`] describes the grid and provides bucket/shift arithmetic.
//! - [`TimeSeries2D`] holds one entity's `y`/`x` pair and implements
//!   last-observation-per-bucket resampling.
//! - [`PanelFrame`] and [`PanelDataset`] validate the (entity, time) index
//!   and the `y`/`x` column choice, then split the panel by entity.
//!
//! Conventions
//! -----------
//! - Missing values are `NaN` throughout.
//! - All failures are configuration errors reported as [`DataError`].

pub mod errors;
pub mod frequency;
pub mod panel;
pub mod series;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{DataError, DataResult};
pub use self::frequency::Frequency;
pub use self::panel::{IndexLevel, PanelDataset, PanelFrame};
pub use self::series::TimeSeries2D;

pub mod prelude {
    pub use super::errors::{DataError, DataResult};
    pub use super::frequency::Frequency;
    pub use super::panel::{IndexLevel, PanelDataset, PanelFrame};
    pub use super::series::TimeSeries2D;
}
