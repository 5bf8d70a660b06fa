//! panel — Dumitrescu–Hurlin panel Granger non-causality testing.
//!
//! Purpose
//! -------
//! Run the single-entity Granger test across a heterogeneous panel and
//! aggregate the entity statistics into the Dumitrescu–Hurlin `W̄`, `Z̃`
//! (with p-value) and `Z̄`.
//!
//! Key behaviors
//! -------------
//! - [`PanelGCOptions`] configures a run; [`PanelGC`] owns the data, the
//!   lazily computed per-entity results and the aggregation.
//! - [`MinimumCondition`] selects the entities that enter the statistics
//!   (`T_i > 5 + 2K_i`).
//! - [`DiagnosticSink`] receives non-fatal warnings; [`LogSink`] is the
//!   default and [`CollectingSink`] is handy in tests.
//!
//! Invariants & assumptions
//! ------------------------
//! - Entity-level test failures never abort a panel run; they mark the
//!   entity infeasible and exclude it.
//! - Configuration errors surface at construction as [`PanelError`].

pub mod diagnostics;
pub mod dumitrescu_hurlin;
pub mod errors;
pub mod filter;
pub mod options;
pub mod orchestrator;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::diagnostics::{CollectingSink, Diagnostic, DiagnosticKind, DiagnosticSink, LogSink};
pub use self::dumitrescu_hurlin::{DHOutcome, DHStatistics};
pub use self::errors::{PanelError, PanelResult};
pub use self::filter::MinimumCondition;
pub use self::options::PanelGCOptions;
pub use self::orchestrator::{EntityResult, PanelGC, ResultsState};

pub mod prelude {
    pub use super::diagnostics::{CollectingSink, DiagnosticSink, LogSink};
    pub use super::dumitrescu_hurlin::DHOutcome;
    pub use super::errors::{PanelError, PanelResult};
    pub use super::options::PanelGCOptions;
    pub use super::orchestrator::PanelGC;
}
