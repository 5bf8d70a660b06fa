//! panel::options — configuration for a panel Granger-causality run.
//!
//! Purpose
//! -------
//! Bundle every knob of a panel run in one plain value: the lag argument,
//! the resampling frequency, the `y`/`x` column choice and the behavioral
//! toggles. Components validate themselves where they are consumed
//! ([`LagSpec`](crate::causality::lags::LagSpec) for lags, the data layer
//! for columns and frequency); [`PanelGCOptions::lag_order`] is the single
//! place the panel-level lag rules are applied.
//!
//! Conventions
//! -----------
//! - Builder-style `with_*` setters consume and return `self`.
//! - Defaults: warnings on, lazy per-entity computation, intercept included,
//!   sequential execution.
use crate::{
    causality::{
        errors::{GCError, GCResult},
        lags::MaxLag,
    },
    data::frequency::Frequency,
};

/// PanelGCOptions — configuration for [`PanelGC`](crate::panel::PanelGC).
///
/// Fields
/// ------
/// - `maxlag`: [`MaxLag`]
///   Lag order `K`, shared by all entities. Only `Order(K)` is supported
///   for panels; use `single_lag` to test `{K}` alone.
/// - `freq`: [`Frequency`]
///   Grid every entity is resampled onto before testing.
/// - `x`, `y`: `Option<String>`
///   Column overrides; give both or neither.
/// - `single_lag`: `bool`
///   Test the lag set `{K}` instead of `{1..=K}`.
/// - `unused_entity_warning`: `bool`
///   Emit a diagnostic when entities fail the minimum-sample condition.
/// - `initiate_individual_results`: `bool`
///   Run the per-entity tests at construction instead of on first use.
/// - `add_constant`: `bool`
///   Include an intercept in the per-entity regressions.
/// - `parallel`: `bool`
///   Run per-entity tests on the rayon thread pool.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelGCOptions {
    pub maxlag: MaxLag,
    pub freq: Frequency,
    pub x: Option<String>,
    pub y: Option<String>,
    pub single_lag: bool,
    pub unused_entity_warning: bool,
    pub initiate_individual_results: bool,
    pub add_constant: bool,
    pub parallel: bool,
}

impl PanelGCOptions {
    /// Options with the given lag argument and frequency and defaults for
    /// everything else.
    pub fn new(maxlag: impl Into<MaxLag>, freq: Frequency) -> Self {
        PanelGCOptions {
            maxlag: maxlag.into(),
            freq,
            x: None,
            y: None,
            single_lag: false,
            unused_entity_warning: true,
            initiate_individual_results: false,
            add_constant: true,
            parallel: false,
        }
    }

    /// Select the `x` and `y` columns explicitly.
    pub fn with_columns(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.x = Some(x.into());
        self.y = Some(y.into());
        self
    }

    pub fn with_single_lag(mut self, single_lag: bool) -> Self {
        self.single_lag = single_lag;
        self
    }

    pub fn with_unused_entity_warning(mut self, warn: bool) -> Self {
        self.unused_entity_warning = warn;
        self
    }

    pub fn with_initiate_individual_results(mut self, eager: bool) -> Self {
        self.initiate_individual_results = eager;
        self
    }

    pub fn with_add_constant(mut self, add_constant: bool) -> Self {
        self.add_constant = add_constant;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Resolve the panel lag order and whether single-lag mode applies.
    ///
    /// Errors
    /// ------
    /// - `GCError::InvalidMaxLag` for a zero order.
    /// - `GCError::EmptyLagList`, `GCError::LagListUnsupported` or
    ///   `GCError::MultipleLagSetsUnsupported` for any list form.
    pub fn lag_order(&self) -> GCResult<(usize, bool)> {
        match &self.maxlag {
            MaxLag::Order(0) => Err(GCError::InvalidMaxLag { maxlag: 0 }),
            MaxLag::Order(k) => Ok((*k, self.single_lag)),
            MaxLag::List(list) => Err(match list.len() {
                0 => GCError::EmptyLagList,
                1 => GCError::LagListUnsupported,
                count => GCError::MultipleLagSetsUnsupported { count },
            }),
        }
    }
}
