//! panel::orchestrator — panel Granger-causality runs end to end.
//!
//! Purpose
//! -------
//! Own a validated panel, run the gap-aware Granger test for every entity,
//! filter entities by the minimum-sample condition and expose the
//! Dumitrescu–Hurlin statistics through [`PanelGC`].
//!
//! Key behaviors
//! -------------
//! - Index, column, frequency and lag problems fail at construction; no
//!   regression runs before they are resolved.
//! - Per-entity tests run lazily on first access (or eagerly when
//!   `initiate_individual_results` is set) and at most once. The lifecycle
//!   is tracked by [`ResultsState`].
//! - An entity whose test fails with an entity-level error
//!   ([`GCError::is_entity_level`]) gets `W_i = T_i = NaN` and is kept as
//!   [`EntityResult::Infeasible`]; other entities are unaffected.
//! - Excluded entities are reported through the injected
//!   [`DiagnosticSink`] once per [`PanelGC::dh_test`] call, unless
//!   `unused_entity_warning` is off.
//!
//! Invariants & assumptions
//! ------------------------
//! - `entities`, `w_i`, `t_i` and `k_i` share the same sorted order.
//! - Lag orders are stored per entity; the current configuration assigns
//!   the same `K` to all of them.
//! - Results are deterministic and independent of the `parallel` flag.
use crate::{
    causality::{errors::GCError, granger::GCOutcome, lags::MaxLag},
    data::panel::{PanelDataset, PanelFrame},
    panel::{
        diagnostics::{DiagnosticSink, LogSink},
        dumitrescu_hurlin::{self, DHOutcome, DHStatistics},
        errors::{PanelError, PanelResult},
        filter::MinimumCondition,
        options::PanelGCOptions,
    },
};
use ndarray::Array1;
use rayon::prelude::*;
use std::{collections::BTreeMap, sync::Arc};

/// Lifecycle of the per-entity results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultsState {
    Uninitialized,
    Computing,
    Ready,
}

/// Outcome of one entity's test.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityResult {
    Feasible(GCOutcome),
    Infeasible(GCError),
}

impl EntityResult {
    pub fn outcome(&self) -> Option<&GCOutcome> {
        match self {
            EntityResult::Feasible(outcome) => Some(outcome),
            EntityResult::Infeasible(_) => None,
        }
    }

    fn w_and_t(&self) -> (f64, f64) {
        match self {
            EntityResult::Feasible(outcome) => (outcome.w(), outcome.t() as f64),
            EntityResult::Infeasible(_) => (f64::NAN, f64::NAN),
        }
    }
}

/// PanelGC — Dumitrescu–Hurlin panel Granger-causality test of `x → y`.
///
/// Construction validates the panel and the lag configuration; the
/// per-entity regressions and every statistic are computed on demand.
///
/// Examples
/// --------
/// ```rust
/// # use chrono::{NaiveDate, TimeDelta};
/// # use panel_causality::data::{Frequency, PanelFrame};
/// # use panel_causality::panel::{PanelGC, PanelGCOptions};
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let (mut ids, mut times, mut y, mut x) = (vec![], vec![], vec![], vec![]);
/// for (e, entity) in ["a", "b"].iter().enumerate() {
///     for d in 0..30 {
///         ids.push(entity.to_string());
///         times.push(start + TimeDelta::days(d));
///         y.push(((d * 7 + e as i64 * 3) % 11) as f64);
///         x.push(((d * 5 + e as i64) % 13) as f64);
///     }
/// }
/// let frame = PanelFrame::from_long(ids, times, vec![("y".into(), y), ("x".into(), x)]).unwrap();
///
/// let mut gc = PanelGC::new(&frame, PanelGCOptions::new(1, Frequency::Days(1))).unwrap();
/// let result = gc.dh_test(false).unwrap();
/// assert_eq!(result.n, 2);
/// assert!((0.0..=1.0).contains(&result.p_value));
/// ```
pub struct PanelGC {
    dataset: PanelDataset,
    options: PanelGCOptions,
    lag_order: usize,
    single_lag: bool,
    entities: Vec<String>,
    lag_orders: BTreeMap<String, usize>,
    k_i: Array1<usize>,
    w_i: Array1<f64>,
    t_i: Array1<f64>,
    gc_i: BTreeMap<String, EntityResult>,
    state: ResultsState,
    sink: Arc<dyn DiagnosticSink>,
}

impl PanelGC {
    /// Validate `frame` and `options`; diagnostics go to the `log` facade.
    ///
    /// Errors
    /// ------
    /// - `PanelError::Config` for an invalid or unsupported lag argument.
    /// - `PanelError::Data` for index, column, frequency or series problems.
    pub fn new(frame: &PanelFrame, options: PanelGCOptions) -> PanelResult<Self> {
        Self::with_sink(frame, options, Arc::new(LogSink))
    }

    /// Like [`PanelGC::new`] with a custom diagnostic sink.
    pub fn with_sink(
        frame: &PanelFrame, options: PanelGCOptions, sink: Arc<dyn DiagnosticSink>,
    ) -> PanelResult<Self> {
        let (lag_order, single_lag) = options.lag_order()?;
        let dataset = PanelDataset::from_frame(
            frame,
            options.freq,
            options.x.as_deref(),
            options.y.as_deref(),
        )?;
        Self::from_dataset(dataset, options, lag_order, single_lag, sink)
    }

    fn from_dataset(
        dataset: PanelDataset, options: PanelGCOptions, lag_order: usize, single_lag: bool,
        sink: Arc<dyn DiagnosticSink>,
    ) -> PanelResult<Self> {
        let entities: Vec<String> = dataset.entities().map(str::to_string).collect();
        let lag_orders: BTreeMap<String, usize> =
            entities.iter().map(|e| (e.clone(), lag_order)).collect();
        let k_i: Array1<usize> = entities.iter().map(|e| lag_orders[e]).collect();
        let n = entities.len();
        log::debug!(
            "panel of {n} entities on {} with K = {lag_order} (single lag: {single_lag})",
            dataset.freq()
        );

        let eager = options.initiate_individual_results;
        let mut gc = PanelGC {
            dataset,
            options,
            lag_order,
            single_lag,
            entities,
            lag_orders,
            k_i,
            w_i: Array1::from_elem(n, f64::NAN),
            t_i: Array1::from_elem(n, f64::NAN),
            gc_i: BTreeMap::new(),
            state: ResultsState::Uninitialized,
            sink,
        };
        if eager {
            gc.ensure_ready();
        }
        Ok(gc)
    }

    // ---- Per-entity results ----

    fn ensure_ready(&mut self) {
        if self.state == ResultsState::Ready {
            return;
        }
        self.state = ResultsState::Computing;

        let add_constant = self.options.add_constant;
        let dataset = &self.dataset;
        let lag_orders = &self.lag_orders;
        let single_lag = self.single_lag;
        let run = |entity: &String| -> EntityResult {
            let k = lag_orders[entity];
            let maxlag = if single_lag { MaxLag::List(vec![k]) } else { MaxLag::Order(k) };
            let Some(series) = dataset.series(entity) else {
                return EntityResult::Infeasible(GCError::InfeasibleTest {
                    reason: "entity has no series",
                });
            };
            match GCOutcome::granger_causality(series, &maxlag, add_constant) {
                Ok(outcome) => EntityResult::Feasible(outcome),
                Err(err) => EntityResult::Infeasible(err),
            }
        };

        let results: Vec<EntityResult> = if self.options.parallel {
            self.entities.par_iter().map(run).collect()
        } else {
            self.entities.iter().map(run).collect()
        };

        for (i, (entity, result)) in self.entities.iter().zip(results).enumerate() {
            if let EntityResult::Infeasible(err) = &result {
                if err.is_entity_level() {
                    log::debug!("entity '{entity}' left out: {err}");
                } else {
                    log::warn!("entity '{entity}' failed unexpectedly: {err}");
                }
            }
            let (w, t) = result.w_and_t();
            self.w_i[i] = w;
            self.t_i[i] = t;
            self.gc_i.insert(entity.clone(), result);
        }
        self.state = ResultsState::Ready;
    }

    pub fn state(&self) -> ResultsState {
        self.state
    }

    /// Per-entity Wald statistics, `NaN` for infeasible entities.
    pub fn w_i(&mut self) -> &Array1<f64> {
        self.ensure_ready();
        &self.w_i
    }

    /// Per-entity effective sample sizes, `NaN` for infeasible entities.
    pub fn t_i(&mut self) -> &Array1<f64> {
        self.ensure_ready();
        &self.t_i
    }

    pub fn k_i(&self) -> &Array1<usize> {
        &self.k_i
    }

    /// Lag order of every entity.
    pub fn lag_orders(&self) -> &BTreeMap<String, usize> {
        &self.lag_orders
    }

    /// Result of one entity's test.
    ///
    /// Errors
    /// ------
    /// - `PanelError::EntityNotFound` if `entity` is not in the panel.
    pub fn individual(&mut self, entity: &str) -> PanelResult<&EntityResult> {
        self.ensure_ready();
        self.gc_i
            .get(entity)
            .ok_or_else(|| PanelError::EntityNotFound { entity: entity.to_string() })
    }

    pub fn individual_results(&mut self) -> &BTreeMap<String, EntityResult> {
        self.ensure_ready();
        &self.gc_i
    }

    // ---- Panel metadata ----

    /// Sorted entity identifiers.
    pub fn entities(&self) -> &[String] {
        &self.entities
    }

    /// Number of entities.
    pub fn n(&self) -> usize {
        self.entities.len()
    }

    /// Number of distinct timestamps in the raw panel.
    pub fn t(&self) -> usize {
        self.dataset.times().len()
    }

    /// Configured lag order `K`.
    pub fn lag_order(&self) -> usize {
        self.lag_order
    }

    pub fn options(&self) -> &PanelGCOptions {
        &self.options
    }

    pub fn dataset(&self) -> &PanelDataset {
        &self.dataset
    }

    // ---- Eligibility ----

    /// Evaluate the minimum-sample condition; emits no diagnostic.
    pub fn minimum_condition(&mut self) -> MinimumCondition {
        self.ensure_ready();
        MinimumCondition::evaluate(&self.entities, &self.t_i, &self.k_i)
    }

    /// `true` when every entity satisfies the minimum-sample condition.
    pub fn minimum_flag(&mut self) -> bool {
        self.minimum_condition().all_eligible()
    }

    /// Number of entities entering the aggregation.
    pub fn n_masked(&mut self) -> usize {
        self.minimum_condition().n_masked()
    }

    // ---- Statistics ----

    /// `E[W̃_i]` per entity, `NaN` for ineligible entities.
    pub fn e_w_i_tilde(&mut self) -> Array1<f64> {
        let cond = self.minimum_condition();
        cond.apply(&dumitrescu_hurlin::e_w_i_tilde(&self.t_i, &self.k_i))
    }

    /// `Var[W̃_i]` per entity, `NaN` for ineligible entities.
    pub fn var_w_i_tilde(&mut self) -> Array1<f64> {
        let cond = self.minimum_condition();
        cond.apply(&dumitrescu_hurlin::var_w_i_tilde(&self.t_i, &self.k_i))
    }

    /// Asymptotic `E[W_i] = K`.
    pub fn e_w_i(&self) -> f64 {
        self.lag_order as f64
    }

    /// Asymptotic `Var[W_i] = 2K`.
    pub fn var_w_i(&self) -> f64 {
        2.0 * self.lag_order as f64
    }

    fn statistics(&mut self) -> PanelResult<(DHStatistics, MinimumCondition)> {
        let cond = self.minimum_condition();
        let stats = DHStatistics::compute(&self.w_i, &self.t_i, &self.k_i, &cond)?;
        Ok((stats, cond))
    }

    pub fn w_bar(&mut self) -> PanelResult<f64> {
        Ok(self.statistics()?.0.w_bar)
    }

    pub fn z_bar_tilde(&mut self) -> PanelResult<f64> {
        Ok(self.statistics()?.0.z_bar_tilde)
    }

    /// Upper-tail standard normal probability of `Z̃`.
    pub fn p_value(&mut self) -> PanelResult<f64> {
        Ok(self.statistics()?.0.p_value)
    }

    pub fn z_bar(&mut self) -> PanelResult<f64> {
        Ok(self.statistics()?.0.z_bar)
    }

    /// Run the panel test and return the result record.
    ///
    /// Parameters
    /// ----------
    /// - `zbar`: `bool`
    ///   Include the asymptotic `Z̄` statistic.
    ///
    /// Returns
    /// -------
    /// `PanelResult<DHOutcome>` with `n_masked` / `entities_unused` set only
    /// when some entity was excluded.
    pub fn dh_test(&mut self, zbar: bool) -> PanelResult<DHOutcome> {
        let (stats, cond) = self.statistics()?;
        if self.options.unused_entity_warning {
            if let Some(diagnostic) = cond.diagnostic() {
                self.sink.emit(&diagnostic);
            }
        }
        Ok(DHOutcome::new(&stats, &cond, self.lag_order, self.n(), zbar))
    }
}

impl std::fmt::Debug for PanelGC {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanelGC")
            .field("entities", &self.entities)
            .field("lag_order", &self.lag_order)
            .field("single_lag", &self.single_lag)
            .field("state", &self.state)
            .finish()
    }
}
