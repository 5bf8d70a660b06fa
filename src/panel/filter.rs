//! panel::filter — minimum-sample eligibility of panel entities.
//!
//! Purpose
//! -------
//! Decide which entities enter the Dumitrescu–Hurlin aggregation. The
//! moment formulas for `W̃_i` require `T_i > 5 + 2·K_i`; entities whose test
//! was infeasible (`T_i = NaN`) are ineligible as well.
//!
//! Invariants & assumptions
//! ------------------------
//! - The comparison is strict: `T_i = 5 + 2·K_i` is excluded.
//! - `mask`, `t_i` and `k_i` share the entity order of the panel.
use crate::panel::diagnostics::Diagnostic;
use ndarray::Array1;

/// MinimumCondition — per-entity eligibility mask and the excluded ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinimumCondition {
    mask: Vec<bool>,
    excluded: Vec<String>,
}

impl MinimumCondition {
    /// Evaluate `T_i > 5 + 2·K_i` for every entity.
    pub fn evaluate(entities: &[String], t_i: &Array1<f64>, k_i: &Array1<usize>) -> Self {
        let mask: Vec<bool> = t_i
            .iter()
            .zip(k_i.iter())
            .map(|(&t, &k)| t > 5.0 + 2.0 * k as f64)
            .collect();
        let excluded = entities
            .iter()
            .zip(&mask)
            .filter(|(_, eligible)| !**eligible)
            .map(|(entity, _)| entity.clone())
            .collect();
        MinimumCondition { mask, excluded }
    }

    pub fn mask(&self) -> &[bool] {
        &self.mask
    }

    /// Ids of ineligible entities, in panel order.
    pub fn excluded(&self) -> &[String] {
        &self.excluded
    }

    /// Number of eligible entities.
    pub fn n_masked(&self) -> usize {
        self.mask.iter().filter(|&&eligible| eligible).count()
    }

    /// `true` when no entity was excluded.
    pub fn all_eligible(&self) -> bool {
        self.excluded.is_empty()
    }

    /// Copy of `values` with ineligible positions set to `NaN`.
    pub fn apply(&self, values: &Array1<f64>) -> Array1<f64> {
        values
            .iter()
            .zip(&self.mask)
            .map(|(&v, &eligible)| if eligible { v } else { f64::NAN })
            .collect()
    }

    /// Warning describing the excluded entities, if any.
    pub fn diagnostic(&self) -> Option<Diagnostic> {
        (!self.all_eligible()).then(|| Diagnostic::unused_entities(self.excluded.clone()))
    }
}
