//! panel::dumitrescu_hurlin — aggregation of per-entity Wald statistics.
//!
//! Purpose
//! -------
//! Combine the per-entity Granger Wald statistics `W_i` into the
//! Dumitrescu–Hurlin (2012) panel non-causality statistics: the average
//! `W̄`, the finite-sample standardized `Z̃` with its upper-tail normal
//! p-value, and optionally the asymptotic `Z̄`.
//!
//! Key behaviors
//! -------------
//! - Finite-T moments of `W̃_i` under the null:
//!   `E = K(T−2K−1)/(T−2K−3)` and
//!   `Var = 2K(T−2K−1)²(T−K−3) / ((T−2K−3)²(T−2K−5))`.
//! - Only entities flagged eligible by
//!   [`MinimumCondition`] enter any mean; `N` in the scaling factors is the
//!   eligible count.
//! - `Z̃ = √N (W̄ − mean E) / √(mean Var)`, `p = 1 − Φ(Z̃)`,
//!   `Z̄ = √N (W̄ − mean K) / √(2 · mean K)`.
//!
//! Invariants & assumptions
//! ------------------------
//! - With no eligible entity every mean is `NaN`, and so are the
//!   statistics; no error is raised.
//! - Moments are only meaningful for `T > 5 + 2K`, which the mask enforces.
use crate::panel::{
    errors::{PanelError, PanelResult},
    filter::MinimumCondition,
};
use ndarray::Array1;
use statrs::distribution::{ContinuousCDF, Normal};

/// Finite-sample mean of `W̃_i` for sample size `t` and lag order `k`.
pub fn expected_w_tilde(t: f64, k: f64) -> f64 {
    k * (t - 2.0 * k - 1.0) / (t - 2.0 * k - 3.0)
}

/// Finite-sample variance of `W̃_i` for sample size `t` and lag order `k`.
pub fn variance_w_tilde(t: f64, k: f64) -> f64 {
    let a = t - 2.0 * k - 1.0;
    let b = t - 2.0 * k - 3.0;
    2.0 * k * a.powi(2) * (t - k - 3.0) / (b.powi(2) * (t - 2.0 * k - 5.0))
}

/// DHStatistics — panel statistics over the eligible entities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DHStatistics {
    pub w_bar: f64,
    pub mean_e_tilde: f64,
    pub mean_var_tilde: f64,
    pub mean_k: f64,
    pub n_masked: usize,
    pub z_bar_tilde: f64,
    pub p_value: f64,
    pub z_bar: f64,
}

impl DHStatistics {
    /// Aggregate per-entity results.
    ///
    /// Parameters
    /// ----------
    /// - `w_i`, `t_i`: `&Array1<f64>`
    ///   Wald statistics and sample sizes, `NaN` for infeasible entities.
    /// - `k_i`: `&Array1<usize>`
    ///   Per-entity lag orders.
    /// - `cond`: `&MinimumCondition`
    ///   Eligibility of each entity.
    ///
    /// Errors
    /// ------
    /// - `PanelError::Distribution` if the standard normal cannot be built.
    pub fn compute(
        w_i: &Array1<f64>, t_i: &Array1<f64>, k_i: &Array1<usize>, cond: &MinimumCondition,
    ) -> PanelResult<Self> {
        let k_f: Array1<f64> = k_i.mapv(|k| k as f64);
        let e_tilde = cond.apply(&e_w_i_tilde(t_i, k_i));
        let var_tilde = cond.apply(&var_w_i_tilde(t_i, k_i));

        let w_bar = nanmean(&cond.apply(w_i));
        let mean_e_tilde = nanmean(&e_tilde);
        let mean_var_tilde = nanmean(&var_tilde);
        let mean_k = nanmean(&cond.apply(&k_f));
        let n_masked = cond.n_masked();
        let scale = (n_masked as f64).sqrt();

        let z_bar_tilde = scale * (w_bar - mean_e_tilde) / mean_var_tilde.sqrt();
        let z_bar = scale * (w_bar - mean_k) / (2.0 * mean_k).sqrt();

        let normal = Normal::new(0.0, 1.0).map_err(|e| PanelError::Distribution(e.to_string()))?;
        let p_value = normal.sf(z_bar_tilde);

        Ok(DHStatistics {
            w_bar,
            mean_e_tilde,
            mean_var_tilde,
            mean_k,
            n_masked,
            z_bar_tilde,
            p_value,
            z_bar,
        })
    }
}

/// Element-wise `E[W̃_i]`; `NaN` wherever `t_i` is `NaN`.
pub fn e_w_i_tilde(t_i: &Array1<f64>, k_i: &Array1<usize>) -> Array1<f64> {
    t_i.iter().zip(k_i.iter()).map(|(&t, &k)| expected_w_tilde(t, k as f64)).collect()
}

/// Element-wise `Var[W̃_i]`; `NaN` wherever `t_i` is `NaN`.
pub fn var_w_i_tilde(t_i: &Array1<f64>, k_i: &Array1<usize>) -> Array1<f64> {
    t_i.iter().zip(k_i.iter()).map(|(&t, &k)| variance_w_tilde(t, k as f64)).collect()
}

/// Mean of the non-NaN entries; `NaN` if there are none.
fn nanmean(values: &Array1<f64>) -> f64 {
    let (sum, count) = values
        .iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(sum, count), &v| (sum + v, count + 1));
    if count == 0 { f64::NAN } else { sum / count as f64 }
}

/// DHOutcome — result record of a panel Granger-causality test.
///
/// Fields
/// ------
/// - `w_bar`, `z_bar_tilde`, `p_value`: the panel statistics.
/// - `lag_order`: the configured `K`.
/// - `n`: number of entities in the panel.
/// - `z_bar`: present only when requested.
/// - `n_masked`, `entities_unused`: present only when at least one entity
///   was excluded by the minimum-sample condition.
#[derive(Debug, Clone, PartialEq)]
pub struct DHOutcome {
    pub w_bar: f64,
    pub z_bar_tilde: f64,
    pub p_value: f64,
    pub lag_order: usize,
    pub n: usize,
    pub z_bar: Option<f64>,
    pub n_masked: Option<usize>,
    pub entities_unused: Option<Vec<String>>,
}

impl DHOutcome {
    /// Assemble the record from aggregated statistics.
    pub fn new(
        stats: &DHStatistics, cond: &MinimumCondition, lag_order: usize, n: usize, zbar: bool,
    ) -> Self {
        let any_excluded = !cond.all_eligible();
        DHOutcome {
            w_bar: stats.w_bar,
            z_bar_tilde: stats.z_bar_tilde,
            p_value: stats.p_value,
            lag_order,
            n,
            z_bar: zbar.then_some(stats.z_bar),
            n_masked: any_excluded.then_some(stats.n_masked),
            entities_unused: any_excluded.then(|| cond.excluded().to_vec()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    // Purpose
    // -------
    // Check the moment formulas against hand-computed values.
    //
    // Given
    // -----
    // - (T, K) = (10, 1) and (20, 1).
    //
    // Expect
    // ------
    // - E = 7/5 and 17/15; Var = 588/75 and 9248/2925.
    fn moments_match_closed_form() {
        assert!((expected_w_tilde(10.0, 1.0) - 1.4).abs() < 1e-12);
        assert!((expected_w_tilde(20.0, 1.0) - 17.0 / 15.0).abs() < 1e-12);
        assert!((variance_w_tilde(10.0, 1.0) - 588.0 / 75.0).abs() < 1e-12);
        assert!((variance_w_tilde(20.0, 1.0) - 9248.0 / 2925.0).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Verify the aggregation over eligible entities only.
    //
    // Given
    // -----
    // - W = [2, 4, NaN], T = [10, 20, NaN], K = 1; the third entity is
    //   infeasible.
    //
    // Expect
    // ------
    // - W̄ = 3, N_masked = 2, Z̄ = √2·2/√2 = 2, Z̃ from the closed-form
    //   moments, p = 1 − Φ(Z̃).
    fn dh_statistics_aggregate_eligible_entities() {
        // Arrange
        let w_i = array![2.0, 4.0, f64::NAN];
        let t_i = array![10.0, 20.0, f64::NAN];
        let k_i = array![1, 1, 1];
        let cond = MinimumCondition::evaluate(&ids(&["a", "b", "c"]), &t_i, &k_i);

        // Act
        let stats = DHStatistics::compute(&w_i, &t_i, &k_i, &cond).unwrap();

        // Assert
        let mean_e = (1.4 + 17.0 / 15.0) / 2.0;
        let mean_var: f64 = (588.0 / 75.0 + 9248.0 / 2925.0) / 2.0;
        let z_tilde = 2f64.sqrt() * (3.0 - mean_e) / mean_var.sqrt();
        let expected_p = 1.0 - Normal::new(0.0, 1.0).unwrap().cdf(z_tilde);
        assert_eq!(stats.n_masked, 2);
        assert!((stats.w_bar - 3.0).abs() < 1e-12);
        assert!((stats.z_bar - 2.0).abs() < 1e-12);
        assert!((stats.z_bar_tilde - z_tilde).abs() < 1e-12);
        assert!((stats.p_value - expected_p).abs() < 1e-10);
    }

    #[test]
    // Purpose
    // -------
    // Ensure optional record fields follow the exclusion and `zbar` flags.
    //
    // Given
    // -----
    // - A panel where entity "c" is infeasible; `zbar = true`.
    // - The same statistics with a fully eligible panel; `zbar = false`.
    //
    // Expect
    // ------
    // - First record carries Z̄, N_masked = 2 and ["c"]; second has none.
    fn dh_outcome_optional_fields() {
        // Arrange
        let w_i = array![2.0, 4.0, f64::NAN];
        let t_i = array![10.0, 20.0, f64::NAN];
        let k_i = array![1, 1, 1];
        let partial = MinimumCondition::evaluate(&ids(&["a", "b", "c"]), &t_i, &k_i);
        let stats = DHStatistics::compute(&w_i, &t_i, &k_i, &partial).unwrap();
        let full = MinimumCondition::evaluate(&ids(&["a", "b"]), &array![10.0, 20.0], &array![1, 1]);

        // Act
        let with_exclusions = DHOutcome::new(&stats, &partial, 1, 3, true);
        let without = DHOutcome::new(&stats, &full, 1, 2, false);

        // Assert
        assert_eq!(with_exclusions.z_bar, Some(stats.z_bar));
        assert_eq!(with_exclusions.n_masked, Some(2));
        assert_eq!(with_exclusions.entities_unused, Some(vec!["c".to_string()]));
        assert_eq!(without.z_bar, None);
        assert_eq!(without.n_masked, None);
        assert_eq!(without.entities_unused, None);
    }

    #[test]
    // Purpose
    // -------
    // Ensure an all-ineligible panel yields NaN statistics without error.
    //
    // Given
    // -----
    // - Two infeasible entities.
    //
    // Expect
    // ------
    // - `Ok` with NaN W̄ and Z̃ and zero eligible entities.
    fn dh_statistics_no_eligible_entity_is_nan() {
        // Arrange
        let nan = array![f64::NAN, f64::NAN];
        let k_i = array![2, 2];
        let cond = MinimumCondition::evaluate(&ids(&["a", "b"]), &nan, &k_i);

        // Act
        let stats = DHStatistics::compute(&nan, &nan, &k_i, &cond).unwrap();

        // Assert
        assert_eq!(stats.n_masked, 0);
        assert!(stats.w_bar.is_nan());
        assert!(stats.z_bar_tilde.is_nan());
    }
}
