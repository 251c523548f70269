//! Treatment effect model.
//!
//! Two steps:
//! - Project LDL-C after a statin (and optional add-ons)
//! - Translate the LDL drop into a relative risk reduction

use crate::catalog::{is_therapy, TherapyCatalog};
use crate::{AddOn, LdlProjection};
use std::collections::BTreeSet;

/// Fraction of the prescribed statin's effect kept when switching from another therapy
pub const SWITCH_EFFECT_FACTOR: f64 = 0.5;

/// Relative risk reduction per mmol/L of LDL-C lowered, in percent
pub const RRR_PER_MMOL: f64 = 22.0;

/// Upper bound on relative risk reduction, in percent
pub const MAX_RRR_PERCENT: f64 = 60.0;

/// Default ceiling on the combined LDL reduction, in percent
pub const DEFAULT_MAX_TOTAL_REDUCTION_PERCENT: f64 = 90.0;

/// Project LDL-C after applying the prescribed regimen
///
/// The prescribed statin's reduction is halved when the patient already takes
/// a therapy. Add-on reductions stack additively on top. The combined value is
/// limited to `max_total_reduction_percent` so the projection stays positive;
/// the additive sum is kept in `uncapped_reduction_percent`.
pub fn project_ldl(
    catalog: &TherapyCatalog,
    current_ldl: f64,
    current_therapy: Option<&str>,
    prescribed_therapy: Option<&str>,
    add_ons: &BTreeSet<AddOn>,
    max_total_reduction_percent: f64,
) -> LdlProjection {
    let mut statin_reduction = prescribed_therapy.map_or(0.0, |id| catalog.lookup(id));

    if is_therapy(current_therapy) {
        statin_reduction *= SWITCH_EFFECT_FACTOR;
        tracing::debug!(
            "Patient already on {:?}; prescribed effect reduced to {}%",
            current_therapy,
            statin_reduction
        );
    }

    let add_on_reduction: f64 = add_ons.iter().map(|a| a.ldl_reduction_percent()).sum();
    let uncapped = statin_reduction + add_on_reduction;
    let total = uncapped.min(max_total_reduction_percent).max(0.0);

    if total < uncapped {
        tracing::info!(
            "Combined LDL reduction {}% capped at {}%",
            uncapped,
            total
        );
    }

    let projected_ldl = current_ldl * (1.0 - total / 100.0);

    LdlProjection {
        projected_ldl,
        total_reduction_percent: total,
        uncapped_reduction_percent: uncapped,
    }
}

/// Risk after lowering LDL-C from `baseline_ldl` to `projected_ldl`
///
/// Each mmol/L lowered removes 22% of the risk, up to 60%. If the calculation
/// yields a non-finite value the baseline risk is returned unchanged.
pub fn adjust_risk_for_ldl(baseline_risk: f64, baseline_ldl: f64, projected_ldl: f64) -> f64 {
    let ldl_delta = baseline_ldl - projected_ldl;
    let rrr = (RRR_PER_MMOL * ldl_delta).min(MAX_RRR_PERCENT);
    let final_risk = baseline_risk * (1.0 - rrr / 100.0);

    if final_risk.is_finite() && ldl_delta.is_finite() {
        tracing::debug!(
            "LDL lowered by {:.3} mmol/L: RRR {:.1}%, risk {} -> {:.2}",
            ldl_delta,
            rrr,
            baseline_risk,
            final_risk
        );
        final_risk
    } else {
        tracing::warn!(
            "Risk adjustment failed (baseline_ldl={}, projected_ldl={}); keeping baseline risk {}",
            baseline_ldl,
            projected_ldl,
            baseline_risk
        );
        baseline_risk
    }
}
