//! Risk assessment pipeline.
//!
//! Runs the calculation end to end:
//! - Baseline 10-year risk from the patient profile
//! - LDL-C projection for the treatment plan
//! - Risk after LDL lowering
//! - Recommendation tier for the final risk
//!
//! A baseline failure aborts the pipeline before any treatment step runs.

use crate::baseline::estimate_baseline_risk;
use crate::cache::BaselineRiskCache;
use crate::catalog::{get_default_catalog, TherapyCatalog};
use crate::config::TreatmentConfig;
use crate::recommendation::RecommendationTier;
use crate::treatment::{adjust_risk_for_ldl, project_ldl, DEFAULT_MAX_TOTAL_REDUCTION_PERCENT};
use crate::{PatientProfile, Result, RiskAssessment, TreatmentPlan};

/// Calculation engine bound to a therapy catalog and treatment settings
#[derive(Clone, Debug)]
pub struct RiskEngine<'a> {
    catalog: &'a TherapyCatalog,
    max_total_reduction_percent: f64,
}

impl RiskEngine<'static> {
    /// Engine over the built-in catalog with default settings
    pub fn with_defaults() -> Self {
        Self {
            catalog: get_default_catalog(),
            max_total_reduction_percent: DEFAULT_MAX_TOTAL_REDUCTION_PERCENT,
        }
    }
}

impl<'a> RiskEngine<'a> {
    pub fn new(catalog: &'a TherapyCatalog, treatment: &TreatmentConfig) -> Self {
        Self {
            catalog,
            max_total_reduction_percent: treatment.max_total_reduction_percent,
        }
    }

    pub fn catalog(&self) -> &'a TherapyCatalog {
        self.catalog
    }

    /// Full assessment for one patient and treatment plan
    pub fn assess(&self, profile: &PatientProfile, plan: &TreatmentPlan) -> Result<RiskAssessment> {
        let baseline = estimate_baseline_risk(profile)?;
        Ok(self.apply_treatment(baseline, profile, plan))
    }

    /// Same as [`assess`](Self::assess), reading the baseline through `cache`
    pub fn assess_cached(
        &self,
        profile: &PatientProfile,
        plan: &TreatmentPlan,
        cache: &BaselineRiskCache,
    ) -> Result<RiskAssessment> {
        let baseline = cache.get_or_compute(profile)?;
        Ok(self.apply_treatment(baseline, profile, plan))
    }

    fn apply_treatment(
        &self,
        baseline_risk: f64,
        profile: &PatientProfile,
        plan: &TreatmentPlan,
    ) -> RiskAssessment {
        let projection = project_ldl(
            self.catalog,
            profile.ldl,
            plan.current_therapy.as_deref(),
            plan.prescribed_therapy.as_deref(),
            &plan.add_ons,
            self.max_total_reduction_percent,
        );

        let final_risk = adjust_risk_for_ldl(baseline_risk, profile.ldl, projection.projected_ldl);
        let tier = RecommendationTier::for_risk(final_risk);

        tracing::info!(
            "Assessment: baseline {}% -> final {:.1}% ({}), LDL {} -> {:.2} mmol/L",
            baseline_risk,
            final_risk,
            tier,
            profile.ldl,
            projection.projected_ldl
        );

        RiskAssessment {
            baseline_risk_percent: baseline_risk,
            projected_ldl: projection.projected_ldl,
            total_ldl_reduction_percent: projection.total_reduction_percent,
            uncapped_ldl_reduction_percent: projection.uncapped_reduction_percent,
            final_risk_percent: final_risk,
            absolute_risk_reduction: baseline_risk - final_risk,
            target_ldl: plan.target_ldl,
            target_met: projection.projected_ldl <= plan.target_ldl,
            tier,
            recommendation: tier.recommendation(),
        }
    }
}
