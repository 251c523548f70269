//! Input range checks performed by the input layer before calling the engine.
//!
//! The risk formulas only guard against values that make the math invalid.
//! These ranges are the ones the calculator form accepts.

use crate::{Error, PatientProfile, Result, TreatmentPlan};
use std::fmt::Display;
use std::ops::RangeInclusive;

pub const AGE_RANGE: RangeInclusive<u32> = 30..=100;
pub const SBP_RANGE: RangeInclusive<u32> = 90..=220;
pub const EGFR_RANGE: RangeInclusive<u32> = 15..=120;
pub const TOTAL_CHOLESTEROL_RANGE: RangeInclusive<f64> = 2.0..=10.0;
pub const HDL_RANGE: RangeInclusive<f64> = 0.5..=3.0;
pub const LDL_RANGE: RangeInclusive<f64> = 0.5..=6.0;
pub const CRP_RANGE: RangeInclusive<f64> = 0.1..=20.0;
pub const VASCULAR_COUNT_RANGE: RangeInclusive<u8> = 0..=3;
pub const TARGET_LDL_RANGE: RangeInclusive<f64> = 0.5..=3.0;

fn check<T: PartialOrd + Display>(
    errors: &mut Vec<String>,
    field: &str,
    value: T,
    range: &RangeInclusive<T>,
) {
    if !range.contains(&value) {
        errors.push(format!(
            "{} {} outside {}-{}",
            field,
            value,
            range.start(),
            range.end()
        ));
    }
}

impl PatientProfile {
    /// Range problems with this profile, or empty Vec if it is acceptable
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        check(&mut errors, "age", self.age, &AGE_RANGE);
        check(&mut errors, "systolic_bp", self.systolic_bp, &SBP_RANGE);
        check(&mut errors, "egfr", self.egfr, &EGFR_RANGE);
        check(
            &mut errors,
            "total_cholesterol",
            self.total_cholesterol,
            &TOTAL_CHOLESTEROL_RANGE,
        );
        check(&mut errors, "hdl", self.hdl, &HDL_RANGE);
        check(&mut errors, "ldl", self.ldl, &LDL_RANGE);
        check(&mut errors, "crp", self.crp, &CRP_RANGE);
        check(
            &mut errors,
            "vascular_disease_count",
            self.vascular_disease_count,
            &VASCULAR_COUNT_RANGE,
        );
        errors
    }
}

impl TreatmentPlan {
    /// Range problems with this plan, or empty Vec if it is acceptable
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        check(&mut errors, "target_ldl", self.target_ldl, &TARGET_LDL_RANGE);
        errors
    }
}

/// Validate both inputs, collecting every problem into one error
pub fn validate_inputs(profile: &PatientProfile, plan: &TreatmentPlan) -> Result<()> {
    let mut errors = profile.validate();
    errors.extend(plan.validate());

    if errors.is_empty() {
        Ok(())
    } else {
        tracing::debug!("Input validation failed: {:?}", errors);
        Err(Error::Validation(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate_inputs(&PatientProfile::default(), &TreatmentPlan::default()).is_ok());
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let profile = PatientProfile {
            age: 100,
            systolic_bp: 90,
            egfr: 15,
            total_cholesterol: 10.0,
            hdl: 0.5,
            ldl: 6.0,
            crp: 0.1,
            vascular_disease_count: 3,
            ..PatientProfile::default()
        };
        assert!(profile.validate().is_empty());
    }

    #[test]
    fn test_collects_all_problems() {
        let profile = PatientProfile {
            age: 18,
            systolic_bp: 250,
            crp: -1.0,
            ..PatientProfile::default()
        };
        let plan = TreatmentPlan {
            target_ldl: 5.0,
            ..TreatmentPlan::default()
        };

        match validate_inputs(&profile, &plan) {
            Err(Error::Validation(errors)) => {
                assert_eq!(errors.len(), 4, "{:?}", errors);
                assert!(errors[0].starts_with("age 18"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_nan_is_rejected() {
        let profile = PatientProfile {
            hdl: f64::NAN,
            ..PatientProfile::default()
        };
        assert_eq!(profile.validate().len(), 1);
    }
}
