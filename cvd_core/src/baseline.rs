//! Baseline 10-year cardiovascular risk estimation.
//!
//! Log-linear hazard model over demographics, blood pressure, lipids,
//! kidney function, inflammation and vascular disease burden.

use crate::{Error, PatientProfile, Result};

/// Baseline survival at the model horizon
const BASELINE_SURVIVAL: f64 = 0.900;

/// Centering constant subtracted from the linear predictor
const LP_CENTER: f64 = 5.8;

pub const MIN_RISK_PERCENT: f64 = 1.0;
pub const MAX_RISK_PERCENT: f64 = 99.0;

/// Estimate 10-year risk in percent, rounded to one decimal and clamped to [1, 99]
///
/// Returns `Error::Computation` naming the offending input when any term of the
/// model is not a finite number (for example `crp <= -1`).
pub fn estimate_baseline_risk(profile: &PatientProfile) -> Result<f64> {
    let lp = linear_predictor(profile)?;

    let hazard = (lp - LP_CENTER).exp();
    let risk10 = 1.0 - BASELINE_SURVIVAL.powf(hazard);
    if !risk10.is_finite() {
        return Err(Error::Computation {
            input: "linear_predictor",
        });
    }

    let percent = round_one_decimal(risk10 * 100.0);
    let clamped = percent.clamp(MIN_RISK_PERCENT, MAX_RISK_PERCENT);

    tracing::debug!(
        "Baseline risk: lp={:.4}, raw={:.3}%, reported={}%",
        lp,
        risk10 * 100.0,
        clamped
    );

    Ok(clamped)
}

/// Weighted sum of the model covariates
fn linear_predictor(profile: &PatientProfile) -> Result<f64> {
    let total_chol = finite(profile.total_cholesterol, "total_cholesterol")?;
    let hdl = finite(profile.hdl, "hdl")?;
    let crp_log = finite((profile.crp + 1.0).ln(), "crp")?;

    let smoke_val = if profile.smoker { 1.0 } else { 0.0 };
    let diabetes_val = if profile.diabetes { 1.0 } else { 0.0 };

    let lp = 0.064 * f64::from(profile.age)
        + 0.34 * profile.sex.model_value()
        + 0.02 * f64::from(profile.systolic_bp)
        + 0.25 * total_chol
        - 0.25 * hdl
        + 0.44 * smoke_val
        + 0.51 * diabetes_val
        - 0.2 * (f64::from(profile.egfr) / 10.0)
        + 0.25 * crp_log
        + 0.4 * f64::from(profile.vascular_disease_count);

    finite(lp, "linear_predictor")
}

fn finite(value: f64, input: &'static str) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::Computation { input })
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Sex;

    fn reference_profile() -> PatientProfile {
        PatientProfile {
            age: 65,
            sex: Sex::Male,
            systolic_bp: 140,
            total_cholesterol: 5.0,
            hdl: 1.0,
            ldl: 3.5,
            smoker: false,
            diabetes: false,
            egfr: 80,
            crp: 2.0,
            vascular_disease_count: 0,
        }
    }

    #[test]
    fn test_reference_patient() {
        let risk = estimate_baseline_risk(&reference_profile()).unwrap();
        assert_eq!(risk, 28.9);
    }

    #[test]
    fn test_reference_patient_female() {
        let mut profile = reference_profile();
        profile.sex = Sex::Female;
        assert_eq!(estimate_baseline_risk(&profile).unwrap(), 21.6);
    }

    #[test]
    fn test_clamped_to_minimum() {
        let profile = PatientProfile {
            age: 30,
            sex: Sex::Female,
            systolic_bp: 90,
            total_cholesterol: 2.0,
            hdl: 3.0,
            ldl: 1.0,
            smoker: false,
            diabetes: false,
            egfr: 120,
            crp: 0.1,
            vascular_disease_count: 0,
        };
        assert_eq!(estimate_baseline_risk(&profile).unwrap(), MIN_RISK_PERCENT);
    }

    #[test]
    fn test_clamped_to_maximum() {
        let profile = PatientProfile {
            age: 100,
            sex: Sex::Male,
            systolic_bp: 220,
            total_cholesterol: 10.0,
            hdl: 0.5,
            ldl: 6.0,
            smoker: true,
            diabetes: true,
            egfr: 15,
            crp: 20.0,
            vascular_disease_count: 3,
        };
        assert_eq!(estimate_baseline_risk(&profile).unwrap(), MAX_RISK_PERCENT);
    }

    #[test]
    fn test_invalid_crp_is_computation_error() {
        let mut profile = reference_profile();
        profile.crp = -1.0;
        let err = estimate_baseline_risk(&profile).unwrap_err();
        assert!(matches!(err, Error::Computation { input: "crp" }));

        profile.crp = -3.0;
        let err = estimate_baseline_risk(&profile).unwrap_err();
        assert!(matches!(err, Error::Computation { input: "crp" }));
    }

    #[test]
    fn test_nan_cholesterol_is_computation_error() {
        let mut profile = reference_profile();
        profile.total_cholesterol = f64::NAN;
        let err = estimate_baseline_risk(&profile).unwrap_err();
        assert!(matches!(
            err,
            Error::Computation {
                input: "total_cholesterol"
            }
        ));
    }

    #[test]
    fn test_deterministic() {
        let profile = reference_profile();
        let a = estimate_baseline_risk(&profile).unwrap();
        let b = estimate_baseline_risk(&profile).unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn test_range_over_valid_inputs() {
        for age in (30..=100).step_by(10) {
            for sbp in (90..=220).step_by(26) {
                for egfr in (15..=120).step_by(21) {
                    for vasc in 0..=3 {
                        for &crp in &[0.1, 2.0, 20.0] {
                            let profile = PatientProfile {
                                age,
                                systolic_bp: sbp,
                                egfr,
                                crp,
                                vascular_disease_count: vasc,
                                smoker: vasc % 2 == 0,
                                ..reference_profile()
                            };
                            let risk = estimate_baseline_risk(&profile).unwrap();
                            assert!(
                                (MIN_RISK_PERCENT..=MAX_RISK_PERCENT).contains(&risk),
                                "risk {} out of range for {:?}",
                                risk,
                                profile
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_monotonic_in_risk_factors() {
        let base = reference_profile();
        let risk = |p: PatientProfile| estimate_baseline_risk(&p).unwrap();

        let mut previous = 0.0;
        for age in 30..=100 {
            let r = risk(PatientProfile { age, ..base });
            assert!(r >= previous, "age {} decreased risk", age);
            previous = r;
        }

        let mut previous = 0.0;
        for sbp in 90..=220 {
            let r = risk(PatientProfile {
                systolic_bp: sbp,
                ..base
            });
            assert!(r >= previous, "sbp {} decreased risk", sbp);
            previous = r;
        }

        let mut previous = 0.0;
        for step in 0..=80 {
            let total_cholesterol = 2.0 + f64::from(step) * 0.1;
            let r = risk(PatientProfile {
                total_cholesterol,
                ..base
            });
            assert!(r >= previous, "total cholesterol {} decreased risk", total_cholesterol);
            previous = r;
        }

        let mut previous = 0.0;
        for vascular_disease_count in 0..=3 {
            let r = risk(PatientProfile {
                vascular_disease_count,
                ..base
            });
            assert!(r >= previous);
            previous = r;
        }

        assert!(risk(PatientProfile { smoker: true, ..base }) >= risk(base));
        assert!(risk(PatientProfile { diabetes: true, ..base }) >= risk(base));
    }

    #[test]
    fn test_hdl_is_protective() {
        let base = reference_profile();
        let mut previous = f64::MAX;
        for step in 0..=25 {
            let hdl = 0.5 + f64::from(step) * 0.1;
            let r = estimate_baseline_risk(&PatientProfile { hdl, ..base }).unwrap();
            assert!(r <= previous, "hdl {} increased risk", hdl);
            previous = r;
        }
    }
}
