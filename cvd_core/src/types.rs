//! Core domain types for the PRIME CVD risk engine.
//!
//! This module defines the values that flow through a calculation:
//! - Patient clinical inputs
//! - Lipid-lowering therapies and add-ons
//! - Treatment plans
//! - The resulting risk assessment

use crate::recommendation::RecommendationTier;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Patient Types
// ============================================================================

/// Biological sex as used by the risk model
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Model encoding: 1 for male, 0 for female
    pub fn model_value(self) -> f64 {
        match self {
            Sex::Male => 1.0,
            Sex::Female => 0.0,
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sex::Male => write!(f, "Male"),
            Sex::Female => write!(f, "Female"),
        }
    }
}

impl FromStr for Sex {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Sex::Male),
            "female" | "f" => Ok(Sex::Female),
            other => Err(format!("Unknown sex '{}' (expected male or female)", other)),
        }
    }
}

/// Clinical inputs for a single risk calculation
///
/// Units: cholesterol values in mmol/L, SBP in mmHg, eGFR in mL/min/1.73m²,
/// hs-CRP in mg/L.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct PatientProfile {
    pub age: u32,
    pub sex: Sex,
    pub systolic_bp: u32,
    pub total_cholesterol: f64,
    pub hdl: f64,
    pub ldl: f64,
    pub smoker: bool,
    pub diabetes: bool,
    pub egfr: u32,
    pub crp: f64,
    /// Number of affected vascular beds (coronary, cerebrovascular, peripheral)
    pub vascular_disease_count: u8,
}

impl Default for PatientProfile {
    fn default() -> Self {
        Self {
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
}

/// Vascular disease history, counted into `vascular_disease_count`
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VascularHistory {
    pub coronary_artery_disease: bool,
    pub cerebrovascular_disease: bool,
    pub peripheral_artery_disease: bool,
}

impl VascularHistory {
    /// Number of affected vascular beds (0-3)
    pub fn count(&self) -> u8 {
        [
            self.coronary_artery_disease,
            self.cerebrovascular_disease,
            self.peripheral_artery_disease,
        ]
        .iter()
        .filter(|present| **present)
        .count() as u8
    }
}

// ============================================================================
// Therapy Types
// ============================================================================

/// A catalog entry: therapy identifier and its modeled LDL reduction
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TherapyEntry {
    pub id: String,
    pub ldl_reduction_percent: f64,
}

/// Non-statin add-on therapies, each with a fixed incremental reduction
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AddOn {
    Ezetimibe,
    #[serde(rename = "PCSK9 inhibitor")]
    Pcsk9Inhibitor,
    Inclisiran,
}

impl AddOn {
    pub const ALL: [AddOn; 3] = [AddOn::Ezetimibe, AddOn::Pcsk9Inhibitor, AddOn::Inclisiran];

    /// Additional LDL reduction in percentage points
    pub fn ldl_reduction_percent(self) -> f64 {
        match self {
            AddOn::Ezetimibe => 20.0,
            AddOn::Pcsk9Inhibitor => 60.0,
            AddOn::Inclisiran => 50.0,
        }
    }
}

impl fmt::Display for AddOn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddOn::Ezetimibe => write!(f, "Ezetimibe"),
            AddOn::Pcsk9Inhibitor => write!(f, "PCSK9 inhibitor"),
            AddOn::Inclisiran => write!(f, "Inclisiran"),
        }
    }
}

impl FromStr for AddOn {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();

        match normalized.as_str() {
            "ezetimibe" => Ok(AddOn::Ezetimibe),
            "pcsk9" | "pcsk9inhibitor" => Ok(AddOn::Pcsk9Inhibitor),
            "inclisiran" => Ok(AddOn::Inclisiran),
            _ => Err(format!("Unknown add-on therapy '{}'", s.trim())),
        }
    }
}

/// Treatment regimen to evaluate against the baseline risk
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TreatmentPlan {
    /// Therapy the patient is already taking (`None` or "None" if untreated)
    pub current_therapy: Option<String>,
    /// Therapy being prescribed
    pub prescribed_therapy: Option<String>,
    #[serde(default)]
    pub add_ons: BTreeSet<AddOn>,
    /// LDL-C goal in mmol/L
    pub target_ldl: f64,
}

impl TreatmentPlan {
    /// Whether the patient is already on some lipid-lowering therapy
    pub fn has_prior_therapy(&self) -> bool {
        crate::catalog::is_therapy(self.current_therapy.as_deref())
    }
}

impl Default for TreatmentPlan {
    fn default() -> Self {
        Self {
            current_therapy: None,
            prescribed_therapy: Some("Rosuvastatin 10 mg".into()),
            add_ons: BTreeSet::new(),
            target_ldl: 1.4,
        }
    }
}

// ============================================================================
// Result Types
// ============================================================================

/// Projected LDL-C after a treatment regimen
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct LdlProjection {
    pub projected_ldl: f64,
    /// Combined reduction actually applied (after the ceiling)
    pub total_reduction_percent: f64,
    /// Additive sum of all therapy effects before the ceiling
    pub uncapped_reduction_percent: f64,
}

impl LdlProjection {
    pub fn is_capped(&self) -> bool {
        self.uncapped_reduction_percent > self.total_reduction_percent
    }
}

/// Outcome of a full risk-and-treatment calculation
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RiskAssessment {
    pub baseline_risk_percent: f64,
    pub projected_ldl: f64,
    pub total_ldl_reduction_percent: f64,
    pub uncapped_ldl_reduction_percent: f64,
    pub final_risk_percent: f64,
    /// Baseline minus final risk, in percentage points
    pub absolute_risk_reduction: f64,
    pub target_ldl: f64,
    pub target_met: bool,
    pub tier: RecommendationTier,
    pub recommendation: String,
}
