//! Cohort assessment from CSV.
//!
//! Each input row describes one patient and treatment plan. Rows are validated
//! and assessed independently; a bad row produces an output row carrying the
//! error and the run continues. Baseline risks go through a shared cache so
//! repeated profiles are computed once.

use crate::cache::{BaselineRiskCache, CacheStats};
use crate::{AddOn, PatientProfile, Result, RiskEngine, Sex, TreatmentPlan};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::io::{Read, Write};

/// A row in the cohort input CSV
#[derive(Debug, Deserialize)]
struct CohortRow {
    id: String,
    age: u32,
    sex: String,
    sbp: u32,
    total_chol: f64,
    hdl: f64,
    ldl: f64,
    smoker: bool,
    diabetes: bool,
    egfr: u32,
    crp: f64,
    vascular_count: u8,
    current_therapy: Option<String>,
    prescribed_therapy: Option<String>,
    /// `;`-separated add-on names
    add_ons: Option<String>,
    target_ldl: Option<f64>,
}

impl CohortRow {
    fn into_inputs(self, default_target_ldl: f64) -> std::result::Result<(PatientProfile, TreatmentPlan), String> {
        let sex: Sex = self.sex.parse()?;

        let add_ons = self
            .add_ons
            .as_deref()
            .unwrap_or("")
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse::<AddOn>)
            .collect::<std::result::Result<BTreeSet<_>, _>>()?;

        let profile = PatientProfile {
            age: self.age,
            sex,
            systolic_bp: self.sbp,
            total_cholesterol: self.total_chol,
            hdl: self.hdl,
            ldl: self.ldl,
            smoker: self.smoker,
            diabetes: self.diabetes,
            egfr: self.egfr,
            crp: self.crp,
            vascular_disease_count: self.vascular_count,
        };

        let plan = TreatmentPlan {
            current_therapy: self.current_therapy,
            prescribed_therapy: self.prescribed_therapy,
            add_ons,
            target_ldl: self.target_ldl.unwrap_or(default_target_ldl),
        };

        Ok((profile, plan))
    }
}

/// Column names of the cohort output CSV, in `ResultRow` field order
const RESULT_HEADER: [&str; 8] = [
    "id",
    "baseline_risk",
    "projected_ldl",
    "total_reduction",
    "final_risk",
    "tier",
    "target_met",
    "error",
];

/// A row in the cohort output CSV
#[derive(Debug, Default, Serialize)]
struct ResultRow {
    id: String,
    baseline_risk: Option<f64>,
    projected_ldl: Option<f64>,
    total_reduction: Option<f64>,
    final_risk: Option<f64>,
    tier: Option<String>,
    target_met: Option<bool>,
    error: Option<String>,
}

impl ResultRow {
    fn failed(id: String, error: String) -> Self {
        Self {
            id,
            error: Some(error),
            ..Self::default()
        }
    }
}

/// Outcome counts for a cohort run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CohortSummary {
    pub processed: usize,
    pub failed: usize,
    pub cache: CacheStats,
}

/// Assess every patient in `input`, writing one result row per patient to `output`
///
/// Only I/O failures on the output abort the run.
pub fn run_cohort<R: Read, W: Write>(
    input: R,
    output: W,
    engine: &RiskEngine<'_>,
    cache: &BaselineRiskCache,
    default_target_ldl: f64,
) -> Result<CohortSummary> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(input);
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(output);
    writer.write_record(RESULT_HEADER)?;
    let mut summary = CohortSummary::default();

    for (idx, row) in reader.deserialize::<CohortRow>().enumerate() {
        summary.processed += 1;

        let result = match row {
            Ok(row) => assess_row(row, engine, cache, default_target_ldl),
            Err(e) => ResultRow::failed(format!("row {}", idx + 1), e.to_string()),
        };

        if let Some(ref error) = result.error {
            summary.failed += 1;
            tracing::warn!("Cohort row {} ({}) failed: {}", idx + 1, result.id, error);
        }

        writer.serialize(&result)?;
    }

    writer.flush()?;
    summary.cache = cache.stats();

    tracing::info!(
        "Cohort run complete: {} rows, {} failed, cache {} hits / {} misses",
        summary.processed,
        summary.failed,
        summary.cache.hits,
        summary.cache.misses
    );

    Ok(summary)
}

fn assess_row(
    row: CohortRow,
    engine: &RiskEngine<'_>,
    cache: &BaselineRiskCache,
    default_target_ldl: f64,
) -> ResultRow {
    let id = row.id.clone();

    let (profile, plan) = match row.into_inputs(default_target_ldl) {
        Ok(inputs) => inputs,
        Err(e) => return ResultRow::failed(id, e),
    };

    if let Err(e) = crate::validation::validate_inputs(&profile, &plan) {
        return ResultRow::failed(id, e.to_string());
    }

    match engine.assess_cached(&profile, &plan, cache) {
        Ok(assessment) => ResultRow {
            id,
            baseline_risk: Some(assessment.baseline_risk_percent),
            projected_ldl: Some(round2(assessment.projected_ldl)),
            total_reduction: Some(assessment.total_ldl_reduction_percent),
            final_risk: Some(round2(assessment.final_risk_percent)),
            tier: Some(assessment.tier.label().to_string()),
            target_met: Some(assessment.target_met),
            error: None,
        },
        Err(e) => ResultRow::failed(id, e.to_string()),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
