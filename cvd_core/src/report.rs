//! Patient report rendering.
//!
//! A report pairs a finished [`RiskAssessment`] with the patient's identity and
//! can be rendered as plain text or JSON and written to a report directory.

use crate::{Error, Result, RiskAssessment, Sex};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tempfile::NamedTempFile;
use uuid::Uuid;

pub const REPORT_TITLE: &str = "PRIME CVD Risk Assessment";

/// Identity fields printed on the report
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PatientIdentity {
    pub name: String,
    pub age: u32,
    pub sex: Sex,
}

/// Output format for a written report
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

impl ReportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Json => "json",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            other => Err(format!("Unknown report format '{}' (expected text or json)", other)),
        }
    }
}

/// A rendered-ready patient report
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Report {
    pub report_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub patient: PatientIdentity,
    /// LDL-C before treatment, mmol/L
    pub current_ldl: f64,
    pub assessment: RiskAssessment,
}

impl Report {
    /// Build a report; the patient name must not be blank
    pub fn new(patient: PatientIdentity, current_ldl: f64, assessment: RiskAssessment) -> Result<Self> {
        if patient.name.trim().is_empty() {
            return Err(Error::Report("patient name is required".into()));
        }

        Ok(Self {
            report_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            patient,
            current_ldl,
            assessment,
        })
    }

    /// Plain-text document
    pub fn render_text(&self) -> String {
        let a = &self.assessment;
        let mut out = String::new();

        // Writing into a String cannot fail
        let _ = writeln!(out, "{}", REPORT_TITLE);
        let _ = writeln!(out, "{}", "=".repeat(REPORT_TITLE.len()));
        let _ = writeln!(
            out,
            "Generated: {}  (report {})",
            self.generated_at.format("%Y-%m-%d %H:%M UTC"),
            self.report_id
        );
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Patient: {}, Age: {}, Sex: {}",
            self.patient.name.trim(),
            self.patient.age,
            self.patient.sex
        );
        let _ = writeln!(out, "Baseline Risk: {:.1}%", a.baseline_risk_percent);
        let _ = writeln!(out, "Final Risk: {:.1}%", a.final_risk_percent);
        let _ = writeln!(out, "Absolute Risk Reduction: {:.1}%", a.absolute_risk_reduction);
        let _ = writeln!(out, "Current LDL: {:.1} mmol/L", self.current_ldl);
        let _ = writeln!(out, "Target LDL: {:.1} mmol/L", a.target_ldl);
        let _ = writeln!(
            out,
            "Projected LDL: {:.1} mmol/L ({:.1}% reduction{})",
            a.projected_ldl,
            a.total_ldl_reduction_percent,
            if a.uncapped_ldl_reduction_percent > a.total_ldl_reduction_percent {
                ", capped"
            } else {
                ""
            }
        );
        let _ = writeln!(
            out,
            "LDL Target: {}",
            if a.target_met { "achieved" } else { "not achieved" }
        );
        let _ = writeln!(out);
        let _ = writeln!(out, "Recommendations: {}", a.recommendation);

        out
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report into `dir` as `<Name>_CVD_Report.<ext>`
    ///
    /// The file is written to a temp file in the same directory and renamed
    /// into place. Returns the final path.
    pub fn write_to_dir(&self, dir: &Path, format: ReportFormat) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)?;

        let path = dir.join(format!(
            "{}.{}",
            file_stem(&self.patient.name),
            format.extension()
        ));

        let contents = match format {
            ReportFormat::Text => self.render_text(),
            ReportFormat::Json => self.to_json()?,
        };

        let mut temp = NamedTempFile::new_in(dir)?;
        temp.write_all(contents.as_bytes())?;
        temp.as_file().sync_all()?;
        temp.persist(&path).map_err(|e| Error::Io(e.error))?;

        tracing::info!("Wrote report {} to {:?}", self.report_id, path);
        Ok(path)
    }
}

/// File stem for a patient's report: spaces become underscores
pub fn file_stem(patient_name: &str) -> String {
    let safe: String = patient_name
        .trim()
        .chars()
        .map(|c| match c {
            ' ' => '_',
            '/' | '\\' | ':' => '-',
            other => other,
        })
        .collect();
    format!("{}_CVD_Report", safe)
}
