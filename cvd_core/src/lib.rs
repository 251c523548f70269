#![forbid(unsafe_code)]

//! Core calculation engine for the PRIME CVD risk calculator.
//!
//! This crate provides:
//! - Domain types (patient profile, treatment plan, assessment)
//! - Therapy catalog
//! - Baseline 10-year risk estimation
//! - Treatment effect model and recommendation tiers
//! - Report rendering, cohort runs, configuration

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod baseline;
pub mod treatment;
pub mod recommendation;
pub mod validation;
pub mod cache;
pub mod engine;
pub mod report;
pub mod batch;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_catalog, get_default_catalog, TherapyCatalog, NO_THERAPY};
pub use config::Config;
pub use baseline::estimate_baseline_risk;
pub use treatment::{adjust_risk_for_ldl, project_ldl};
pub use recommendation::{generate_recommendation, RecommendationTier};
pub use validation::validate_inputs;
pub use cache::BaselineRiskCache;
pub use engine::RiskEngine;
pub use report::{PatientIdentity, Report, ReportFormat};
pub use batch::{run_cohort, CohortSummary};
