//! Error types for the cvd_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for cvd_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A risk formula produced a non-finite value
    ///
    /// `input` names the patient field (or intermediate term) that made the
    /// computation invalid.
    #[error("Computation error: invalid value for {input}")]
    Computation { input: &'static str },

    /// Patient or treatment inputs outside the accepted ranges
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Catalog validation error
    #[error("Catalog validation error: {0}")]
    CatalogValidation(String),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Report rendering or writing error
    #[error("Report error: {0}")]
    Report(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Returns true for failures raised by the risk formulas themselves
    pub fn is_computation(&self) -> bool {
        matches!(self, Error::Computation { .. })
    }
}
