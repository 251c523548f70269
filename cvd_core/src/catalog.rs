//! Therapy catalog: statin identifiers and their modeled LDL reduction.
//!
//! The built-in entries cover the statin doses offered by the calculator.
//! A catalog can be extended with custom entries at construction time and is
//! read-only afterwards.

use crate::types::TherapyEntry;
use once_cell::sync::Lazy;
use std::collections::BTreeMap;

/// Sentinel identifier meaning "no therapy"
pub const NO_THERAPY: &str = "None";

/// Cached default catalog - built once and reused across all calculations
static DEFAULT_CATALOG: Lazy<TherapyCatalog> = Lazy::new(build_default_catalog);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static TherapyCatalog {
    &DEFAULT_CATALOG
}

/// Returns true when `id` names an actual therapy rather than the absence of one
pub fn is_therapy(id: Option<&str>) -> bool {
    matches!(id, Some(id) if id.trim() != NO_THERAPY && !id.trim().is_empty())
}

/// Builds the catalog with the built-in statin doses
///
/// **Note**: prefer `get_default_catalog()` unless custom entries are needed.
pub fn build_default_catalog() -> TherapyCatalog {
    TherapyCatalog::from_entries([
        ("Atorvastatin 20 mg", 40.0),
        ("Atorvastatin 80 mg", 50.0),
        ("Rosuvastatin 10 mg", 45.0),
        ("Rosuvastatin 20 mg", 55.0),
    ])
}

/// Mapping from therapy identifier to LDL-reduction percentage
#[derive(Clone, Debug)]
pub struct TherapyCatalog {
    entries: BTreeMap<String, TherapyEntry>,
}

impl TherapyCatalog {
    fn from_entries<'a>(entries: impl IntoIterator<Item = (&'a str, f64)>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(id, reduction)| {
                (
                    id.to_string(),
                    TherapyEntry {
                        id: id.to_string(),
                        ldl_reduction_percent: reduction,
                    },
                )
            })
            .collect();
        Self { entries }
    }

    /// Default catalog plus `custom` entries (custom entries override built-ins)
    pub fn with_custom(custom: &[TherapyEntry]) -> Self {
        let mut catalog = build_default_catalog();
        for entry in custom {
            let id = entry.id.trim();
            if catalog.entries.contains_key(id) {
                tracing::info!("Custom therapy '{}' overrides built-in entry", id);
            }
            catalog.entries.insert(
                id.to_string(),
                TherapyEntry {
                    id: id.to_string(),
                    ldl_reduction_percent: entry.ldl_reduction_percent,
                },
            );
        }
        catalog
    }

    /// LDL reduction for `id`, or 0 for unknown identifiers and "None"
    pub fn lookup(&self, id: &str) -> f64 {
        let id = id.trim();
        match self.entries.get(id) {
            Some(entry) => entry.ldl_reduction_percent,
            None => {
                if id != NO_THERAPY {
                    tracing::debug!("Therapy '{}' not in catalog, assuming no effect", id);
                }
                0.0
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&TherapyEntry> {
        self.entries.get(id.trim())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id.trim())
    }

    /// All entries, sorted by identifier
    pub fn entries(&self) -> impl Iterator<Item = &TherapyEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Validate the catalog for consistency
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (id, entry) in &self.entries {
            if id.trim().is_empty() {
                errors.push("Therapy has empty ID".to_string());
            }
            if id == NO_THERAPY {
                errors.push(format!("'{}' is reserved and cannot be a therapy", NO_THERAPY));
            }
            let reduction = entry.ldl_reduction_percent;
            if !reduction.is_finite() || !(0.0..100.0).contains(&reduction) {
                errors.push(format!(
                    "Therapy '{}': LDL reduction {} outside [0, 100)",
                    id, reduction
                ));
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_loads() {
        let catalog = build_default_catalog();
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.lookup("Atorvastatin 20 mg"), 40.0);
        assert_eq!(catalog.lookup("Atorvastatin 80 mg"), 50.0);
        assert_eq!(catalog.lookup("Rosuvastatin 10 mg"), 45.0);
        assert_eq!(catalog.lookup("Rosuvastatin 20 mg"), 55.0);
    }

    #[test]
    fn test_unknown_and_none_yield_zero() {
        let catalog = get_default_catalog();
        assert_eq!(catalog.lookup(NO_THERAPY), 0.0);
        assert_eq!(catalog.lookup("Simvastatin 40 mg"), 0.0);
        assert_eq!(catalog.lookup(""), 0.0);
    }

    #[test]
    fn test_entries_sorted() {
        let ids: Vec<_> = build_default_catalog()
            .entries()
            .map(|e| e.id.clone())
            .collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn test_custom_entries_extend_and_override() {
        let catalog = TherapyCatalog::with_custom(&[
            TherapyEntry {
                id: "Pitavastatin 4 mg".into(),
                ldl_reduction_percent: 42.0,
            },
            TherapyEntry {
                id: "Rosuvastatin 20 mg".into(),
                ldl_reduction_percent: 52.0,
            },
        ]);
        assert_eq!(catalog.len(), 5);
        assert_eq!(catalog.lookup("Pitavastatin 4 mg"), 42.0);
        assert_eq!(catalog.lookup("Rosuvastatin 20 mg"), 52.0);
        // The shared default is untouched
        assert_eq!(get_default_catalog().lookup("Rosuvastatin 20 mg"), 55.0);
    }

    #[test]
    fn test_default_catalog_validates() {
        let errors = build_default_catalog().validate();
        assert!(errors.is_empty(), "Default catalog has errors: {:?}", errors);
    }

    #[test]
    fn test_validate_flags_bad_entries() {
        let catalog = TherapyCatalog::with_custom(&[
            TherapyEntry {
                id: NO_THERAPY.into(),
                ldl_reduction_percent: 10.0,
            },
            TherapyEntry {
                id: "Overdose".into(),
                ldl_reduction_percent: 120.0,
            },
        ]);
        let errors = catalog.validate();
        assert_eq!(errors.len(), 2, "{:?}", errors);
    }

    #[test]
    fn test_is_therapy() {
        assert!(!is_therapy(None));
        assert!(!is_therapy(Some("None")));
        assert!(!is_therapy(Some("")));
        assert!(is_therapy(Some("Atorvastatin 20 mg")));
        assert!(is_therapy(Some("Something unlisted")));
    }

    #[test]
    fn test_padded_identifiers_resolve() {
        let catalog = get_default_catalog();
        assert_eq!(catalog.lookup(" Rosuvastatin 20 mg "), 55.0);
        assert!(catalog.contains("Atorvastatin 80 mg\t"));
        assert_eq!(
            catalog
                .get("  Atorvastatin 20 mg")
                .map(|e| e.ldl_reduction_percent),
            Some(40.0)
        );
        assert_eq!(catalog.lookup(" None "), 0.0);

        let custom = TherapyCatalog::with_custom(&[TherapyEntry {
            id: " Pitavastatin 4 mg ".into(),
            ldl_reduction_percent: 42.0,
        }]);
        assert_eq!(custom.lookup("Pitavastatin 4 mg"), 42.0);
        assert!(custom.validate().is_empty());
    }
}
