//! Read-through cache for baseline risk estimates.
//!
//! The estimator is pure, so a result computed once for a given set of model
//! inputs can be reused. The cache belongs to whichever layer evaluates many
//! profiles (the cohort runner); the estimator itself knows nothing about it.
//! Entries live in a bounded moka cache.

use crate::baseline::estimate_baseline_risk;
use crate::{PatientProfile, Result, Sex};
use moka::sync::Cache;
use std::sync::atomic::{AtomicU64, Ordering};

/// Default maximum number of cached profiles
pub const DEFAULT_CACHE_CAPACITY: u64 = 10_000;

/// Model inputs of the baseline estimator
///
/// Floating-point fields are keyed by bit pattern. LDL-C is not an input to
/// the baseline model and is left out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ProfileKey {
    age: u32,
    sex: Sex,
    systolic_bp: u32,
    total_cholesterol: u64,
    hdl: u64,
    smoker: bool,
    diabetes: bool,
    egfr: u32,
    crp: u64,
    vascular_disease_count: u8,
}

impl From<&PatientProfile> for ProfileKey {
    fn from(profile: &PatientProfile) -> Self {
        Self {
            age: profile.age,
            sex: profile.sex,
            systolic_bp: profile.systolic_bp,
            total_cholesterol: profile.total_cholesterol.to_bits(),
            hdl: profile.hdl.to_bits(),
            smoker: profile.smoker,
            diabetes: profile.diabetes,
            egfr: profile.egfr,
            crp: profile.crp.to_bits(),
            vascular_disease_count: profile.vascular_disease_count,
        }
    }
}

/// Hit/miss counters
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Bounded, thread-safe map from model inputs to baseline risk
///
/// Failed computations are never stored.
pub struct BaselineRiskCache {
    cache: Cache<ProfileKey, f64>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl Default for BaselineRiskCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }
}

impl BaselineRiskCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache holding at most `max_entries` profiles
    pub fn with_capacity(max_entries: u64) -> Self {
        Self {
            cache: Cache::builder().max_capacity(max_entries).build(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Cached baseline risk for `profile`, computing and storing it on a miss
    pub fn get_or_compute(&self, profile: &PatientProfile) -> Result<f64> {
        let key = ProfileKey::from(profile);

        if let Some(risk) = self.cache.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::trace!("Baseline cache hit: {}%", risk);
            return Ok(risk);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let risk = estimate_baseline_risk(profile)?;
        self.cache.insert(key, risk);

        Ok(risk)
    }

    /// Number of cached profiles (after applying pending evictions)
    pub fn len(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl std::fmt::Debug for BaselineRiskCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BaselineRiskCache")
            .field("entries", &self.cache.entry_count())
            .field("stats", &self.stats())
            .finish()
    }
}
