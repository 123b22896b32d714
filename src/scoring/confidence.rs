//! Placeholder confidence sampling.
//!
//! The confidence attached to a prediction carries no predictive meaning:
//! it is a uniform draw from a fixed range, rounded to two decimals, and is
//! independent of the customer's features.

use crate::error::ApiError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Inclusive range confidence values are drawn from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceRange {
    pub min: f64,
    pub max: f64,
}

impl ConfidenceRange {
    pub fn is_valid(&self) -> bool {
        self.min.is_finite()
            && self.max.is_finite()
            && self.min >= 0.0
            && self.min <= self.max
            && self.max <= 1.0
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

impl Default for ConfidenceRange {
    fn default() -> Self {
        Self { min: 0.70, max: 0.95 }
    }
}

/// Where random draws come from
enum RandomSource {
    /// Fresh thread-local entropy per draw; nothing shared between requests
    Entropy,
    /// One seeded generator shared by all requests, for reproducible runs
    Seeded(Mutex<StdRng>),
}

/// Draws rounded confidence values from a [`ConfidenceRange`]
pub struct ConfidenceSampler {
    range: ConfidenceRange,
    source: RandomSource,
}

impl ConfidenceSampler {
    /// Sampler backed by the thread-local RNG
    pub fn from_entropy(range: ConfidenceRange) -> Self {
        Self {
            range,
            source: RandomSource::Entropy,
        }
    }

    /// Sampler with a deterministic sequence of draws
    pub fn seeded(range: ConfidenceRange, seed: u64) -> Self {
        Self {
            range,
            source: RandomSource::Seeded(Mutex::new(StdRng::seed_from_u64(seed))),
        }
    }

    /// Build from an optional seed, as found in configuration
    pub fn new(range: ConfidenceRange, seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(range, seed),
            None => Self::from_entropy(range),
        }
    }

    /// Seeded sampler whose lock is already poisoned, so every draw fails
    #[cfg(test)]
    pub(crate) fn poisoned(range: ConfidenceRange) -> Self {
        let sampler = Self::seeded(range, 0);
        if let RandomSource::Seeded(rng) = &sampler.source {
            let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                let _guard = rng.lock();
                panic!("poisoning confidence RNG");
            }));
        }
        sampler
    }

    pub fn range(&self) -> &ConfidenceRange {
        &self.range
    }

    pub fn is_seeded(&self) -> bool {
        matches!(self.source, RandomSource::Seeded(_))
    }

    /// Draw one confidence value, rounded to 2 decimal places
    pub fn sample(&self) -> Result<f64, ApiError> {
        let bounds = self.range.min..=self.range.max;
        let raw = match &self.source {
            RandomSource::Entropy => rand::thread_rng().gen_range(bounds),
            RandomSource::Seeded(rng) => rng
                .lock()
                .map_err(|e| ApiError::internal(format!("confidence RNG lock poisoned: {}", e)))?
                .gen_range(bounds),
        };

        // Rounding may step past bounds that are not whole hundredths
        Ok(round2(raw).clamp(self.range.min, self.range.max))
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
