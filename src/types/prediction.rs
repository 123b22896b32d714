//! Spend category and prediction response structures

use serde::{Deserialize, Serialize};
use std::fmt;

/// Spend category classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpendCategory {
    Low,
    Medium,
    High,
}

impl SpendCategory {
    /// Determine category from spend ratio and thresholds.
    ///
    /// Each threshold is the inclusive lower bound of its category.
    pub fn from_ratio(ratio: f64, thresholds: &SpendThresholds) -> Self {
        if ratio >= thresholds.high {
            SpendCategory::High
        } else if ratio >= thresholds.medium {
            SpendCategory::Medium
        } else {
            SpendCategory::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SpendCategory::Low => "low",
            SpendCategory::Medium => "medium",
            SpendCategory::High => "high",
        }
    }
}

impl fmt::Display for SpendCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configurable spend ratio boundaries
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpendThresholds {
    /// Ratios at or above this are at least `medium`
    pub medium: f64,
    /// Ratios at or above this are `high`
    pub high: f64,
}

impl SpendThresholds {
    pub fn is_valid(&self) -> bool {
        self.medium.is_finite()
            && self.high.is_finite()
            && self.medium >= 0.0
            && self.medium <= self.high
    }
}

impl Default for SpendThresholds {
    fn default() -> Self {
        Self {
            medium: 0.10,
            high: 0.30,
        }
    }
}

/// Body returned by a successful prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    /// Echo of the request's customer identifier
    pub customer_id: String,

    /// Spend category
    pub prediction: SpendCategory,

    /// Placeholder score, not backed by any model
    pub confidence: f64,
}
