//! Spend classification components

pub mod classifier;
pub mod confidence;

pub use classifier::{spend_ratio, SpendClassifier};
pub use confidence::{ConfidenceRange, ConfidenceSampler};
