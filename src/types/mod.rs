//! Type definitions for the spend scoring service

pub mod customer;
pub mod lax;
pub mod prediction;

pub use customer::{CustomerFeatures, PredictRequest};
pub use prediction::{PredictResponse, SpendCategory, SpendThresholds};
