//! Customer Spend Scoring Library
//!
//! Classifies customers into `low` / `medium` / `high` spend categories from
//! the ratio of average monthly spend to income, and serves the result over
//! a single JSON endpoint.

pub mod config;
pub mod error;
pub mod routes;
pub mod scoring;
pub mod server;
pub mod types;

pub use config::AppConfig;
pub use error::ApiError;
pub use scoring::{ConfidenceSampler, SpendClassifier};
pub use server::build_app;
pub use types::{CustomerFeatures, PredictRequest, PredictResponse, SpendCategory};
