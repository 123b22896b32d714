//! Spend ratio classification

use crate::config::ScoringConfig;
use crate::error::ApiError;
use crate::scoring::confidence::ConfidenceSampler;
use crate::types::customer::{CustomerFeatures, PredictRequest};
use crate::types::prediction::{PredictResponse, SpendCategory, SpendThresholds};
use tracing::{debug, info};

/// Ratio of average monthly spend to income.
///
/// Fails with [`ApiError::ZeroIncome`] instead of dividing by zero, even
/// though validated requests always carry a positive income.
pub fn spend_ratio(features: &CustomerFeatures) -> Result<f64, ApiError> {
    if features.income == 0.0 {
        return Err(ApiError::ZeroIncome);
    }
    Ok(features.avg_monthly_spend / features.income)
}

/// Maps customer features to a spend category plus placeholder confidence
pub struct SpendClassifier {
    thresholds: SpendThresholds,
    sampler: ConfidenceSampler,
}

impl SpendClassifier {
    pub fn new(thresholds: SpendThresholds, sampler: ConfidenceSampler) -> Self {
        Self {
            thresholds,
            sampler,
        }
    }

    /// Create a classifier from configuration
    pub fn from_config(config: &ScoringConfig) -> Self {
        let sampler = ConfidenceSampler::new(config.confidence.clone(), config.seed);

        info!(
            medium = config.thresholds.medium,
            high = config.thresholds.high,
            confidence_min = sampler.range().min,
            confidence_max = sampler.range().max,
            seeded = sampler.is_seeded(),
            "Spend classifier initialized"
        );

        Self::new(config.thresholds.clone(), sampler)
    }

    /// Category for the given features, without confidence
    pub fn classify(&self, features: &CustomerFeatures) -> Result<SpendCategory, ApiError> {
        let ratio = spend_ratio(features)?;
        Ok(SpendCategory::from_ratio(ratio, &self.thresholds))
    }

    /// Score a request. The request is expected to be validated already.
    pub fn predict(&self, request: &PredictRequest) -> Result<PredictResponse, ApiError> {
        let prediction = self.classify(&request.feature)?;
        let confidence = self.sampler.sample()?;

        debug!(
            customer_id = %request.customer_id,
            prediction = %prediction,
            confidence,
            "Customer classified"
        );

        Ok(PredictResponse {
            customer_id: request.customer_id.clone(),
            prediction,
            confidence,
        })
    }
}
