//! HTTP handlers

use crate::error::ApiError;
use crate::scoring::SpendClassifier;
use crate::types::customer::PredictRequest;
use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, warn};
use uuid::Uuid;

pub const SERVICE_TITLE: &str = "TTB Customer Scoring API";
pub const SERVICE_DESCRIPTION: &str =
    "API for predicting spend categories based on income and spend ratio.";

/// Body of `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub title: String,
    pub description: String,
    pub version: String,
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl ServiceInfo {
    pub fn current() -> Self {
        Self {
            title: SERVICE_TITLE.to_string(),
            description: SERVICE_DESCRIPTION.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            status: "ok".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// `POST /predict`
pub async fn predict(
    classifier: web::Data<SpendClassifier>,
    body: web::Json<PredictRequest>,
) -> Result<HttpResponse, ApiError> {
    let request_id = Uuid::new_v4();
    let request = body.into_inner();

    if let Err(errors) = request.validate() {
        warn!(
            request_id = %request_id,
            customer_id = %request.customer_id,
            errors = %errors,
            "Prediction request failed validation"
        );
        return Err(errors.into());
    }

    match classifier.predict(&request) {
        Ok(response) => {
            info!(
                request_id = %request_id,
                customer_id = %response.customer_id,
                prediction = %response.prediction,
                confidence = response.confidence,
                "Prediction served"
            );
            Ok(HttpResponse::Ok().json(response))
        }
        Err(e @ ApiError::Internal(_)) => {
            error!(request_id = %request_id, error = %e, "Prediction failed");
            Err(e)
        }
        Err(e) => {
            warn!(request_id = %request_id, error = %e, "Prediction rejected");
            Err(e)
        }
    }
}

/// `GET /health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ServiceInfo::current())
}

pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(json!({ "detail": "Not Found" }))
}

pub async fn method_not_allowed() -> HttpResponse {
    HttpResponse::MethodNotAllowed().json(json!({ "detail": "Method Not Allowed" }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_info() {
        let info = ServiceInfo::current();
        assert_eq!(info.title, SERVICE_TITLE);
        assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(info.status, "ok");
    }
}
