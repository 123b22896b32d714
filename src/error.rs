//! Error types for the request path
//!
//! Every failure of `POST /predict` ends up as an [`ApiError`], which knows
//! its own status code and JSON body:
//! - `Validation` → 422 with field-level detail
//! - `ZeroIncome` → 400 with a fixed message
//! - `Internal` → 500 with the raw message text

use actix_web::error::JsonPayloadError;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use serde::Serialize;
use serde_json::json;
use std::fmt;

/// A single rejected input field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldViolation {
    /// Path to the offending value, e.g. `["body", "feature", "age"]`
    pub loc: Vec<String>,
    /// Human readable message
    pub msg: String,
    /// Machine readable violation kind
    #[serde(rename = "type")]
    pub kind: String,
}

impl FieldViolation {
    pub fn new(loc: Vec<String>, msg: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            loc,
            msg: msg.into(),
            kind: kind.into(),
        }
    }

    fn located(prefix: &[&str], field: &str) -> Vec<String> {
        prefix
            .iter()
            .chain(std::iter::once(&field))
            .map(|s| s.to_string())
            .collect()
    }

    pub fn greater_than(prefix: &[&str], field: &str, bound: i64) -> Self {
        Self::new(
            Self::located(prefix, field),
            format!("Input should be greater than {}", bound),
            "greater_than",
        )
    }

    pub fn greater_than_equal(prefix: &[&str], field: &str, bound: i64) -> Self {
        Self::new(
            Self::located(prefix, field),
            format!("Input should be greater than or equal to {}", bound),
            "greater_than_equal",
        )
    }

    pub fn finite_number(prefix: &[&str], field: &str) -> Self {
        Self::new(
            Self::located(prefix, field),
            "Input should be a finite number",
            "finite_number",
        )
    }

    /// The whole body could not be parsed into the expected shape
    pub fn invalid_body(msg: impl Into<String>) -> Self {
        Self::new(vec!["body".to_string()], msg, "json_invalid")
    }
}

/// Non-empty set of field violations
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationErrors(Vec<FieldViolation>);

impl ValidationErrors {
    /// `Ok(())` when there is nothing to report
    pub fn from_violations(violations: Vec<FieldViolation>) -> Result<(), Self> {
        if violations.is_empty() {
            Ok(())
        } else {
            Err(Self(violations))
        }
    }

    pub fn single(violation: FieldViolation) -> Self {
        Self(vec![violation])
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.0
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", v.loc.join("."), v.msg)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Terminal outcome of a failed prediction request
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request body failed schema or bounds checks
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// Ratio requested with a zero income
    #[error("Income cannot be zero for ratio calculation.")]
    ZeroIncome,

    /// Anything else that went wrong while scoring
    #[error("Internal Server Error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn internal(err: impl fmt::Display) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::ZeroIncome => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ApiError::Validation(errors) => json!({ "detail": errors.violations() }),
            other => json!({ "detail": other.to_string() }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

/// Maps JSON extraction failures (malformed JSON, missing fields, wrong
/// types, wrong content type) onto the 422 validation response.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let detail = match &err {
        JsonPayloadError::Deserialize(e) => e.to_string(),
        other => other.to_string(),
    };
    tracing::warn!(error = %detail, "Rejected request body");
    ApiError::from(ValidationErrors::single(FieldViolation::invalid_body(detail))).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    async fn body_json(err: &ApiError) -> serde_json::Value {
        let bytes = to_bytes(err.error_response().into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_codes() {
        let validation = ApiError::from(ValidationErrors::single(FieldViolation::invalid_body("x")));
        assert_eq!(validation.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(ApiError::ZeroIncome.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::internal("boom").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[actix_web::test]
    async fn test_zero_income_body() {
        let body = body_json(&ApiError::ZeroIncome).await;
        assert_eq!(body["detail"], "Income cannot be zero for ratio calculation.");
    }

    #[actix_web::test]
    async fn test_internal_body_includes_message() {
        let body = body_json(&ApiError::internal("rng lock poisoned")).await;
        assert_eq!(body["detail"], "Internal Server Error: rng lock poisoned");
    }

    #[actix_web::test]
    async fn test_validation_body_lists_fields() {
        let err = ApiError::from(ValidationErrors::single(FieldViolation::greater_than(
            &["body", "feature"],
            "age",
            0,
        )));
        let body = body_json(&err).await;
        assert_eq!(body["detail"][0]["loc"], json!(["body", "feature", "age"]));
        assert_eq!(body["detail"][0]["msg"], "Input should be greater than 0");
        assert_eq!(body["detail"][0]["type"], "greater_than");
    }

    #[test]
    fn test_validation_display() {
        let errors = ValidationErrors(vec![
            FieldViolation::greater_than(&["feature"], "age", 0),
            FieldViolation::greater_than(&["feature"], "income", 0),
        ]);
        assert_eq!(
            errors.to_string(),
            "feature.age: Input should be greater than 0; feature.income: Input should be greater than 0"
        );
    }

    #[test]
    fn test_empty_violations_are_ok() {
        assert!(ValidationErrors::from_violations(Vec::new()).is_ok());
    }
}
