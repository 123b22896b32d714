//! Customer feature and request structures

use crate::error::{FieldViolation, ValidationErrors};
use crate::types::lax;
use serde::{Deserialize, Serialize};

/// Customer attributes the spend category is derived from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerFeatures {
    /// Age in years, must be positive
    #[serde(deserialize_with = "lax::int")]
    pub age: i64,

    /// Income, must be strictly positive
    #[serde(deserialize_with = "lax::float")]
    pub income: f64,

    /// Average monthly spend, must be non-negative
    #[serde(deserialize_with = "lax::float")]
    pub avg_monthly_spend: f64,
}

impl CustomerFeatures {
    pub fn new(age: i64, income: f64, avg_monthly_spend: f64) -> Self {
        Self {
            age,
            income,
            avg_monthly_spend,
        }
    }

    /// Collect every bound violation, located under `prefix`.
    fn violations(&self, prefix: &[&str]) -> Vec<FieldViolation> {
        let mut violations = Vec::new();

        if self.age <= 0 {
            violations.push(FieldViolation::greater_than(prefix, "age", 0));
        }

        if !self.income.is_finite() {
            violations.push(FieldViolation::finite_number(prefix, "income"));
        } else if self.income <= 0.0 {
            violations.push(FieldViolation::greater_than(prefix, "income", 0));
        }

        if !self.avg_monthly_spend.is_finite() {
            violations.push(FieldViolation::finite_number(prefix, "avg_monthly_spend"));
        } else if self.avg_monthly_spend < 0.0 {
            violations.push(FieldViolation::greater_than_equal(
                prefix,
                "avg_monthly_spend",
                0,
            ));
        }

        violations
    }
}

/// Incoming body of `POST /predict`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictRequest {
    /// Opaque identifier, echoed back unchanged
    pub customer_id: String,

    pub feature: CustomerFeatures,
}

impl PredictRequest {
    pub fn new(customer_id: impl Into<String>, feature: CustomerFeatures) -> Self {
        Self {
            customer_id: customer_id.into(),
            feature,
        }
    }

    /// Check numeric bounds. Structural problems (missing fields, wrong
    /// types) are already rejected while deserializing.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        ValidationErrors::from_violations(self.feature.violations(&["body", "feature"]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_valid_request() {
        let request = PredictRequest::new("C1", CustomerFeatures::new(30, 5000.0, 200.0));
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_zero_spend_is_valid() {
        let request = PredictRequest::new("C2", CustomerFeatures::new(18, 1.0, 0.0));
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_all_violations_reported() {
        let request = PredictRequest::new("C3", CustomerFeatures::new(0, -10.0, -1.0));
        let errors = request.validate().unwrap_err();

        let fields: Vec<&str> = errors
            .violations()
            .iter()
            .map(|v| v.loc.last().unwrap().as_str())
            .collect();
        assert_eq!(fields, vec!["age", "income", "avg_monthly_spend"]);
        assert_eq!(errors.violations()[0].loc, vec!["body", "feature", "age"]);
        assert_eq!(errors.violations()[2].kind, "greater_than_equal");
    }

    #[test]
    fn test_zero_income_rejected() {
        let request = PredictRequest::new("C4", CustomerFeatures::new(40, 0.0, 100.0));
        let errors = request.validate().unwrap_err();
        assert_eq!(errors.violations().len(), 1);
        assert_eq!(errors.violations()[0].loc, vec!["body", "feature", "income"]);
        assert_eq!(errors.violations()[0].kind, "greater_than");
    }

    #[test]
    fn test_non_finite_rejected() {
        let features = CustomerFeatures::new(40, f64::NAN, f64::INFINITY);
        let violations = features.violations(&["feature"]);
        assert_eq!(violations.len(), 2);
        assert!(violations.iter().all(|v| v.kind == "finite_number"));

        let request = PredictRequest::new("C5", features);
        let errors = request.validate().unwrap_err();
        assert!(errors.violations().iter().all(|v| v.kind == "finite_number"));
    }

    #[test]
    fn test_request_deserialization() {
        let json = r#"{"customer_id":"C1","feature":{"age":30,"income":5000,"avg_monthly_spend":200.5}}"#;
        let request: PredictRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.customer_id, "C1");
        assert_eq!(request.feature.income, 5000.0);

        let fractional_age = r#"{"customer_id":"C1","feature":{"age":30.5,"income":5000,"avg_monthly_spend":1}}"#;
        assert!(serde_json::from_str::<PredictRequest>(fractional_age).is_err());

        let missing_id = r#"{"feature":{"age":30,"income":5000,"avg_monthly_spend":1}}"#;
        assert!(serde_json::from_str::<PredictRequest>(missing_id).is_err());
    }

    #[test]
    fn test_lenient_numeric_forms() {
        let json = r#"{"customer_id":"C6","feature":{"age":30.0,"income":"5000","avg_monthly_spend":"200"}}"#;
        let request: PredictRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.feature, CustomerFeatures::new(30, 5000.0, 200.0));
        assert!(request.validate().is_ok());
    }

    fn out_of_bounds_features() -> impl Strategy<Value = CustomerFeatures> {
        prop_oneof![
            (i64::MIN..=0i64, 1e-6f64..1e9, 0.0f64..1e9)
                .prop_map(|(a, i, s)| CustomerFeatures::new(a, i, s)),
            (1i64..150, -1e9f64..=0.0, 0.0f64..1e9)
                .prop_map(|(a, i, s)| CustomerFeatures::new(a, i, s)),
            (1i64..150, 1e-6f64..1e9, -1e9f64..-1e-9)
                .prop_map(|(a, i, s)| CustomerFeatures::new(a, i, s)),
        ]
    }

    proptest! {
        #[test]
        fn prop_out_of_bounds_never_validates(
            id in ".*",
            features in out_of_bounds_features(),
        ) {
            let request = PredictRequest::new(id, features);
            prop_assert!(request.validate().is_err());
        }

        #[test]
        fn prop_in_bounds_always_validates(
            age in 1i64..=i64::MAX,
            income in 1e-9f64..1e12,
            spend in 0.0f64..1e12,
        ) {
            let request = PredictRequest::new("ok", CustomerFeatures::new(age, income, spend));
            prop_assert!(request.validate().is_ok());
        }
    }
}
