//! Lenient numeric deserializers for request fields.
//!
//! Integers accept JSON integers, floats with no fractional part (`30.0`)
//! and numeric strings (`"30"`). Floats accept any JSON number and numeric
//! strings. Booleans, nulls and non-numeric strings are rejected.

use serde::de::{self, Deserializer, Visitor};
use std::fmt;

// 2^63: the first f64 above every i64
const I64_UPPER: f64 = 9_223_372_036_854_775_808.0;

fn integral_f64<E: de::Error>(v: f64) -> Result<i64, E> {
    if !v.is_finite() || v.fract() != 0.0 {
        return Err(E::custom(format!(
            "Input should be a valid integer, got a number with a fractional part: {}",
            v
        )));
    }
    if v < -I64_UPPER || v >= I64_UPPER {
        return Err(E::custom(format!("integer out of range: {}", v)));
    }
    Ok(v as i64)
}

struct LaxInt;

impl<'de> Visitor<'de> for LaxInt {
    type Value = i64;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a valid integer")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
        Ok(v)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
        i64::try_from(v).map_err(|_| E::custom(format!("integer out of range: {}", v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<i64, E> {
        integral_f64(v)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<i64, E> {
        let trimmed = v.trim();
        if let Ok(n) = trimmed.parse::<i64>() {
            return Ok(n);
        }
        match trimmed.parse::<f64>() {
            Ok(f) => integral_f64(f),
            Err(_) => Err(E::invalid_value(de::Unexpected::Str(v), &self)),
        }
    }
}

struct LaxFloat;

impl<'de> Visitor<'de> for LaxFloat {
    type Value = f64;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a valid number")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
        Ok(v as f64)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
        Ok(v as f64)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
        Ok(v)
    }

    // Non-finite spellings ("inf", "NaN") parse here and are caught by validation
    fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
        v.trim()
            .parse::<f64>()
            .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
    }
}

pub fn int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    deserializer.deserialize_any(LaxInt)
}

pub fn float<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    deserializer.deserialize_any(LaxFloat)
}
