// src/core/value.rs

use crate::core::array::{ArrayData, ArrayError, ArrayValue};
use serde::Serialize;
use std::fmt;

/// Sentinel replies that stand in for a real value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StatusValue {
    /// "No value": written `!`.
    #[serde(rename = "!")]
    Null,
    /// "Abort the operation": written `!!`.
    #[serde(rename = "!!")]
    Abort,
}

impl StatusValue {
    /// The literal text that signals this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusValue::Null => "!",
            StatusValue::Abort => "!!",
        }
    }
}

/// A numeric scalar, integral when the text had neither fraction nor exponent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Number {
    /// An integer.
    Int(i64),
    /// A real number.
    Real(f64),
}

impl Number {
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Int(i) => *i as f64,
            Number::Real(r) => *r,
        }
    }

    /// The value as an integer, if it is integral.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Int(i) => Some(*i),
            Number::Real(r) => integral(*r),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{}", i),
            Number::Real(r) => write!(f, "{}", r),
        }
    }
}

/// Converts a double to an integer when it has no fractional part and fits.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn integral(value: f64) -> Option<i64> {
    // 2^63, exactly representable as a double.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    (value.is_finite() && value.fract() == 0.0 && (-LIMIT..LIMIT).contains(&value))
        .then_some(value as i64)
}

/// A single non-array value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(Number),
    Bool(bool),
    /// Text, including the `min`/`max` bound sentinels of numeric parameters.
    Str(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::Bool(true) => f.write_str("TRUE"),
            Scalar::Bool(false) => f.write_str("FALSE"),
            Scalar::Str(s) => f.write_str(s),
        }
    }
}

/// The contents of a parameter's value slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Scalar(Scalar),
    Array(ArrayValue),
    Status(StatusValue),
}

impl ParameterValue {
    /// Tells if this is the `!` or `!!` sentinel.
    pub fn is_status(&self) -> bool {
        matches!(self, ParameterValue::Status(_))
    }

    /// A short description of the runtime kind, used in diagnostics.
    pub fn type_name(&self) -> String {
        match self {
            ParameterValue::Scalar(Scalar::Number(_)) => "number".to_string(),
            ParameterValue::Scalar(Scalar::Bool(_)) => "boolean".to_string(),
            ParameterValue::Scalar(Scalar::Str(_)) => "string".to_string(),
            ParameterValue::Array(a) => format!("{} array", a.element_type().as_str()),
            ParameterValue::Status(StatusValue::Null) => "null".to_string(),
            ParameterValue::Status(StatusValue::Abort) => "abort".to_string(),
        }
    }

    /// Wraps a scalar into a one-element array of the matching element type.
    pub fn scalar_as_array(scalar: &Scalar) -> Result<ArrayValue, ArrayError> {
        let data = match scalar {
            Scalar::Number(n) => ArrayData::Double(vec![n.as_f64()]),
            Scalar::Bool(b) => ArrayData::Bool(vec![*b]),
            Scalar::Str(s) => ArrayData::Str(vec![s.clone()]),
        };
        ArrayValue::vector(data)
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::Scalar(s) => write!(f, "{}", s),
            ParameterValue::Array(a) => write!(f, "{}", a),
            ParameterValue::Status(s) => f.write_str(s.as_str()),
        }
    }
}

impl From<bool> for ParameterValue {
    fn from(value: bool) -> Self {
        ParameterValue::Scalar(Scalar::Bool(value))
    }
}

impl From<i64> for ParameterValue {
    fn from(value: i64) -> Self {
        ParameterValue::Scalar(Scalar::Number(Number::Int(value)))
    }
}

impl From<f64> for ParameterValue {
    fn from(value: f64) -> Self {
        ParameterValue::Scalar(Scalar::Number(Number::Real(value)))
    }
}

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        ParameterValue::Scalar(Scalar::Str(value.to_string()))
    }
}

impl From<ArrayValue> for ParameterValue {
    fn from(value: ArrayValue) -> Self {
        ParameterValue::Array(value)
    }
}

impl From<StatusValue> for ParameterValue {
    fn from(value: StatusValue) -> Self {
        ParameterValue::Status(value)
    }
}
