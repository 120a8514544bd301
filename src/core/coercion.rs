// EN: src/core/coercion.rs

//! Conversion between the raw text a user types and typed parameter values.
//!
//! Every parameter has a [`ParameterKind`] that decides how text is read: the
//! status sentinels `!` and `!!` come first, then arrays, then the scalar
//! rules of the kind.

use crate::core::array::{
    ArrayData, ArrayError, ArrayValue, is_array, is_open_array, parse_array, wrap_open_array,
};
use crate::core::value::{Number, ParameterValue, Scalar, StatusValue};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::{fmt, str::FromStr};
use thiserror::Error;

lazy_static! {
    static ref NUMBER_RE: Regex = Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([EeDd][+-]?\d+)?$")
        .expect("number pattern is a valid regex");
}

/// Represents the errors raised while turning text into a typed value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoercionError {
    /// A scalar could not be read as the parameter's kind.
    #[error("'{text}' cannot be converted to a {kind} value")]
    InvalidScalar { kind: &'static str, text: String },

    /// One element of an array could not be read; the whole array is rejected.
    #[error("array element '{element}' cannot be converted to a {kind} value")]
    InvalidElement { kind: &'static str, element: String },

    /// The array text itself is malformed.
    #[error(transparent)]
    Array(#[from] ArrayError),

    /// An interface file named a kind that does not exist.
    #[error("unknown parameter type '{name}'")]
    UnknownKind { name: String },
}

/// The declared type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterKind {
    /// Numbers, then booleans, then literal text.
    #[default]
    Generic,
    Boolean,
    Number,
    String,
    /// A string naming a file; read exactly like `String`.
    Filename,
}

impl ParameterKind {
    /// The lowercase name of the kind.
    pub fn name(&self) -> &'static str {
        match self {
            ParameterKind::Generic => "generic",
            ParameterKind::Boolean => "boolean",
            ParameterKind::Number => "number",
            ParameterKind::String => "string",
            ParameterKind::Filename => "filename",
        }
    }

    /// Converts raw text into a value of this kind.
    ///
    /// # Logic:
    /// - `!` and `!!` are the Null and Abort statuses for every kind.
    /// - Number and boolean kinds treat open arrays (`1 2 3`) and bracketed
    ///   text as arrays; a malformed array is an error.
    /// - Text kinds read an array only when the whole text is one bracket
    ///   group that parses; anything else is literal text.
    /// - Otherwise the scalar rules of the kind apply.
    pub fn coerce(&self, text: &str) -> Result<ParameterValue, CoercionError> {
        if let Some(status) = status_of(text) {
            return Ok(ParameterValue::Status(status));
        }

        let trimmed = text.trim();
        match self {
            ParameterKind::Number | ParameterKind::Boolean => {
                let candidate = wrap_open_array(trimmed);
                if is_array(&candidate) {
                    return self.coerce_array(&candidate).map(ParameterValue::Array);
                }
            }
            ParameterKind::String | ParameterKind::Filename | ParameterKind::Generic => {
                if is_array(trimmed) && !is_open_array(trimmed) {
                    match self.coerce_array(trimmed) {
                        Ok(array) => return Ok(ParameterValue::Array(array)),
                        Err(e) => log::debug!("Reading '{}' as text: {}", trimmed, e),
                    }
                }
            }
        }
        self.coerce_scalar(trimmed).map(ParameterValue::Scalar)
    }

    fn coerce_scalar(&self, text: &str) -> Result<Scalar, CoercionError> {
        let invalid = || CoercionError::InvalidScalar {
            kind: self.name(),
            text: text.to_string(),
        };
        match self {
            ParameterKind::Boolean => parse_boolean(text).map(Scalar::Bool).ok_or_else(invalid),
            ParameterKind::Number => {
                if let Some(bound) = bound_sentinel(text) {
                    return Ok(Scalar::Str(bound.to_string()));
                }
                parse_number(text).map(Scalar::Number).ok_or_else(invalid)
            }
            ParameterKind::String | ParameterKind::Filename => {
                Ok(Scalar::Str(unquote(text).to_string()))
            }
            ParameterKind::Generic => Ok(parse_number(text)
                .map(Scalar::Number)
                .or_else(|| parse_boolean(text).map(Scalar::Bool))
                .unwrap_or_else(|| Scalar::Str(text.to_string()))),
        }
    }

    fn coerce_array(&self, text: &str) -> Result<ArrayValue, CoercionError> {
        let parsed = parse_array(text)?;
        let invalid = |element: &str| CoercionError::InvalidElement {
            kind: self.name(),
            element: element.to_string(),
        };

        let data = match self {
            ParameterKind::Number => ArrayData::Double(
                parsed
                    .items
                    .iter()
                    .map(|item| parse_number(item).map(|n| n.as_f64()).ok_or_else(|| invalid(item)))
                    .collect::<Result<_, _>>()?,
            ),
            ParameterKind::Boolean => ArrayData::Bool(
                parsed
                    .items
                    .iter()
                    .map(|item| parse_boolean(item).ok_or_else(|| invalid(item)))
                    .collect::<Result<_, _>>()?,
            ),
            ParameterKind::String | ParameterKind::Filename => ArrayData::Str(parsed.items),
            ParameterKind::Generic => infer_elements(parsed.items),
        };
        Ok(ArrayValue::new(data, parsed.dims)?)
    }

    /// Tells if `value` may be stored in a parameter of this kind.
    pub fn accepts(&self, value: &ParameterValue) -> bool {
        use crate::core::array::ElementType;
        match (self, value) {
            (_, ParameterValue::Status(_)) | (ParameterKind::Generic, _) => true,
            (ParameterKind::Number, ParameterValue::Scalar(Scalar::Number(_))) => true,
            (ParameterKind::Number, ParameterValue::Scalar(Scalar::Str(s))) => {
                bound_sentinel(s).is_some()
            }
            (ParameterKind::Number, ParameterValue::Array(a)) => matches!(
                a.element_type(),
                ElementType::Double | ElementType::Int | ElementType::Float
            ),
            (ParameterKind::Boolean, ParameterValue::Scalar(Scalar::Bool(_))) => true,
            (ParameterKind::Boolean, ParameterValue::Array(a)) => {
                a.element_type() == ElementType::Bool
            }
            (
                ParameterKind::String | ParameterKind::Filename,
                ParameterValue::Scalar(Scalar::Str(_)),
            ) => true,
            (ParameterKind::String | ParameterKind::Filename, ParameterValue::Array(a)) => {
                a.element_type() == ElementType::String
            }
            _ => false,
        }
    }
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ParameterKind {
    type Err = CoercionError;

    /// Accepts the plain names plus the classic `_LOGICAL`, `_DOUBLE`, `_REAL`,
    /// `_INTEGER` and `_CHAR` spellings, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "generic" | "" => Ok(ParameterKind::Generic),
            "boolean" | "bool" | "_logical" => Ok(ParameterKind::Boolean),
            "number" | "_double" | "_real" | "_integer" => Ok(ParameterKind::Number),
            "string" | "_char" => Ok(ParameterKind::String),
            "filename" | "file" => Ok(ParameterKind::Filename),
            _ => Err(CoercionError::UnknownKind {
                name: s.to_string(),
            }),
        }
    }
}

/// Recognises the `!` (Null) and `!!` (Abort) replies.
pub fn status_of(text: &str) -> Option<StatusValue> {
    match text.trim() {
        "!" => Some(StatusValue::Null),
        "!!" => Some(StatusValue::Abort),
        _ => None,
    }
}

/// Reads `T, TRUE, Y, YES` / `F, FALSE, N, NO` in any case.
pub fn parse_boolean(text: &str) -> Option<bool> {
    match text.trim().to_ascii_uppercase().as_str() {
        "T" | "TRUE" | "Y" | "YES" => Some(true),
        "F" | "FALSE" | "N" | "NO" => Some(false),
        _ => None,
    }
}

/// Reads a decimal number, accepting `D`/`d` as an exponent marker.
pub fn parse_number(text: &str) -> Option<Number> {
    let text = text.trim();
    if !NUMBER_RE.is_match(text) {
        return None;
    }
    let normalized = text.replace(['D', 'd'], "E");
    let is_real = normalized.contains(['.', 'E', 'e']);
    if !is_real {
        if let Ok(i) = normalized.parse::<i64>() {
            return Some(Number::Int(i));
        }
    }
    normalized
        .parse::<f64>()
        .ok()
        .filter(|x| x.is_finite())
        .map(Number::Real)
}

fn bound_sentinel(text: &str) -> Option<&'static str> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("min") {
        Some("min")
    } else if text.eq_ignore_ascii_case("max") {
        Some("max")
    } else {
        None
    }
}

/// Strips one layer of matching quotes from a fully quoted value.
fn unquote(text: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = text.strip_prefix(quote).and_then(|t| t.strip_suffix(quote)) {
            if !inner.contains(quote) {
                return inner;
            }
        }
    }
    text
}

fn infer_elements(items: Vec<String>) -> ArrayData {
    if let Some(numbers) = items
        .iter()
        .map(|item| parse_number(item).map(|n| n.as_f64()))
        .collect::<Option<Vec<f64>>>()
    {
        return ArrayData::Double(numbers);
    }
    if let Some(flags) = items
        .iter()
        .map(|item| parse_boolean(item))
        .collect::<Option<Vec<bool>>>()
    {
        return ArrayData::Bool(flags);
    }
    ArrayData::Str(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_KINDS: [ParameterKind; 5] = [
        ParameterKind::Generic,
        ParameterKind::Boolean,
        ParameterKind::Number,
        ParameterKind::String,
        ParameterKind::Filename,
    ];

    #[test]
    fn test_status_sentinels_for_every_kind() {
        for kind in ALL_KINDS {
            assert_eq!(
                kind.coerce("!").unwrap(),
                ParameterValue::Status(StatusValue::Null),
                "kind {}",
                kind
            );
            assert_eq!(
                kind.coerce(" !! ").unwrap(),
                ParameterValue::Status(StatusValue::Abort),
                "kind {}",
                kind
            );
        }
    }

    #[test]
    fn test_boolean_words() {
        for text in ["yes", "Y", "TRUE", "t"] {
            assert_eq!(
                ParameterKind::Boolean.coerce(text).unwrap(),
                ParameterValue::from(true)
            );
        }
        for text in ["no", "N", "FALSE", "f"] {
            assert_eq!(
                ParameterKind::Boolean.coerce(text).unwrap(),
                ParameterValue::from(false)
            );
        }
        let err = ParameterKind::Boolean.coerce("maybe").unwrap_err();
        assert!(matches!(err, CoercionError::InvalidScalar { .. }));
        assert!(err.to_string().contains("maybe"));
    }

    #[test]
    fn test_number_forms() {
        assert_eq!(parse_number("42"), Some(Number::Int(42)));
        assert_eq!(parse_number("-.5"), Some(Number::Real(-0.5)));
        assert_eq!(parse_number("1.5D3"), Some(Number::Real(1500.0)));
        assert_eq!(parse_number("2e-1"), Some(Number::Real(0.2)));
        assert_eq!(parse_number("+7."), Some(Number::Real(7.0)));
        assert_eq!(parse_number("1.2.3"), None);
        assert_eq!(parse_number("abc"), None);
    }

    #[test]
    fn test_bound_sentinels_pass_through() {
        assert_eq!(
            ParameterKind::Number.coerce("MAX").unwrap(),
            ParameterValue::from("max")
        );
        assert!(ParameterKind::Number.coerce("middle").is_err());
    }

    #[test]
    fn test_open_and_closed_number_arrays_agree() {
        let open = ParameterKind::Number.coerce("1 2 3").unwrap();
        let closed = ParameterKind::Number.coerce("[1,2,3]").unwrap();
        assert_eq!(open, closed);
        match closed {
            ParameterValue::Array(a) => {
                assert_eq!(a.dims(), &[3]);
                assert_eq!(a.data(), &ArrayData::Double(vec![1.0, 2.0, 3.0]));
            }
            other => unreachable!("expected an array, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_element_names_the_element() {
        let err = ParameterKind::Number.coerce("[1, x, 3]").unwrap_err();
        assert_eq!(
            err,
            CoercionError::InvalidElement {
                kind: "number",
                element: "x".to_string()
            }
        );
    }

    #[test]
    fn test_grammar_errors_surface() {
        let err = ParameterKind::Number.coerce("[[1,2],[3]]").unwrap_err();
        assert!(matches!(err, CoercionError::Array(ArrayError::InconsistentCount { .. })));
    }

    #[test]
    fn test_string_unquoting_and_literal_text() {
        assert_eq!(
            ParameterKind::String.coerce("\"hello world\"").unwrap(),
            ParameterValue::from("hello world")
        );
        assert_eq!(
            ParameterKind::String.coerce("a b").unwrap(),
            ParameterValue::from("a b")
        );
        assert_eq!(
            ParameterKind::Filename.coerce("'x' 'y'").unwrap(),
            ParameterValue::from("'x' 'y'")
        );
        match ParameterKind::String.coerce("[a, \"b c\"]").unwrap() {
            ParameterValue::Array(a) => assert_eq!(
                a.data(),
                &ArrayData::Str(vec!["a".to_string(), "b c".to_string()])
            ),
            other => unreachable!("expected an array, got {:?}", other),
        }
    }

    #[test]
    fn test_text_kinds_keep_bracketed_text_that_is_not_one_array() {
        assert_eq!(
            ParameterKind::String.coerce("[draft] report").unwrap(),
            ParameterValue::from("[draft] report")
        );
        assert_eq!(
            ParameterKind::String.coerce("[a,b],c").unwrap(),
            ParameterValue::from("[a,b],c")
        );
        assert_eq!(
            ParameterKind::Filename.coerce("[[a],b]").unwrap(),
            ParameterValue::from("[[a],b]")
        );
        assert_eq!(
            ParameterKind::Generic.coerce("{unclosed").unwrap(),
            ParameterValue::from("{unclosed")
        );
        assert_eq!(
            ParameterKind::Generic.coerce("[1] [2]").unwrap(),
            ParameterValue::from("[1] [2]")
        );
    }

    #[test]
    fn test_numeric_kinds_still_reject_malformed_arrays() {
        assert!(ParameterKind::Number.coerce("{1, 2").is_err());
        assert!(ParameterKind::Boolean.coerce("[T],F").is_err());
    }

    #[test]
    fn test_overflowing_numbers_are_rejected() {
        assert_eq!(parse_number("1e999"), None);
        assert_eq!(parse_number("-1D400"), None);
        assert!(ParameterKind::Number.coerce("1e999").is_err());
        assert_eq!(
            ParameterKind::Generic.coerce("1e999").unwrap(),
            ParameterValue::from("1e999")
        );
    }

    #[test]
    fn test_generic_inference() {
        assert_eq!(
            ParameterKind::Generic.coerce("12").unwrap(),
            ParameterValue::from(12_i64)
        );
        assert_eq!(
            ParameterKind::Generic.coerce("yes").unwrap(),
            ParameterValue::from(true)
        );
        assert_eq!(
            ParameterKind::Generic.coerce("image.fits").unwrap(),
            ParameterValue::from("image.fits")
        );
        match ParameterKind::Generic.coerce("[T, F]").unwrap() {
            ParameterValue::Array(a) => assert_eq!(a.data(), &ArrayData::Bool(vec![true, false])),
            other => unreachable!("expected an array, got {:?}", other),
        }
    }

    #[test]
    fn test_accepted_values() {
        let numbers = ParameterKind::Number.coerce("1 2").unwrap();
        assert!(ParameterKind::Number.accepts(&numbers));
        assert!(!ParameterKind::Boolean.accepts(&numbers));
        assert!(ParameterKind::Generic.accepts(&numbers));
        assert!(ParameterKind::Number.accepts(&ParameterValue::from("min")));
        assert!(!ParameterKind::Number.accepts(&ParameterValue::from("text")));
        assert!(ParameterKind::String.accepts(&ParameterValue::Status(StatusValue::Abort)));
        assert!(!ParameterKind::String.accepts(&ParameterValue::from(1_i64)));
    }

    #[test]
    fn test_kind_names() {
        assert_eq!("_LOGICAL".parse::<ParameterKind>().unwrap(), ParameterKind::Boolean);
        assert_eq!("_integer".parse::<ParameterKind>().unwrap(), ParameterKind::Number);
        assert_eq!("_CHAR".parse::<ParameterKind>().unwrap(), ParameterKind::String);
        assert_eq!("Filename".parse::<ParameterKind>().unwrap(), ParameterKind::Filename);
        assert!("matrix".parse::<ParameterKind>().is_err());
    }
}
