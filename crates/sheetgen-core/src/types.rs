//! Column type tags and their cell decoders

use std::collections::BTreeMap;
use std::fmt;
use std::num::ParseFloatError;

use thiserror::Error;

use crate::value::Value;

/// Failure to decode a raw cell under its declared type
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Neither an integer nor a float
    #[error("not a number: {0}")]
    Number(#[from] ParseFloatError),

    /// Parsed, but NaN or infinite
    #[error("number is not finite")]
    NonFinite,

    /// Not a JSON literal of the expected shape
    #[error("invalid JSON literal: {0}")]
    Json(#[from] serde_json::Error),
}

/// The closed set of column types a schema row may declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    String,
    Boolean,
    Number,
    Object,
    Array,
}

impl TypeTag {
    /// All supported tags
    pub const ALL: [TypeTag; 5] = [
        TypeTag::String,
        TypeTag::Boolean,
        TypeTag::Number,
        TypeTag::Object,
        TypeTag::Array,
    ];

    /// Look up a tag by its schema text (exact, case-sensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(TypeTag::String),
            "boolean" => Some(TypeTag::Boolean),
            "number" => Some(TypeTag::Number),
            "object" => Some(TypeTag::Object),
            "array" => Some(TypeTag::Array),
            _ => None,
        }
    }

    /// The schema text for this tag
    pub fn name(&self) -> &'static str {
        match self {
            TypeTag::String => "string",
            TypeTag::Boolean => "boolean",
            TypeTag::Number => "number",
            TypeTag::Object => "object",
            TypeTag::Array => "array",
        }
    }

    /// Decode raw cell text according to this tag
    pub fn decode(&self, raw: &str) -> Result<Value, DecodeError> {
        match self {
            TypeTag::String => Ok(Value::String(raw.to_string())),
            TypeTag::Boolean => Ok(Value::Bool(raw.eq_ignore_ascii_case("true"))),
            TypeTag::Number => decode_number(raw),
            TypeTag::Object => {
                let map: BTreeMap<String, Value> = serde_json::from_str(raw)?;
                Ok(Value::Object(map))
            }
            TypeTag::Array => {
                let items: Vec<Value> = serde_json::from_str(raw)?;
                Ok(Value::Array(items))
            }
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Integer first, then float.
fn decode_number(raw: &str) -> Result<Value, DecodeError> {
    if let Ok(n) = raw.parse::<i64>() {
        return Ok(Value::Int(n));
    }
    let n = raw.parse::<f64>()?;
    if !n.is_finite() {
        return Err(DecodeError::NonFinite);
    }
    Ok(Value::Float(n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        for tag in TypeTag::ALL {
            assert_eq!(TypeTag::from_name(tag.name()), Some(tag));
        }
        assert_eq!(TypeTag::from_name("int32"), None);
        assert_eq!(TypeTag::from_name("Number"), None);
        assert_eq!(TypeTag::from_name(""), None);
    }

    #[test]
    fn test_string_is_identity() {
        assert_eq!(
            TypeTag::String.decode(" a b ").unwrap(),
            Value::String(" a b ".into())
        );
        assert_eq!(TypeTag::String.decode("").unwrap(), Value::String("".into()));
    }

    #[test]
    fn test_boolean() {
        assert_eq!(TypeTag::Boolean.decode("true").unwrap(), Value::Bool(true));
        assert_eq!(TypeTag::Boolean.decode("TRUE").unwrap(), Value::Bool(true));
        assert_eq!(TypeTag::Boolean.decode("True").unwrap(), Value::Bool(true));
        assert_eq!(TypeTag::Boolean.decode("1").unwrap(), Value::Bool(false));
        assert_eq!(TypeTag::Boolean.decode("").unwrap(), Value::Bool(false));
        assert_eq!(TypeTag::Boolean.decode("yes").unwrap(), Value::Bool(false));
    }

    #[test]
    fn test_number_integer_preferred() {
        assert_eq!(TypeTag::Number.decode("42").unwrap(), Value::Int(42));
        assert_eq!(TypeTag::Number.decode("-7").unwrap(), Value::Int(-7));
        assert_eq!(
            TypeTag::Number.decode("9223372036854775807").unwrap(),
            Value::Int(i64::MAX)
        );
    }

    #[test]
    fn test_number_float_fallback() {
        assert_eq!(TypeTag::Number.decode("3.25").unwrap(), Value::Float(3.25));
        assert_eq!(TypeTag::Number.decode("1e3").unwrap(), Value::Float(1000.0));
        // Out of i64 range falls back to float
        assert_eq!(
            TypeTag::Number.decode("9223372036854775808").unwrap(),
            Value::Float(9223372036854775808.0)
        );
    }

    #[test]
    fn test_number_errors() {
        assert!(matches!(
            TypeTag::Number.decode("abc"),
            Err(DecodeError::Number(_))
        ));
        assert!(matches!(
            TypeTag::Number.decode(""),
            Err(DecodeError::Number(_))
        ));
        assert!(matches!(
            TypeTag::Number.decode("NaN"),
            Err(DecodeError::NonFinite)
        ));
        assert!(matches!(
            TypeTag::Number.decode("inf"),
            Err(DecodeError::NonFinite)
        ));
    }

    #[test]
    fn test_object() {
        let v = TypeTag::Object.decode(r#"{"hp": 10, "tag": "x"}"#).unwrap();
        let map = match v {
            Value::Object(map) => map,
            other => panic!("expected object, got {}", other.kind()),
        };
        assert_eq!(map["hp"], Value::Int(10));
        assert_eq!(map["tag"], Value::String("x".into()));

        assert!(TypeTag::Object.decode("[1, 2]").is_err());
        assert!(TypeTag::Object.decode("").is_err());
    }

    #[test]
    fn test_array() {
        let v = TypeTag::Array.decode(r#"[1, 2.5, "a", [true]]"#).unwrap();
        assert_eq!(
            v,
            Value::Array(vec![
                Value::Int(1),
                Value::Float(2.5),
                Value::String("a".into()),
                Value::Array(vec![Value::Bool(true)]),
            ])
        );

        assert!(TypeTag::Array.decode(r#"{"a": 1}"#).is_err());
        assert!(TypeTag::Array.decode("[null]").is_err());
    }
}
