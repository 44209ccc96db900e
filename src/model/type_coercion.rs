//! Coercion of raw JSON leaves into declared primitive types

use super::value::Primitive;
use crate::schema::PrimitiveType;
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use std::str::FromStr;

/// Result type for type coercion operations
pub type CoercionResult<T> = Result<T, CoercionError>;

/// Errors that can occur during type coercion
#[derive(Debug, Clone, PartialEq)]
pub enum CoercionError {
    /// Cannot coerce between the specified types
    IncompatibleTypes {
        /// Description of the source value
        from: String,
        /// Requested primitive type
        to: String,
    },
    /// The value format is invalid for the target type
    InvalidFormat {
        /// Offending value as text
        value: String,
        /// Requested primitive type
        target_type: String,
    },
}

impl CoercionError {
    /// Target type named by the error
    pub fn target_type(&self) -> &str {
        match self {
            CoercionError::IncompatibleTypes { to, .. } => to.as_str(),
            CoercionError::InvalidFormat { target_type, .. } => target_type.as_str(),
        }
    }

    /// Description of the rejected value
    pub fn found(&self) -> String {
        match self {
            CoercionError::IncompatibleTypes { from, .. } => from.clone(),
            CoercionError::InvalidFormat { value, .. } => format!("'{value}'"),
        }
    }
}

impl std::fmt::Display for CoercionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoercionError::IncompatibleTypes { from, to } => {
                write!(f, "Cannot coerce from {} to {}", from, to)
            }
            CoercionError::InvalidFormat { value, target_type } => {
                write!(f, "Invalid format '{}' for type {}", value, target_type)
            }
        }
    }
}

impl std::error::Error for CoercionError {}

/// Short description of a raw JSON value for diagnostics
pub fn describe(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => "null".to_string(),
        JsonValue::Bool(b) => format!("boolean {b}"),
        JsonValue::Number(n) => format!("number {n}"),
        JsonValue::String(s) => format!("string \"{s}\""),
        JsonValue::Array(items) => format!("array of {} element(s)", items.len()),
        JsonValue::Object(_) => "object".to_string(),
    }
}

/// Type coercion utility for raw document leaves
pub struct TypeCoercion;

impl TypeCoercion {
    /// Attempt to coerce a raw value to the declared element type
    pub fn coerce(value: &JsonValue, target_type: PrimitiveType) -> CoercionResult<Primitive> {
        match target_type {
            PrimitiveType::String => Self::coerce_to_string(value),
            PrimitiveType::Integer => Self::coerce_to_integer(value),
            PrimitiveType::Decimal => Self::coerce_to_decimal(value),
            PrimitiveType::Boolean => Self::coerce_to_boolean(value),
        }
    }

    /// Coerce value to string; only JSON strings qualify
    pub fn coerce_to_string(value: &JsonValue) -> CoercionResult<Primitive> {
        match value {
            JsonValue::String(s) => Ok(Primitive::String(s.clone())),
            _ => Err(Self::incompatible(value, PrimitiveType::String)),
        }
    }

    /// Coerce value to integer
    pub fn coerce_to_integer(value: &JsonValue) -> CoercionResult<Primitive> {
        match value {
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    return Ok(Primitive::Integer(i));
                }
                // Whole floats such as `3.0` are unambiguous
                match n.as_f64() {
                    Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                        Ok(Primitive::Integer(f as i64))
                    }
                    _ => Err(CoercionError::InvalidFormat {
                        value: n.to_string(),
                        target_type: PrimitiveType::Integer.to_string(),
                    }),
                }
            }
            JsonValue::String(s) => {
                if s.contains('.') {
                    Err(CoercionError::InvalidFormat {
                        value: s.clone(),
                        target_type: PrimitiveType::Integer.to_string(),
                    })
                } else {
                    match s.trim().parse::<i64>() {
                        Ok(i) => Ok(Primitive::Integer(i)),
                        Err(_) => Err(CoercionError::InvalidFormat {
                            value: s.clone(),
                            target_type: PrimitiveType::Integer.to_string(),
                        }),
                    }
                }
            }
            _ => Err(Self::incompatible(value, PrimitiveType::Integer)),
        }
    }

    /// Coerce value to decimal
    pub fn coerce_to_decimal(value: &JsonValue) -> CoercionResult<Primitive> {
        let text = match value {
            JsonValue::Number(n) => n.to_string(),
            JsonValue::String(s) => s.trim().to_string(),
            _ => return Err(Self::incompatible(value, PrimitiveType::Decimal)),
        };

        Decimal::from_str(&text)
            .or_else(|_| Decimal::from_scientific(&text))
            .map(Primitive::Decimal)
            .map_err(|_| CoercionError::InvalidFormat {
                value: text,
                target_type: PrimitiveType::Decimal.to_string(),
            })
    }

    /// Coerce value to boolean
    pub fn coerce_to_boolean(value: &JsonValue) -> CoercionResult<Primitive> {
        match value {
            JsonValue::Bool(b) => Ok(Primitive::Boolean(*b)),
            JsonValue::String(s) if s.eq_ignore_ascii_case("true") => Ok(Primitive::Boolean(true)),
            JsonValue::String(s) if s.eq_ignore_ascii_case("false") => {
                Ok(Primitive::Boolean(false))
            }
            JsonValue::String(s) => Err(CoercionError::InvalidFormat {
                value: s.clone(),
                target_type: PrimitiveType::Boolean.to_string(),
            }),
            _ => Err(Self::incompatible(value, PrimitiveType::Boolean)),
        }
    }

    fn incompatible(value: &JsonValue, target_type: PrimitiveType) -> CoercionError {
        CoercionError::IncompatibleTypes {
            from: describe(value),
            to: target_type.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_coercion_is_strict() {
        assert_eq!(
            TypeCoercion::coerce(&json!("2018-01-01"), PrimitiveType::String).unwrap(),
            Primitive::String("2018-01-01".into())
        );
        assert!(TypeCoercion::coerce(&json!(12), PrimitiveType::String).is_err());
        assert!(TypeCoercion::coerce(&json!({"a": 1}), PrimitiveType::String).is_err());
    }

    #[test]
    fn test_integer_coercion() {
        assert_eq!(
            TypeCoercion::coerce(&json!(180), PrimitiveType::Integer).unwrap(),
            Primitive::Integer(180)
        );
        assert_eq!(
            TypeCoercion::coerce(&json!(3.0), PrimitiveType::Integer).unwrap(),
            Primitive::Integer(3)
        );
        assert_eq!(
            TypeCoercion::coerce(&json!(" 42 "), PrimitiveType::Integer).unwrap(),
            Primitive::Integer(42)
        );

        let err = TypeCoercion::coerce(&json!(0.25), PrimitiveType::Integer).unwrap_err();
        assert_eq!(err.target_type(), "Integer");
        assert!(TypeCoercion::coerce(&json!("1.5"), PrimitiveType::Integer).is_err());
        assert!(TypeCoercion::coerce(&json!(true), PrimitiveType::Integer).is_err());
    }

    #[test]
    fn test_decimal_coercion_keeps_precision() {
        let value = TypeCoercion::coerce(&json!(-1.25), PrimitiveType::Decimal).unwrap();
        assert_eq!(value.to_string(), "-1.25");

        let value = TypeCoercion::coerce(&json!("0.50"), PrimitiveType::Decimal).unwrap();
        assert_eq!(value.to_string(), "0.50");

        let err = TypeCoercion::coerce(&json!("abc"), PrimitiveType::Decimal).unwrap_err();
        assert_eq!(err.found(), "'abc'");
    }

    #[test]
    fn test_boolean_coercion() {
        assert_eq!(
            TypeCoercion::coerce(&json!(false), PrimitiveType::Boolean).unwrap(),
            Primitive::Boolean(false)
        );
        assert_eq!(
            TypeCoercion::coerce(&json!("TRUE"), PrimitiveType::Boolean).unwrap(),
            Primitive::Boolean(true)
        );
        assert!(TypeCoercion::coerce(&json!("yes"), PrimitiveType::Boolean).is_err());
        assert!(TypeCoercion::coerce(&json!(1), PrimitiveType::Boolean).is_err());
    }

    #[test]
    fn test_describe() {
        assert_eq!(describe(&json!([1, 2])), "array of 2 element(s)");
        assert_eq!(describe(&json!("x")), "string \"x\"");
        assert_eq!(describe(&JsonValue::Null), "null");
    }
}
