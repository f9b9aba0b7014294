//! Cell values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single table cell.
///
/// Numeric coercion widens everything numeric to [`Value::Float`]. `NaN` is
/// never stored; it becomes [`Value::Null`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// An array or object left nested after flattening.
    Json(serde_json::Value),
}

impl Value {
    /// Build a float cell, mapping `NaN` to null.
    pub fn float(value: f64) -> Self {
        if value.is_nan() {
            Value::Null
        } else {
            Value::Float(value)
        }
    }

    /// Convert a parsed JSON value into a cell.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map(Value::float).unwrap_or(Value::Null),
            },
            serde_json::Value::String(s) => Value::Str(s.clone()),
            other => Value::Json(other.clone()),
        }
    }

    /// Whether the cell is missing.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Borrow the string payload, if this is a string cell.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Interpret the cell as a number.
    ///
    /// Strings are trimmed and parsed; booleans count as 1/0. Nested JSON and
    /// unparseable text yield `None`.
    pub fn as_f64(&self) -> Option<f64> {
        let number = match self {
            Value::Null | Value::Json(_) => return None,
            Value::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::Int(i) => *i as f64,
            Value::Float(f) => *f,
            Value::Str(s) => s.trim().parse::<f64>().ok()?,
        };
        if number.is_nan() { None } else { Some(number) }
    }

    /// Numeric coercion: numbers become floats, everything else null.
    pub fn to_numeric(&self) -> Value {
        self.as_f64().map(Value::Float).unwrap_or(Value::Null)
    }

    /// Grouping key for the cell; nulls have no key.
    pub fn as_key(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::Str(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => f.write_str(s),
            Value::Json(j) => write!(f, "{}", j),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::float(x)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_scalars() {
        assert_eq!(Value::from_json(&json!(null)), Value::Null);
        assert_eq!(Value::from_json(&json!(340)), Value::Int(340));
        assert_eq!(Value::from_json(&json!(12.5)), Value::Float(12.5));
        assert_eq!(Value::from_json(&json!("x")), Value::Str("x".to_string()));
        assert!(matches!(Value::from_json(&json!([1, 2])), Value::Json(_)));
    }

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(Value::from(" 3.5 ").to_numeric(), Value::Float(3.5));
        assert_eq!(Value::Int(7).to_numeric(), Value::Float(7.0));
        assert_eq!(Value::Bool(true).to_numeric(), Value::Float(1.0));
        assert_eq!(Value::from("fast").to_numeric(), Value::Null);
        assert_eq!(Value::from("nan").to_numeric(), Value::Null);
        assert_eq!(Value::Json(json!({"a": 1})).to_numeric(), Value::Null);
    }

    #[test]
    fn test_float_rejects_nan() {
        assert_eq!(Value::float(f64::NAN), Value::Null);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::Float(12.5).to_string(), "12.5");
        assert_eq!(Value::Json(json!(["a", 1])).to_string(), r#"["a",1]"#);
    }
}
