//! Filter values as they arrive from a request.
//!
//! [`FilterValue`] is a small closed union covering everything a decoded
//! filter can carry. Builders coerce it to their native type and report a
//! [`QueryError::TypeMismatch`] instead of guessing.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::QueryError;

/// Value attached to a [`Filter`](crate::Filter).
///
/// JSON decoding produces every variant except [`FilterValue::Time`], which
/// callers construct directly when filters are built in code. Time fields also
/// accept strings and parse them on use.
///
/// # Example
///
/// ```
/// use standout_query::FilterValue;
///
/// let v: FilterValue = serde_json::from_str(r#"["a", "b"]"#).unwrap();
/// assert_eq!(v, FilterValue::from(vec!["a", "b"]));
///
/// assert!(serde_json::from_str::<FilterValue>(r#"{"a": 1}"#).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value", into = "serde_json::Value")]
pub enum FilterValue {
    /// Absent or JSON `null`.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// Numeric value.
    Number(Number),
    /// String value.
    String(String),
    /// Timestamp value.
    Time(DateTime<Utc>),
    /// Sequence of values, used by `in` and `nin`.
    List(Vec<FilterValue>),
}

impl FilterValue {
    /// Returns the name of this value's type, as used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            FilterValue::Null => "null",
            FilterValue::Bool(_) => "bool",
            FilterValue::Number(_) => "number",
            FilterValue::String(_) => "string",
            FilterValue::Time(_) => "time",
            FilterValue::List(_) => "list",
        }
    }

    /// Extracts the string value, if present.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FilterValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Extracts the boolean value, if present.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FilterValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Views this value as a sequence.
    ///
    /// Lists yield their elements; any other value is treated as a list of
    /// one.
    pub fn as_elements(&self) -> &[FilterValue] {
        match self {
            FilterValue::List(items) => items,
            other => std::slice::from_ref(other),
        }
    }
}

impl TryFrom<serde_json::Value> for FilterValue {
    type Error = QueryError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        use serde_json::Value as Json;

        Ok(match value {
            Json::Null => FilterValue::Null,
            Json::Bool(b) => FilterValue::Bool(b),
            Json::Number(n) => FilterValue::Number(Number::try_from(&n)?),
            Json::String(s) => FilterValue::String(s),
            Json::Array(items) => FilterValue::List(
                items
                    .into_iter()
                    .map(FilterValue::try_from)
                    .collect::<Result<_, _>>()?,
            ),
            Json::Object(_) => {
                return Err(QueryError::InvalidValue(
                    "objects are not supported as filter values".to_string(),
                ))
            }
        })
    }
}

impl From<FilterValue> for serde_json::Value {
    fn from(value: FilterValue) -> Self {
        match value {
            FilterValue::Null => serde_json::Value::Null,
            FilterValue::Bool(b) => serde_json::Value::Bool(b),
            FilterValue::Number(n) => n.into(),
            FilterValue::String(s) => serde_json::Value::String(s),
            FilterValue::Time(t) => {
                serde_json::Value::String(t.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            FilterValue::List(items) => {
                serde_json::Value::Array(items.into_iter().map(Into::into).collect())
            }
        }
    }
}

/// Numeric filter value.
///
/// Kept in one of three variants so JSON numbers decode without losing
/// precision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 64-bit floating point.
    F64(f64),
}

impl TryFrom<&serde_json::Number> for Number {
    type Error = QueryError;

    fn try_from(n: &serde_json::Number) -> Result<Self, Self::Error> {
        if let Some(i) = n.as_i64() {
            Ok(Number::I64(i))
        } else if let Some(u) = n.as_u64() {
            Ok(Number::U64(u))
        } else {
            n.as_f64()
                .map(Number::F64)
                .ok_or_else(|| QueryError::InvalidValue(format!("unsupported number: {n}")))
        }
    }
}

impl From<Number> for serde_json::Value {
    fn from(n: Number) -> Self {
        match n {
            Number::I64(i) => serde_json::Value::from(i),
            Number::U64(u) => serde_json::Value::from(u),
            // NaN and infinities have no JSON form
            Number::F64(f) => serde_json::Number::from_f64(f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
        }
    }
}

// Conversions from common types to FilterValue

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::String(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue::String(s)
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        FilterValue::Bool(b)
    }
}

impl From<DateTime<Utc>> for FilterValue {
    fn from(t: DateTime<Utc>) -> Self {
        FilterValue::Time(t)
    }
}

impl From<Number> for FilterValue {
    fn from(n: Number) -> Self {
        FilterValue::Number(n)
    }
}

impl From<i32> for FilterValue {
    fn from(n: i32) -> Self {
        FilterValue::Number(Number::I64(n as i64))
    }
}

impl From<i64> for FilterValue {
    fn from(n: i64) -> Self {
        FilterValue::Number(Number::I64(n))
    }
}

impl From<u64> for FilterValue {
    fn from(n: u64) -> Self {
        FilterValue::Number(Number::U64(n))
    }
}

impl From<f64> for FilterValue {
    fn from(n: f64) -> Self {
        FilterValue::Number(Number::F64(n))
    }
}

impl<T: Into<FilterValue>> From<Vec<T>> for FilterValue {
    fn from(items: Vec<T>) -> Self {
        FilterValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<FilterValue>> From<Option<T>> for FilterValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FilterValue::Null)
    }
}
