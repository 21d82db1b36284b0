use chrono::{DateTime, NaiveDate, Utc};
use indexmap::IndexMap;
use serde_json::{Map as JsonMap, Number, Value as JsonValue};
use thiserror::Error;

/// A dynamically typed cell in an object column.
///
/// Object columns mirror the "anything goes" storage class of dataframe
/// libraries: a cell may hold a scalar, a nested sequence, or a nested
/// mapping, and different cells of the same column may hold different
/// shapes. A missing cell is represented as `None` at the column level,
/// not as a `CellValue` variant; `CellValue::Null` is an explicit null
/// *inside* a value (for example a mapping entry whose value is null).
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
    Seq(Vec<CellValue>),
    Map(IndexMap<String, CellValue>),
}

/// Why a cell value cannot be rendered as JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CellJsonError {
    #[error("non-finite float has no JSON representation")]
    NonFiniteFloat,
    #[error("{0} value has no JSON representation")]
    Unrepresentable(&'static str),
}

impl CellValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Null => "null",
            CellValue::Bool(_) => "bool",
            CellValue::Int(_) => "int",
            CellValue::Float(_) => "float",
            CellValue::Str(_) => "str",
            CellValue::Bytes(_) => "bytes",
            CellValue::Date(_) => "date",
            CellValue::Timestamp(_) => "timestamp",
            CellValue::Seq(_) => "seq",
            CellValue::Map(_) => "map",
        }
    }

    /// Whether the value is a container (mapping or sequence).
    pub fn is_structured(&self) -> bool {
        matches!(self, CellValue::Seq(_) | CellValue::Map(_))
    }

    /// Validates that the value, recursively, has a JSON representation.
    ///
    /// Fails on the first offending node in depth-first order. Non-finite
    /// floats are rejected rather than encoded as `null` or a string, since
    /// either would change the column's meaning on the remote side.
    pub fn check_json(&self) -> Result<(), CellJsonError> {
        match self {
            CellValue::Null | CellValue::Bool(_) | CellValue::Int(_) | CellValue::Str(_) => Ok(()),
            CellValue::Float(f) => {
                if f.is_finite() {
                    Ok(())
                } else {
                    Err(CellJsonError::NonFiniteFloat)
                }
            }
            CellValue::Bytes(_) | CellValue::Date(_) | CellValue::Timestamp(_) => {
                Err(CellJsonError::Unrepresentable(self.type_name()))
            }
            CellValue::Seq(items) => items.iter().try_for_each(CellValue::check_json),
            CellValue::Map(entries) => entries.values().try_for_each(CellValue::check_json),
        }
    }

    /// Converts the value into a JSON tree.
    ///
    /// The conversion is total for every value that passes [`check_json`];
    /// it returns the same error otherwise.
    ///
    /// [`check_json`]: CellValue::check_json
    pub fn to_json(&self) -> Result<JsonValue, CellJsonError> {
        match self {
            CellValue::Null => Ok(JsonValue::Null),
            CellValue::Bool(b) => Ok(JsonValue::Bool(*b)),
            CellValue::Int(i) => Ok(JsonValue::Number(Number::from(*i))),
            CellValue::Float(f) => Number::from_f64(*f)
                .map(JsonValue::Number)
                .ok_or(CellJsonError::NonFiniteFloat),
            CellValue::Str(s) => Ok(JsonValue::String(s.clone())),
            CellValue::Bytes(_) | CellValue::Date(_) | CellValue::Timestamp(_) => {
                Err(CellJsonError::Unrepresentable(self.type_name()))
            }
            CellValue::Seq(items) => Ok(JsonValue::Array(
                items
                    .iter()
                    .map(CellValue::to_json)
                    .collect::<Result<Vec<_>, _>>()?,
            )),
            CellValue::Map(entries) => {
                let mut object = JsonMap::with_capacity(entries.len());
                for (key, value) in entries {
                    object.insert(key.clone(), value.to_json()?);
                }
                Ok(JsonValue::Object(object))
            }
        }
    }

    /// Builds a cell value from a JSON tree.
    ///
    /// Integers that fit `i64` become [`CellValue::Int`]; all other numbers
    /// become [`CellValue::Float`].
    pub fn from_json(value: &JsonValue) -> CellValue {
        match value {
            JsonValue::Null => CellValue::Null,
            JsonValue::Bool(b) => CellValue::Bool(*b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    CellValue::Int(i)
                } else {
                    CellValue::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            JsonValue::String(s) => CellValue::Str(s.clone()),
            JsonValue::Array(items) => {
                CellValue::Seq(items.iter().map(CellValue::from_json).collect())
            }
            JsonValue::Object(entries) => CellValue::Map(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), CellValue::from_json(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Str(value.to_string())
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Int(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn map(entries: Vec<(&str, CellValue)>) -> CellValue {
        CellValue::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }

    #[test]
    fn test_check_json_scalars() {
        assert_eq!(CellValue::Null.check_json(), Ok(()));
        assert_eq!(CellValue::Int(1).check_json(), Ok(()));
        assert_eq!(CellValue::Float(1.5).check_json(), Ok(()));
        assert_eq!(CellValue::from("x").check_json(), Ok(()));
        assert_eq!(
            CellValue::Float(f64::NAN).check_json(),
            Err(CellJsonError::NonFiniteFloat)
        );
        assert_eq!(
            CellValue::Bytes(vec![1, 2]).check_json(),
            Err(CellJsonError::Unrepresentable("bytes"))
        );
    }

    #[test]
    fn test_check_json_nested() {
        let nested = map(vec![(
            "metrics",
            CellValue::Seq(vec![CellValue::Float(1.0), CellValue::Float(f64::INFINITY)]),
        )]);
        assert_eq!(nested.check_json(), Err(CellJsonError::NonFiniteFloat));

        let ok = map(vec![
            ("a", CellValue::Int(1)),
            ("b", CellValue::Null),
            ("c", CellValue::Seq(vec![CellValue::from("x")])),
        ]);
        assert_eq!(ok.check_json(), Ok(()));
    }

    #[test]
    fn test_json_round_trip() {
        let value = map(vec![
            ("id", CellValue::Int(42)),
            ("score", CellValue::Float(0.5)),
            ("tags", CellValue::Seq(vec![CellValue::from("a"), CellValue::Null])),
            ("nested", map(vec![("ok", CellValue::Bool(true))])),
        ]);
        let json = value.to_json().unwrap();
        let text = json.to_string();
        let parsed: JsonValue = serde_json::from_str(&text).unwrap();
        assert_eq!(CellValue::from_json(&parsed), value);
    }

    #[test]
    fn test_embedded_null_renders_as_json_null() {
        let value = map(vec![("missing", CellValue::Null)]);
        let text = value.to_json().unwrap().to_string();
        assert_eq!(text, r#"{"missing":null}"#);
    }

    #[test]
    fn test_timestamp_not_representable() {
        let value = map(vec![(
            "at",
            CellValue::Timestamp(DateTime::<Utc>::UNIX_EPOCH),
        )]);
        assert_eq!(
            value.to_json(),
            Err(CellJsonError::Unrepresentable("timestamp"))
        );
    }
}
