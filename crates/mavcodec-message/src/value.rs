//! Structured field values.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Value of one field.
///
/// Serializes as plain JSON: numbers, strings and arrays of numbers.
/// Deserialization picks the first variant that fits, so non-negative
/// integers land in `UInt`, negative ones in `Int` and fractional ones in
/// `Float`. Encoding coerces between numeric variants when the value is
/// representable in the field's type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    UInt(u64),
    Int(i64),
    Float(f64),
    Text(String),
    UIntArray(Vec<u64>),
    IntArray(Vec<i64>),
    FloatArray(Vec<f64>),
}

/// Field name to value mapping for one message.
pub type Fields = BTreeMap<String, FieldValue>;

impl FieldValue {
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            FieldValue::UInt(v) => Some(v),
            FieldValue::Int(v) => u64::try_from(v).ok(),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            FieldValue::Int(v) => Some(v),
            FieldValue::UInt(v) => i64::try_from(v).ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            FieldValue::Float(v) => Some(v),
            FieldValue::Int(v) => Some(v as f64),
            FieldValue::UInt(v) => Some(v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(
            self,
            FieldValue::UIntArray(_) | FieldValue::IntArray(_) | FieldValue::FloatArray(_)
        )
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
            f.write_str("[")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{item}")?;
            }
            f.write_str("]")
        }

        match self {
            FieldValue::UInt(v) => write!(f, "{v}"),
            FieldValue::Int(v) => write!(f, "{v}"),
            FieldValue::Float(v) => write!(f, "{v}"),
            FieldValue::Text(s) => write!(f, "{s:?}"),
            FieldValue::UIntArray(items) => list(f, items),
            FieldValue::IntArray(items) => list(f, items),
            FieldValue::FloatArray(items) => list(f, items),
        }
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        FieldValue::UInt(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_numbers_pick_natural_variant() {
        let fields: Fields = serde_json::from_str(
            r#"{"a": 7, "b": -3, "c": 1.5, "d": "hi", "e": [1, 2], "f": [-1, 2], "g": [0.5]}"#,
        )
        .unwrap();

        assert_eq!(fields["a"], FieldValue::UInt(7));
        assert_eq!(fields["b"], FieldValue::Int(-3));
        assert_eq!(fields["c"], FieldValue::Float(1.5));
        assert_eq!(fields["d"], FieldValue::Text("hi".to_string()));
        assert_eq!(fields["e"], FieldValue::UIntArray(vec![1, 2]));
        assert_eq!(fields["f"], FieldValue::IntArray(vec![-1, 2]));
        assert_eq!(fields["g"], FieldValue::FloatArray(vec![0.5]));
    }

    #[test]
    fn full_range_integers_survive_json() {
        let mut fields = Fields::new();
        fields.insert("max".to_string(), FieldValue::UInt(u64::MAX));
        fields.insert("min".to_string(), FieldValue::Int(i64::MIN));

        let json = serde_json::to_string(&fields).unwrap();
        assert_eq!(json, r#"{"max":18446744073709551615,"min":-9223372036854775808}"#);
        let back: Fields = serde_json::from_str(&json).unwrap();
        assert_eq!(back, fields);
    }

    #[test]
    fn numeric_accessors_coerce() {
        assert_eq!(FieldValue::Int(5).as_u64(), Some(5));
        assert_eq!(FieldValue::Int(-5).as_u64(), None);
        assert_eq!(FieldValue::UInt(u64::MAX).as_i64(), None);
        assert_eq!(FieldValue::UInt(3).as_f64(), Some(3.0));
        assert_eq!(FieldValue::from("x").as_str(), Some("x"));
        assert!(FieldValue::UIntArray(vec![]).is_array());
        assert!(!FieldValue::Float(0.0).is_array());
    }

    #[test]
    fn display() {
        assert_eq!(FieldValue::UIntArray(vec![1, 2, 3]).to_string(), "[1, 2, 3]");
        assert_eq!(FieldValue::Text("ab".to_string()).to_string(), "\"ab\"");
        assert_eq!(FieldValue::Int(-4).to_string(), "-4");
    }
}
