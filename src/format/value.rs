//! Property values exchanged with a target.
//!
//! A style never knows the concrete property types of the host object model,
//! so values travel as a small tagged union. `Int` and `Float` are treated as
//! numerically compatible; every other pairing of kinds is a mismatch.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Sparse property-name to value mapping.
pub type PropertyMap = BTreeMap<String, PropertyValue>;

/// Kind of a [`PropertyValue`], used for type checks and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Bool,
    Int,
    Float,
    Str,
    Enum,
    Struct,
}

impl ValueKind {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "string",
            Self::Enum => "enum",
            Self::Struct => "struct",
        }
    }

    /// Whether a value of kind `other` may be stored where `self` is expected.
    pub fn accepts(&self, other: ValueKind) -> bool {
        match (self, other) {
            (Self::Int | Self::Float, Self::Int | Self::Float) => true,
            (a, b) => *a == b,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Host enumeration constant
    Enum(i32),
    /// Opaque structured value, such as a border line or a color gradient
    Struct {
        type_name: String,
        fields: PropertyMap,
    },
}

impl PropertyValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::Str(_) => ValueKind::Str,
            Self::Enum(_) => ValueKind::Enum,
            Self::Struct { .. } => ValueKind::Struct,
        }
    }

    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Integer view; floats are rounded and enums yield their constant.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Float(v) => Some(v.round() as i64),
            Self::Enum(v) => Some(*v as i64),
            _ => None,
        }
    }

    /// Integer view narrowed to `i32`, the width of persisted geometry.
    #[inline]
    pub fn as_i32(&self) -> Option<i32> {
        self.as_i64().and_then(|v| i32::try_from(v).ok())
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{}", v),
            Self::Int(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Str(v) => write!(f, "{:?}", v),
            Self::Enum(v) => write!(f, "enum({})", v),
            Self::Struct { type_name, fields } => {
                write!(f, "{} {{ {} fields }}", type_name, fields.len())
            },
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for PropertyValue {
    fn from(v: i32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<i64> for PropertyValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u8> for PropertyValue {
    fn from(v: u8) -> Self {
        Self::Int(v as i64)
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_kinds_are_compatible() {
        assert!(ValueKind::Int.accepts(ValueKind::Float));
        assert!(ValueKind::Float.accepts(ValueKind::Int));
        assert!(!ValueKind::Int.accepts(ValueKind::Bool));
        assert!(!ValueKind::Enum.accepts(ValueKind::Int));
        assert!(ValueKind::Struct.accepts(ValueKind::Struct));
    }

    #[test]
    fn test_accessors() {
        assert_eq!(PropertyValue::Float(12.6).as_i64(), Some(13));
        assert_eq!(PropertyValue::Enum(7).as_i32(), Some(7));
        assert_eq!(PropertyValue::Int(i64::MAX).as_i32(), None);
        assert_eq!(PropertyValue::Int(3).as_f64(), Some(3.0));
        assert_eq!(PropertyValue::from("Table1").as_str(), Some("Table1"));
        assert_eq!(PropertyValue::Bool(true).as_i64(), None);
    }

    #[test]
    fn test_serde_shape() {
        let value = PropertyValue::Enum(2);
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"{"kind":"enum","value":2}"#);
        let back: PropertyValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value);
    }
}
