//! Core value types shared by parameters, filters and the pipeline.
//!
//! Filter parameters come in four flavours only: bounded integers, bounded
//! doubles, single-choice labels and boolean flags. [`Value`] carries one of
//! them across the pipeline boundary; [`ParamKind`] names the flavour.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// The in-memory raster every filter consumes and produces.
///
/// Three 8-bit channels in fixed R-G-B order. Dimensions never change
/// after a filter has produced the buffer.
pub type Raster = image::RgbImage;

/// A single parameter value, as read from or written to a filter unit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum Value {
    /// 64-bit signed integer
    Integer(i64),
    /// 64-bit floating point number
    Float(f64),
    /// Choice label
    String(String),
    /// Boolean flag
    Boolean(bool),
}

/// Kind tag of a declared parameter.
///
/// This is what a presentation layer switches on to pick an editing widget.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ParamKind {
    BoundedInteger,
    BoundedDouble,
    RadioSelect,
    Boolean,
}

/// Stable identity of a filter unit, preserved across reorders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitId(pub Uuid);

// ============================================================================
// Value Implementation
// ============================================================================

impl Value {
    /// Get the parameter kind this value would naturally be stored in.
    pub fn kind(&self) -> ParamKind {
        match self {
            Value::Integer(_) => ParamKind::BoundedInteger,
            Value::Float(_) => ParamKind::BoundedDouble,
            Value::String(_) => ParamKind::RadioSelect,
            Value::Boolean(_) => ParamKind::Boolean,
        }
    }

    /// Try to get this value as an integer.
    pub fn as_integer(&self) -> Option<i64> {
        if let Value::Integer(i) = self {
            Some(*i)
        } else {
            None
        }
    }

    /// Try to get this value as a float.
    /// Integers are automatically converted to floats.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Try to get this value as a string reference.
    pub fn as_string(&self) -> Option<&str> {
        if let Value::String(s) = self {
            Some(s)
        } else {
            None
        }
    }

    /// Try to get this value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        if let Value::Boolean(b) = self {
            Some(*b)
        } else {
            None
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(v) => write!(f, "{}", v),
            Value::String(s) => write!(f, "{}", s),
            Value::Boolean(b) => write!(f, "{}", b),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

// ============================================================================
// ParamKind Implementation
// ============================================================================

impl ParamKind {
    /// Human-readable name of this kind.
    pub fn display_name(&self) -> &'static str {
        match self {
            ParamKind::BoundedInteger => "integer",
            ParamKind::BoundedDouble => "double",
            ParamKind::RadioSelect => "choice",
            ParamKind::Boolean => "boolean",
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ============================================================================
// UnitId Implementation
// ============================================================================

impl UnitId {
    /// Create a new random unit ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UnitId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}
