//! Form field value objects

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::FormError;

/// Scalar carried by attributes, submissions and normalized options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

/// Primitive kind of a value, as exposed to the host binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    String,
    Integer,
    Float,
    Boolean,
}

impl ValueKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
        }
    }

    /// Value a host property takes when no default is declared
    pub fn zero(&self) -> FieldValue {
        match self {
            Self::String => FieldValue::Text(String::new()),
            Self::Integer => FieldValue::Integer(0),
            Self::Float => FieldValue::Float(0.0),
            Self::Boolean => FieldValue::Boolean(false),
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FieldValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            FieldValue::Text(_) => ValueKind::String,
            FieldValue::Integer(_) => ValueKind::Integer,
            FieldValue::Float(_) => ValueKind::Float,
            FieldValue::Boolean(_) => ValueKind::Boolean,
        }
    }

    /// Empty text, zero and `false` are falsy
    pub fn is_truthy(&self) -> bool {
        match self {
            FieldValue::Text(s) => !s.is_empty(),
            FieldValue::Integer(i) => *i != 0,
            FieldValue::Float(x) => *x != 0.0,
            FieldValue::Boolean(b) => *b,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Convert to `kind`, parsing text and widening numbers where lossless.
    ///
    /// Values already of the target kind are returned untouched. Integral
    /// floats narrow to integers; anything else that does not fit fails with
    /// [`FormError::ConversionFailure`].
    pub fn coerce(&self, kind: ValueKind) -> Result<FieldValue, FormError> {
        if self.kind() == kind {
            return Ok(self.clone());
        }
        let converted = match (kind, self) {
            (ValueKind::String, value) => Some(FieldValue::Text(value.to_string())),
            (ValueKind::Integer, FieldValue::Text(s)) => {
                s.trim().parse::<i64>().ok().map(FieldValue::Integer)
            }
            (ValueKind::Integer, FieldValue::Float(x)) => integral(*x).map(FieldValue::Integer),
            (ValueKind::Float, FieldValue::Text(s)) => {
                s.trim().parse::<f64>().ok().map(FieldValue::Float)
            }
            (ValueKind::Float, FieldValue::Integer(i)) => Some(FieldValue::Float(*i as f64)),
            _ => None,
        };
        converted.ok_or_else(|| FormError::ConversionFailure {
            kind,
            value: self.to_string(),
        })
    }
}

fn integral(x: f64) -> Option<i64> {
    if x.is_finite() && x.fract() == 0.0 && x.abs() < i64::MAX as f64 {
        Some(x as i64)
    } else {
        None
    }
}

/// Integral floats keep a trailing `.0` so they stay distinguishable from
/// integers. Magnitudes from 1e16 up or below 1e-4 use exponent form
/// (`1e+16`, `1e-05`).
fn fmt_float(x: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if !x.is_finite() {
        return write!(f, "{x}");
    }
    if x != 0.0 {
        let scientific = format!("{x:e}");
        if let Some((mantissa, exp)) = scientific.split_once('e') {
            if let Ok(exp) = exp.parse::<i32>() {
                if !(-4..16).contains(&exp) {
                    let sign = if exp < 0 { '-' } else { '+' };
                    return write!(f, "{mantissa}e{sign}{:02}", exp.abs());
                }
            }
        }
    }
    if x.fract() == 0.0 {
        write!(f, "{x:.1}")
    } else {
        write!(f, "{x}")
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Integer(i) => write!(f, "{i}"),
            FieldValue::Float(x) => fmt_float(*x, f),
            FieldValue::Boolean(b) => write!(f, "{b}"),
        }
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

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Integer(i64::from(value))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}
