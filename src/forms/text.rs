//! Text-like input fields: free text and numbers

use super::error::FormError;
use super::field::{FieldCore, TypeDescriptor};
use super::value::{FieldValue, ValueKind};

/// First submitted value, treating an empty list like a missing one
fn first(raw: Option<&[FieldValue]>) -> Option<&FieldValue> {
    raw.and_then(|values| values.first())
}

/// Free text input bound to a string option
#[derive(Debug, Clone, PartialEq)]
pub struct TextField {
    pub(crate) core: FieldCore,
}

impl TextField {
    pub(crate) fn new(core: FieldCore) -> Self {
        Self { core }
    }

    /// The `value` attribute as text, or an empty string
    pub fn default_value(&self) -> FieldValue {
        self.core
            .attributes
            .get("value")
            .map(|v| FieldValue::Text(v.to_string()))
            .unwrap_or_default()
    }

    pub fn render(&self) -> String {
        self.core.render_input()
    }

    pub fn describe(&self) -> TypeDescriptor {
        let default_value = self.default_value();
        TypeDescriptor {
            kind: ValueKind::String,
            nullable: !default_value.is_truthy() && !self.core.required(),
            default_value: Some(default_value),
        }
    }

    /// Falsy submissions fall back to the declared value; anything else is
    /// taken as text. An empty result fails when the field is required.
    pub fn normalize(&self, raw: Option<&[FieldValue]>) -> Result<Option<FieldValue>, FormError> {
        let normalized = match first(raw) {
            Some(FieldValue::Text(s)) if !s.is_empty() => Some(FieldValue::Text(s.clone())),
            Some(value) if value.is_truthy() => Some(FieldValue::Text(value.to_string())),
            _ => Some(self.default_value()).filter(FieldValue::is_truthy),
        };

        if self.core.required() && normalized.is_none() {
            return Err(FormError::required(&self.core.label));
        }
        Ok(normalized)
    }
}

/// Whether a numeric field holds integers or floats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericKind {
    Integer,
    Float,
}

impl From<NumericKind> for ValueKind {
    fn from(kind: NumericKind) -> Self {
        match kind {
            NumericKind::Integer => ValueKind::Integer,
            NumericKind::Float => ValueKind::Float,
        }
    }
}

/// Number input bound to an integer or float option
///
/// The kind follows the `step` attribute: a fractional step or `"any"`
/// makes it a float field, everything else an integer field.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericField {
    pub(crate) core: FieldCore,
}

impl NumericField {
    pub(crate) fn new(core: FieldCore) -> Result<Self, FormError> {
        let field = Self { core };
        if let Some(value) = field.declared_value() {
            let kind = ValueKind::from(field.numeric_kind());
            if value.coerce(kind).is_err() {
                return Err(FormError::construction(format!(
                    "Default value for {} is not a valid {kind}: {value}",
                    field.core.name
                )));
            }
        }
        Ok(field)
    }

    pub fn numeric_kind(&self) -> NumericKind {
        let is_float = match self.core.attributes.get("step") {
            Some(FieldValue::Float(step)) => step.fract() != 0.0,
            Some(FieldValue::Text(step)) => step == "any",
            _ => false,
        };
        if is_float {
            NumericKind::Float
        } else {
            NumericKind::Integer
        }
    }

    /// An empty `value` attribute declares no default
    fn declared_value(&self) -> Option<&FieldValue> {
        self.core
            .attributes
            .get("value")
            .filter(|value| !matches!(value, FieldValue::Text(s) if s.is_empty()))
    }

    /// The `value` attribute in the field's numeric kind
    pub fn default_value(&self) -> Option<FieldValue> {
        let kind = ValueKind::from(self.numeric_kind());
        self.declared_value()
            .and_then(|value| value.coerce(kind).ok())
    }

    pub fn render(&self) -> String {
        self.core.render_input()
    }

    pub fn describe(&self) -> TypeDescriptor {
        let default_value = self.default_value();
        TypeDescriptor {
            kind: self.numeric_kind().into(),
            nullable: default_value.is_none() && !self.core.required(),
            default_value,
        }
    }

    pub fn normalize(&self, raw: Option<&[FieldValue]>) -> Result<Option<FieldValue>, FormError> {
        let kind = ValueKind::from(self.numeric_kind());
        let normalized = match first(raw) {
            None => self.default_value(),
            Some(FieldValue::Text(s)) if s.is_empty() => self.default_value(),
            Some(value) => Some(value.coerce(kind)?),
        };

        if normalized.is_none() && self.core.required() {
            return Err(FormError::required(&self.core.label));
        }
        Ok(normalized)
    }
}
