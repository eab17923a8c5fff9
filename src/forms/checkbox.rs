//! Checkbox input field
//!
//! Unlike the other inputs, the `value` attribute here is what the option
//! becomes when the box is ticked; it does not decide whether the box starts
//! ticked. That is what `checked` is for.

use super::error::FormError;
use super::field::{FieldCore, TypeDescriptor};
use super::value::{FieldValue, ValueKind};

#[derive(Debug, Clone, PartialEq)]
pub struct CheckboxField {
    pub(crate) core: FieldCore,
}

impl CheckboxField {
    pub(crate) fn new(core: FieldCore) -> Result<Self, FormError> {
        match core.attributes.get("type") {
            Some(FieldValue::Text(t)) if t == "checkbox" => Ok(Self { core }),
            _ => Err(FormError::construction("Only 'checkbox' type is supported.")),
        }
    }

    /// Value reported when ticked; `true` unless declared
    pub fn checked_value(&self) -> FieldValue {
        self.core
            .attributes
            .get("value")
            .cloned()
            .unwrap_or(FieldValue::Boolean(true))
    }

    pub fn checked_by_default(&self) -> bool {
        self.core.attributes.flag("checked")
    }

    fn on_value(&self, is_checked: bool) -> Option<FieldValue> {
        match self.checked_value() {
            FieldValue::Boolean(value) => Some(FieldValue::Boolean(value && is_checked)),
            value if is_checked => Some(FieldValue::Text(value.to_string())),
            _ => None,
        }
    }

    pub fn default_value(&self) -> Option<FieldValue> {
        self.on_value(self.checked_by_default())
    }

    pub fn render(&self) -> String {
        self.core.render_input()
    }

    /// Boolean when the checked value is boolean, string otherwise. A string
    /// checkbox reports nothing when unticked, so it is always nullable, even
    /// when it starts ticked.
    pub fn describe(&self) -> TypeDescriptor {
        let is_boolean = matches!(self.checked_value(), FieldValue::Boolean(_));
        let default_value = self.default_value();
        TypeDescriptor {
            kind: if is_boolean {
                ValueKind::Boolean
            } else {
                ValueKind::String
            },
            nullable: default_value.is_none() || !is_boolean,
            default_value,
        }
    }

    /// Browsers only submit ticked boxes, so presence alone means checked
    pub fn normalize(&self, raw: Option<&[FieldValue]>) -> Result<Option<FieldValue>, FormError> {
        let is_checked = raw.is_some();
        if !is_checked && self.core.required() {
            return Err(FormError::required(&self.core.label));
        }
        Ok(match self.checked_value() {
            FieldValue::Boolean(_) => Some(FieldValue::Boolean(is_checked)),
            _ => self.on_value(is_checked),
        })
    }
}
