//! Single-select field
//!
//! Choices are `(value, label)` pairs. All values share one kind (string,
//! integer or float) and that kind is what the option normalizes to.
//! `value` and `multiple` attributes are dropped: the selected choice comes
//! from the declared default, and multi-selection is not supported yet.

use serde::{Deserialize, Serialize};

use super::error::FormError;
use super::field::{FieldCore, TypeDescriptor};
use super::value::{FieldValue, ValueKind};

/// One `<option>` of a select field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub value: FieldValue,
    pub label: String,
}

impl Choice {
    pub fn new(value: impl Into<FieldValue>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

impl<V: Into<FieldValue>, L: Into<String>> From<(V, L)> for Choice {
    fn from((value, label): (V, L)) -> Self {
        Self::new(value, label)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectField {
    pub(crate) core: FieldCore,
    choices: Vec<Choice>,
    default_value: FieldValue,
}

impl SelectField {
    pub(crate) fn new(
        mut core: FieldCore,
        choices: Vec<Choice>,
        default: Option<FieldValue>,
    ) -> Result<Self, FormError> {
        core.attributes.remove("value");
        core.attributes.remove("multiple");

        let Some(first) = choices.first() else {
            return Err(FormError::construction(format!(
                "Select field {} needs at least one choice.",
                core.name
            )));
        };
        for (i, choice) in choices.iter().enumerate() {
            if choices[..i].iter().any(|c| c.value == choice.value) {
                return Err(FormError::construction("All choice values must be unique."));
            }
        }
        let kind = first.value.kind();
        if choices.iter().any(|c| c.value.kind() != kind) {
            return Err(FormError::construction(
                "All types in select options must be the same.",
            ));
        }
        if kind == ValueKind::Boolean {
            return Err(FormError::construction(
                "Select options must be strings, integers or floats.",
            ));
        }

        let default_value = default
            .filter(|d| choices.iter().any(|c| &c.value == d))
            .unwrap_or_else(|| first.value.clone());

        Ok(Self {
            core,
            choices,
            default_value,
        })
    }

    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    /// Kind shared by every choice value
    pub fn value_kind(&self) -> ValueKind {
        self.default_value.kind()
    }

    pub fn default_value(&self) -> &FieldValue {
        &self.default_value
    }

    fn render_option(&self, index: usize, choice: &Choice) -> String {
        let selected = if choice.value == self.default_value {
            " selected"
        } else {
            ""
        };
        format!(
            "<option id=\"{id}_option_{index}\" value=\"{value}\"{selected}>{label}</option>\n",
            id = self.core.id(),
            value = choice.value,
            label = choice.label,
        )
    }

    pub fn render(&self) -> String {
        let options: String = self
            .choices
            .iter()
            .enumerate()
            .map(|(i, choice)| self.render_option(i, choice))
            .collect();
        format!(
            "<label for=\"{name}\">{label}</label>\n<select id=\"{id}\" class=\"form-control\" {attributes}>\n{options}</select>\n",
            name = self.core.name,
            label = self.core.label,
            id = self.core.id(),
            attributes = self.core.attributes.render(),
        )
    }

    pub fn describe(&self) -> TypeDescriptor {
        TypeDescriptor {
            kind: self.value_kind(),
            default_value: Some(self.default_value.clone()).filter(FieldValue::is_truthy),
            nullable: false,
        }
    }

    /// Coerce the first submitted value to the choice kind and check it is
    /// one of the choices. Nothing submitted at all counts as empty.
    pub fn normalize(&self, raw: Option<&[FieldValue]>) -> Result<FieldValue, FormError> {
        let Some(value) = raw.and_then(|values| values.first()) else {
            return Err(FormError::required(&self.core.label));
        };
        let selection = value.coerce(self.value_kind())?;
        if !self.choices.iter().any(|c| c.value == selection) {
            return Err(FormError::InvalidSelection(selection.to_string()));
        }
        Ok(selection)
    }
}
