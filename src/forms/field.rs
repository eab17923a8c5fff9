//! Form field declarations
//!
//! A [`Field`] is one of a fixed set of kinds. Every kind shares a
//! [`FieldCore`] (name, label, markup attributes) and answers the same four
//! questions: what it defaults to, how it renders, how the host should type
//! it, and how a raw submission turns into an option value.

use serde::Serialize;
use tracing::debug;

use super::attributes::{is_known_attribute, Attributes};
use super::checkbox::CheckboxField;
use super::error::FormError;
use super::select::{Choice, SelectField};
use super::text::{NumericField, TextField};
use super::value::{FieldValue, ValueKind};

/// Prefix for element ids derived from field names
pub const ID_PREFIX: &str = "id_";

/// Host-facing description of a field's value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeDescriptor {
    pub kind: ValueKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<FieldValue>,
    pub nullable: bool,
}

/// State shared by every field kind
#[derive(Debug, Clone, PartialEq)]
pub struct FieldCore {
    pub name: String,
    pub label: String,
    pub attributes: Attributes,
}

impl FieldCore {
    pub fn id(&self) -> String {
        format!("{ID_PREFIX}{}", self.name)
    }

    pub fn required(&self) -> bool {
        self.attributes.flag("required")
    }

    /// `<label>` followed by an `<input>` carrying every attribute
    pub(crate) fn render_input(&self) -> String {
        format!(
            "<label for=\"{name}\">{label}</label>\n<input id=\"{id}\" class=\"form-control\" {attributes}>\n",
            name = self.name,
            label = self.label,
            id = self.id(),
            attributes = self.attributes.render(),
        )
    }
}

/// A declared form field
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Text(TextField),
    Numeric(NumericField),
    Checkbox(CheckboxField),
    Select(SelectField),
}

impl Field {
    pub fn builder(name: impl Into<String>) -> FieldBuilder {
        FieldBuilder::new(name)
    }

    pub fn core(&self) -> &FieldCore {
        match self {
            Field::Text(f) => &f.core,
            Field::Numeric(f) => &f.core,
            Field::Checkbox(f) => &f.core,
            Field::Select(f) => &f.core,
        }
    }

    pub fn name(&self) -> &str {
        &self.core().name
    }

    pub fn label(&self) -> &str {
        &self.core().label
    }

    pub fn attributes(&self) -> &Attributes {
        &self.core().attributes
    }

    pub fn required(&self) -> bool {
        self.core().required()
    }

    /// Default a host should start from. A text field with no declared value
    /// reports `""` here while an empty submission of it normalizes to none,
    /// so that one case does not round-trip through `normalize`.
    pub fn default_value(&self) -> Option<FieldValue> {
        match self {
            Field::Text(f) => Some(f.default_value()),
            Field::Numeric(f) => f.default_value(),
            Field::Checkbox(f) => f.default_value(),
            Field::Select(f) => Some(f.default_value().clone()),
        }
    }

    /// Render the field to HTML
    pub fn render(&self) -> String {
        match self {
            Field::Text(f) => f.render(),
            Field::Numeric(f) => f.render(),
            Field::Checkbox(f) => f.render(),
            Field::Select(f) => f.render(),
        }
    }

    pub fn describe(&self) -> TypeDescriptor {
        match self {
            Field::Text(f) => f.describe(),
            Field::Numeric(f) => f.describe(),
            Field::Checkbox(f) => f.describe(),
            Field::Select(f) => f.describe(),
        }
    }

    /// Turn the values submitted under this field's name into an option value.
    ///
    /// `raw` is `None` when the submission carried no entry for the field,
    /// which is not the same as an entry holding an empty string.
    pub fn normalize(&self, raw: Option<&[FieldValue]>) -> Result<Option<FieldValue>, FormError> {
        let result = match self {
            Field::Text(f) => f.normalize(raw),
            Field::Numeric(f) => f.normalize(raw),
            Field::Checkbox(f) => f.normalize(raw),
            Field::Select(f) => f.normalize(raw).map(Some),
        };
        debug!(field = %self.name(), ?result, "normalized field");
        result
    }
}

/// Fluent declaration of a field's name, label and markup attributes
#[derive(Debug, Clone)]
pub struct FieldBuilder {
    name: String,
    label: Option<String>,
    attributes: Attributes,
    unknown: Vec<String>,
}

impl FieldBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
            attributes: Attributes::new(),
            unknown: Vec::new(),
        }
    }

    /// Display label; falls back to the field name when empty
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.attributes.insert("required", required);
        self
    }

    pub fn value(mut self, value: impl Into<FieldValue>) -> Self {
        self.attributes.insert("value", value);
        self
    }

    pub fn input_type(mut self, input_type: &str) -> Self {
        self.attributes.insert("type", input_type);
        self
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.attributes.insert("checked", checked);
        self
    }

    /// Set an attribute from [`super::KNOWN_ATTRIBUTES`]
    pub fn attr(mut self, name: &str, value: impl Into<FieldValue>) -> Self {
        if is_known_attribute(name) {
            self.attributes.insert(name, value);
        } else {
            self.unknown.push(name.to_string());
        }
        self
    }

    /// Set any attribute, bypassing the allow-list
    pub fn extra_attr(mut self, name: &str, value: impl Into<FieldValue>) -> Self {
        self.attributes.insert(name, value);
        self
    }

    fn into_core(self, default_type: Option<&str>) -> Result<FieldCore, FormError> {
        if self.name.is_empty() {
            return Err(FormError::construction("Field name cannot be empty."));
        }
        if let Some(unknown) = self.unknown.first() {
            return Err(FormError::construction(format!(
                "Unknown attribute '{unknown}' on field {}; use extra_attr for custom attributes.",
                self.name
            )));
        }
        let mut attributes = self.attributes;
        attributes.insert_default("name", self.name.as_str());
        if let Some(input_type) = default_type {
            attributes.insert_default("type", input_type);
        }
        let label = match self.label {
            Some(label) if !label.is_empty() => label,
            _ => self.name.clone(),
        };
        Ok(FieldCore {
            name: self.name,
            label,
            attributes,
        })
    }

    /// Free text input, `type="text"` unless set
    pub fn text(self) -> Result<Field, FormError> {
        let core = self.into_core(Some("text"))?;
        Ok(Field::Text(TextField::new(core)))
    }

    /// Numeric input, `type="number"` unless set
    pub fn numeric(self) -> Result<Field, FormError> {
        let core = self.into_core(Some("number"))?;
        Ok(Field::Numeric(NumericField::new(core)?))
    }

    /// Checkbox input; any `type` other than `checkbox` is rejected
    pub fn checkbox(self) -> Result<Field, FormError> {
        let core = self.into_core(Some("checkbox"))?;
        Ok(Field::Checkbox(CheckboxField::new(core)?))
    }

    /// Single-select over `choices`, preselecting `default` when it is one of them
    pub fn select(self, choices: Vec<Choice>, default: Option<FieldValue>) -> Result<Field, FormError> {
        let core = self.into_core(None)?;
        Ok(Field::Select(SelectField::new(core, choices, default)?))
    }
}
