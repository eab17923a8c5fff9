//! Configuration handling for options forms
//!
//! Forms are declared in a JSON file: one entry per field plus the command
//! the launched session runs.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::forms::{Choice, Field, FieldValue, FormError, OptionsForm};

/// Environment variable pointing at an explicit config file
pub const CONFIG_ENV: &str = "OPTIONS_FORM_CONFIG";

/// Kind of field a declaration builds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Numeric,
    Checkbox,
    Select,
}

/// Declaration of a single form field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDeclaration {
    pub kind: FieldKind,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub required: bool,
    /// Attributes from the known HTML attribute list
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, FieldValue>,
    /// Arbitrary attributes, passed through unchecked
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra_attributes: BTreeMap<String, FieldValue>,
    /// `[value, label]` pairs, select only
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<(FieldValue, String)>,
    /// Preselected choice value, select only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<FieldValue>,
}

impl TryFrom<FieldDeclaration> for Field {
    type Error = FormError;

    fn try_from(declaration: FieldDeclaration) -> Result<Self, Self::Error> {
        if declaration.kind != FieldKind::Select
            && (!declaration.choices.is_empty() || declaration.default.is_some())
        {
            return Err(FormError::Construction(format!(
                "choices and default are only valid on select fields ({})",
                declaration.name
            )));
        }

        let mut builder = Field::builder(declaration.name);
        if let Some(label) = declaration.label {
            builder = builder.label(label);
        }
        if declaration.required {
            builder = builder.required(true);
        }
        for (name, value) in declaration.attributes {
            builder = builder.attr(&name, value);
        }
        for (name, value) in declaration.extra_attributes {
            builder = builder.extra_attr(&name, value);
        }

        match declaration.kind {
            FieldKind::Text => builder.text(),
            FieldKind::Numeric => builder.numeric(),
            FieldKind::Checkbox => builder.checkbox(),
            FieldKind::Select => {
                let choices = declaration.choices.into_iter().map(Choice::from).collect();
                builder.select(choices, declaration.default)
            }
        }
    }
}

/// Operator configuration for an options form and its session
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FormConfig {
    /// Markup served instead of the rendered form, when set
    #[serde(default)]
    pub options_form: Option<String>,
    /// Program and arguments a launched session runs
    #[serde(default)]
    pub command: Vec<String>,
    /// Field declarations, in render order
    #[serde(default)]
    pub fields: Vec<FieldDeclaration>,
}

impl FormConfig {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        ProjectDirs::from("org", "options-form", "options-form")
            .map(|dirs| dirs.config_dir().join("form.json"))
    }

    /// Load configuration from the default location, or an empty form
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading form config {}", path.display()))?;
        let config: FormConfig = serde_json::from_str(&content)
            .with_context(|| format!("parsing form config {}", path.display()))?;
        tracing::debug!(path = %path.display(), fields = config.fields.len(), "loaded form config");
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        if let Some(path) = Self::config_path() {
            self.save_to(&path)?;
        }
        Ok(())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Build the declared fields into a form
    pub fn build_form(&self) -> Result<OptionsForm, FormError> {
        let fields = self
            .fields
            .iter()
            .cloned()
            .map(Field::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        OptionsForm::new(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::ValueKind;

    const SAMPLE: &str = r#"{
        "command": ["sleep", "10"],
        "fields": [
            {"kind": "text", "name": "account", "label": "Account", "required": true},
            {"kind": "numeric", "name": "memory", "attributes": {"min": 1, "step": 0.5, "value": 4}},
            {"kind": "checkbox", "name": "gpu", "attributes": {"value": "a100"}},
            {"kind": "select", "name": "queue", "choices": [["short", "Short"], ["long", "Long"]], "default": "long"}
        ]
    }"#;

    #[test]
    fn test_default_config() {
        let config = FormConfig::default();
        assert!(config.options_form.is_none());
        assert!(config.command.is_empty());
        assert!(config.fields.is_empty());
    }

    #[test]
    fn test_deserialize_from_empty_json() {
        let parsed: FormConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, FormConfig::default());
    }

    #[test]
    fn test_deserialize_with_extra_fields() {
        // Should ignore unknown fields
        let json = r#"{"options_form": "<p>custom</p>", "unknown_field": "value"}"#;
        let parsed: FormConfig = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.options_form.as_deref(), Some("<p>custom</p>"));
    }

    #[test]
    fn test_build_sample_form() {
        let config: FormConfig = serde_json::from_str(SAMPLE).unwrap();
        let form = config.build_form().unwrap();
        assert_eq!(form.field_count(), 4);

        let memory = form.field("memory").unwrap().describe();
        assert_eq!(memory.kind, ValueKind::Float);
        assert_eq!(memory.default_value, Some(FieldValue::Float(4.0)));

        let gpu = form.field("gpu").unwrap().describe();
        assert_eq!(gpu.kind, ValueKind::String);

        let queue = form.field("queue").unwrap();
        assert_eq!(queue.default_value(), Some(FieldValue::from("long")));
        assert!(form.field("account").unwrap().required());
    }

    #[test]
    fn test_serialization_round_trip() {
        let config: FormConfig = serde_json::from_str(SAMPLE).unwrap();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: FormConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_unknown_attribute_needs_extra() {
        let json = r#"{"fields": [{"kind": "text", "name": "a", "attributes": {"data-x": "1"}}]}"#;
        let config: FormConfig = serde_json::from_str(json).unwrap();
        assert!(config.build_form().is_err());

        let json = r#"{"fields": [{"kind": "text", "name": "a", "extra_attributes": {"data-x": "1"}}]}"#;
        let config: FormConfig = serde_json::from_str(json).unwrap();
        assert!(config.build_form().is_ok());
    }

    #[test]
    fn test_choices_on_text_field_rejected() {
        let json = r#"{"fields": [{"kind": "text", "name": "a", "choices": [["x", "X"]]}]}"#;
        let config: FormConfig = serde_json::from_str(json).unwrap();
        assert!(matches!(
            config.build_form(),
            Err(FormError::Construction(_))
        ));
    }

    #[test]
    fn test_numeric_with_empty_value_loads() {
        let json = r#"{"fields": [{"kind": "numeric", "name": "n", "attributes": {"value": ""}}]}"#;
        let config: FormConfig = serde_json::from_str(json).unwrap();
        let form = config.build_form().unwrap();
        assert_eq!(form.field("n").unwrap().default_value(), None);
    }

    #[test]
    fn test_duplicate_declarations_rejected() {
        let json = r#"{"fields": [{"kind": "text", "name": "a"}, {"kind": "numeric", "name": "a"}]}"#;
        let config: FormConfig = serde_json::from_str(json).unwrap();
        assert_eq!(
            config.build_form(),
            Err(FormError::DuplicateField("a".into()))
        );
    }

    #[test]
    fn test_save_and_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("form.json");
        let config: FormConfig = serde_json::from_str(SAMPLE).unwrap();
        config.save_to(&path).unwrap();
        let loaded = FormConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_from_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FormConfig::load_from(&dir.path().join("absent.json")).is_err());
    }
}
