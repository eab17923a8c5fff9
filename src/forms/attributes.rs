//! Markup attribute maps and their rendering
//!
//! Attributes are stored in a sorted map so rendering is deterministic:
//! names come out in ascending lexicographic order, `true` flags render
//! bare and `false` flags are dropped entirely.

use std::collections::BTreeMap;

use super::value::FieldValue;

/// Attribute names accepted through [`super::FieldBuilder::attr`].
///
/// Anything outside this list has to go through `extra_attr`.
pub const KNOWN_ATTRIBUTES: &[&str] = &[
    "autocomplete",
    "autofocus",
    "checked",
    "disabled",
    "list",
    "max",
    "maxlength",
    "min",
    "minlength",
    "multiple",
    "name",
    "pattern",
    "placeholder",
    "readonly",
    "required",
    "size",
    "step",
    "title",
    "type",
    "value",
];

pub fn is_known_attribute(name: &str) -> bool {
    KNOWN_ATTRIBUTES.binary_search(&name).is_ok()
}

/// Ordered attribute name to value mapping
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes(BTreeMap<String, FieldValue>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.0.insert(name.into(), value.into());
    }

    /// Insert only when the attribute is not set yet
    pub fn insert_default(&mut self, name: &str, value: impl Into<FieldValue>) {
        self.0
            .entry(name.to_string())
            .or_insert_with(|| value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        self.0.remove(name)
    }

    /// Truthiness of a flag-like attribute; missing means `false`
    pub fn flag(&self, name: &str) -> bool {
        self.get(name).is_some_and(FieldValue::is_truthy)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Render as a space separated `name="value"` list
    pub fn render(&self) -> String {
        render_attributes(self.iter())
    }
}

/// Render attribute pairs for direct insertion into a start tag.
///
/// Input order is kept; [`Attributes`] already yields names sorted.
/// Values are inserted unescaped.
pub fn render_attributes<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a FieldValue)>) -> String {
    pairs
        .into_iter()
        .filter_map(|(name, value)| match value {
            FieldValue::Boolean(true) => Some(name.to_string()),
            FieldValue::Boolean(false) => None,
            other => Some(format!("{name}=\"{other}\"")),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
