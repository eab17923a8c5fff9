//! In-memory host object holding one typed property per form field

use indexmap::IndexMap;
use thiserror::Error;

use super::traits::HostBinding;
use crate::forms::{FieldValue, TypeDescriptor, ValueKind};

/// Errors raised while binding or assigning host properties
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BindingError {
    #[error("no property named {0} is bound")]
    UnknownProperty(String),

    #[error("property {name} expects {expected}, got {found}")]
    TypeMismatch {
        name: String,
        expected: ValueKind,
        found: ValueKind,
    },

    #[error("property {0} cannot be unset")]
    NotNullable(String),
}

/// A bound property: its declared type and current value
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub descriptor: TypeDescriptor,
    pub value: Option<FieldValue>,
}

impl Property {
    fn new(descriptor: TypeDescriptor) -> Self {
        let value = match &descriptor.default_value {
            Some(default) => Some(default.clone()),
            None if descriptor.nullable => None,
            None => Some(descriptor.kind.zero()),
        };
        Self { descriptor, value }
    }
}

/// Host object for one session; properties are added at runtime
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyHost {
    properties: IndexMap<String, Property>,
}

impl PropertyHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_bound(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }

    pub fn properties(&self) -> impl Iterator<Item = (&str, &Property)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Properties as environment variables: upper-cased name, unset values empty
    pub fn env_vars(&self) -> Vec<(String, String)> {
        self.properties
            .iter()
            .map(|(name, property)| {
                let value = property
                    .value
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_default();
                (name.to_uppercase(), value)
            })
            .collect()
    }
}

impl HostBinding for PropertyHost {
    /// Rebinding a name replaces the earlier property
    fn bind(&mut self, name: &str, descriptor: &TypeDescriptor) -> Result<(), BindingError> {
        self.properties
            .insert(name.to_string(), Property::new(descriptor.clone()));
        Ok(())
    }

    fn apply(&mut self, name: &str, value: Option<FieldValue>) -> Result<(), BindingError> {
        let property = self
            .properties
            .get_mut(name)
            .ok_or_else(|| BindingError::UnknownProperty(name.to_string()))?;
        let expected = property.descriptor.kind;
        property.value = match value {
            None if property.descriptor.nullable => None,
            None => return Err(BindingError::NotNullable(name.to_string())),
            Some(FieldValue::Integer(i)) if expected == ValueKind::Float => {
                Some(FieldValue::Float(i as f64))
            }
            Some(value) if value.kind() == expected => Some(value),
            Some(value) => {
                return Err(BindingError::TypeMismatch {
                    name: name.to_string(),
                    expected,
                    found: value.kind(),
                })
            }
        };
        Ok(())
    }

    fn get(&self, name: &str) -> Option<FieldValue> {
        self.properties.get(name).and_then(|p| p.value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(kind: ValueKind, default_value: Option<FieldValue>, nullable: bool) -> TypeDescriptor {
        TypeDescriptor {
            kind,
            default_value,
            nullable,
        }
    }

    #[test]
    fn test_bind_starts_at_default() {
        let mut host = PropertyHost::new();
        host.bind("name", &descriptor(ValueKind::String, Some("x".into()), false))
            .unwrap();
        assert!(host.is_bound("name"));
        assert_eq!(host.get("name"), Some(FieldValue::from("x")));
    }

    #[test]
    fn test_bind_without_default_uses_zero() {
        let mut host = PropertyHost::new();
        host.bind("cores", &descriptor(ValueKind::Integer, None, false))
            .unwrap();
        host.bind("mem", &descriptor(ValueKind::Float, None, true))
            .unwrap();
        assert_eq!(host.get("cores"), Some(FieldValue::Integer(0)));
        assert_eq!(host.get("mem"), None);
    }

    #[test]
    fn test_apply_checks_kind() {
        let mut host = PropertyHost::new();
        host.bind("cores", &descriptor(ValueKind::Integer, None, false))
            .unwrap();
        host.apply("cores", Some(FieldValue::Integer(4))).unwrap();
        assert_eq!(host.get("cores"), Some(FieldValue::Integer(4)));

        let err = host.apply("cores", Some("four".into())).unwrap_err();
        assert_eq!(
            err,
            BindingError::TypeMismatch {
                name: "cores".into(),
                expected: ValueKind::Integer,
                found: ValueKind::String,
            }
        );
    }

    #[test]
    fn test_integer_widens_into_float() {
        let mut host = PropertyHost::new();
        host.bind("mem", &descriptor(ValueKind::Float, None, false))
            .unwrap();
        host.apply("mem", Some(FieldValue::Integer(2))).unwrap();
        assert_eq!(host.get("mem"), Some(FieldValue::Float(2.0)));
    }

    #[test]
    fn test_none_needs_nullable() {
        let mut host = PropertyHost::new();
        host.bind("gpu", &descriptor(ValueKind::String, None, true))
            .unwrap();
        host.bind("cores", &descriptor(ValueKind::Integer, None, false))
            .unwrap();
        host.apply("gpu", None).unwrap();
        assert_eq!(
            host.apply("cores", None),
            Err(BindingError::NotNullable("cores".into()))
        );
    }

    #[test]
    fn test_apply_unknown_property() {
        let mut host = PropertyHost::new();
        assert_eq!(
            host.apply("missing", Some(FieldValue::Boolean(true))),
            Err(BindingError::UnknownProperty("missing".into()))
        );
    }

    #[test]
    fn test_env_vars() {
        let mut host = PropertyHost::new();
        host.bind("queue", &descriptor(ValueKind::String, Some("long".into()), false))
            .unwrap();
        host.bind("gpu", &descriptor(ValueKind::String, None, true))
            .unwrap();
        assert_eq!(
            host.env_vars(),
            vec![
                ("QUEUE".to_string(), "long".to_string()),
                ("GPU".to_string(), String::new()),
            ]
        );
    }
}
