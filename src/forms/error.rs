//! Error types for form construction and normalization.

use thiserror::Error;

use super::value::ValueKind;

/// Errors raised while declaring a form or normalizing a submission.
///
/// Construction errors surface to the operator when the form is built.
/// Normalization errors are field-local and worded for the end user.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    /// The field declaration itself is invalid.
    #[error("{0}")]
    Construction(String),

    /// Two fields in one form share a name.
    #[error("Duplicate field name: {0}")]
    DuplicateField(String),

    /// A required field resolved to an empty or absent value.
    #[error("Required field cannot be empty: {label}.")]
    RequiredFieldEmpty { label: String },

    /// A submitted value cannot be coerced to the field's kind.
    #[error("Cannot convert to {kind}: {value}")]
    ConversionFailure { kind: ValueKind, value: String },

    /// A select submission is not one of the declared choices.
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),
}

impl FormError {
    pub(crate) fn construction(message: impl Into<String>) -> Self {
        Self::Construction(message.into())
    }

    pub(crate) fn required(label: &str) -> Self {
        Self::RequiredFieldEmpty {
            label: label.to_string(),
        }
    }

    /// Whether the message is meant to be shown back to the person who
    /// submitted the form, as opposed to the operator who declared it.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::RequiredFieldEmpty { .. } | Self::ConversionFailure { .. } | Self::InvalidSelection(_)
        )
    }
}
