//! Form domain layer
//!
//! Typed, validated input fields that render to HTML and normalize raw
//! submissions into option values a host can bind.

mod attributes;
mod checkbox;
mod error;
mod field;
mod form;
mod select;
mod text;
mod value;

pub use attributes::{is_known_attribute, render_attributes, Attributes, KNOWN_ATTRIBUTES};
pub use checkbox::CheckboxField;
pub use error::FormError;
pub use field::{Field, FieldBuilder, FieldCore, TypeDescriptor, ID_PREFIX};
pub use form::{
    submission_from_query, NormalizedOptions, OptionsForm, RawOptions, Submission,
    VALIDATION_STYLE,
};
pub use select::{Choice, SelectField};
pub use text::{NumericField, NumericKind, TextField};
pub use value::{FieldValue, ValueKind};
