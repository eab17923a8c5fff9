//! Options Form - typed, validated input fields for configuring a session
//!
//! Fields render to HTML for the user to fill in, normalize the submitted
//! values into typed options, and describe their types so a host can bind
//! them as properties before launching a session.

pub mod config;
pub mod forms;
pub mod spawner;

pub use config::FormConfig;
pub use forms::{Field, FieldValue, FormError, OptionsForm, Submission, TypeDescriptor};
pub use spawner::{CommandSession, HostBinding, OptionsSpawner, PropertyHost};
