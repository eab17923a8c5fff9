//! Trait abstractions for the host side of an options form, enabling mocking in tests

use anyhow::Result;
use async_trait::async_trait;

use super::host::{BindingError, PropertyHost};
use crate::forms::{FieldValue, TypeDescriptor};

/// An object that can grow typed properties at runtime and have them set
#[cfg_attr(test, mockall::automock)]
pub trait HostBinding: Send {
    /// Add a property typed by `descriptor`
    fn bind(&mut self, name: &str, descriptor: &TypeDescriptor) -> Result<(), BindingError>;

    /// Assign a normalized option to a bound property
    fn apply(&mut self, name: &str, value: Option<FieldValue>) -> Result<(), BindingError>;

    /// Current value of a bound property
    fn get(&self, name: &str) -> Option<FieldValue>;
}

/// The long-running session launched with the bound options
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChildSession: Send {
    /// Start the session with the host's properties
    async fn start(&mut self, properties: &PropertyHost) -> Result<()>;

    /// Wait for the session to end, returning its exit code if it has one
    async fn wait(&mut self) -> Result<Option<i32>>;

    /// Stop the session if it is running
    async fn stop(&mut self) -> Result<()>;
}
