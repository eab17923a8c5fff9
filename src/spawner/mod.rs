//! Host side of an options form: typed property binding and session launch

mod command;
mod host;
mod options_spawner;
mod traits;

pub use command::CommandSession;
pub use host::{BindingError, Property, PropertyHost};
pub use options_spawner::{OptionsSpawner, SpawnError};
pub use traits::{ChildSession, HostBinding};

#[cfg(test)]
pub use traits::{MockChildSession, MockHostBinding};
