//! Glue between an options form and the session it configures
//!
//! The spawner serves the rendered form, keeps the options a user submitted,
//! and at launch binds one property per field on a fresh host, assigns the
//! normalized options to it and hands it to the child session.

use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use super::host::{BindingError, PropertyHost};
use super::traits::{ChildSession, HostBinding};
use crate::config::FormConfig;
use crate::forms::{FormError, OptionsForm, RawOptions, Submission};

/// Errors raised while launching a configured session
#[derive(Debug, Error)]
pub enum SpawnError {
    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    Binding(#[from] BindingError),

    #[error("session failed to start: {0:#}")]
    Child(anyhow::Error),
}

pub struct OptionsSpawner<C> {
    form: OptionsForm,
    options_form: String,
    user_options: Submission,
    child: C,
    session: Option<(Uuid, PropertyHost)>,
}

impl<C: ChildSession> OptionsSpawner<C> {
    /// An operator supplied `options_form` is served instead of the rendered one
    pub fn new(form: OptionsForm, options_form: Option<String>, child: C) -> Self {
        let options_form = options_form.unwrap_or_else(|| form.render());
        Self {
            form,
            options_form,
            user_options: Submission::new(),
            child,
            session: None,
        }
    }

    pub fn from_config(config: &FormConfig, child: C) -> Result<Self, FormError> {
        let form = config.build_form()?;
        Ok(Self::new(form, config.options_form.clone(), child))
    }

    pub fn form(&self) -> &OptionsForm {
        &self.form
    }

    /// Markup to present to the user
    pub fn options_form(&self) -> &str {
        &self.options_form
    }

    /// Extract the per-field values from submitted form data
    pub fn options_from_form(&self, form_data: &Submission) -> RawOptions {
        self.form.extract_raw(form_data)
    }

    pub fn set_user_options(&mut self, options: RawOptions) {
        self.user_options = options
            .into_iter()
            .filter_map(|(name, values)| values.map(|v| (name, v)))
            .collect();
    }

    pub fn user_options(&self) -> &Submission {
        &self.user_options
    }

    pub fn child(&self) -> &C {
        &self.child
    }

    pub fn child_mut(&mut self) -> &mut C {
        &mut self.child
    }

    /// Id and host of the running session, if one was started
    pub fn session(&self) -> Option<(Uuid, &PropertyHost)> {
        self.session.as_ref().map(|(id, host)| (*id, host))
    }

    /// Add one property per field to `host`
    pub fn apply_bindings<H: HostBinding + ?Sized>(&self, host: &mut H) -> Result<(), BindingError> {
        for field in self.form.fields() {
            host.bind(field.name(), &field.describe())?;
        }
        Ok(())
    }

    /// Normalize the stored user options and assign them to `host`
    pub fn apply_values<H: HostBinding + ?Sized>(&self, host: &mut H) -> Result<(), SpawnError> {
        let options = self.form.normalize(&self.user_options)?;
        for (name, value) in options {
            host.apply(&name, value)?;
        }
        Ok(())
    }

    /// Bind and fill a fresh host, then start the child session with it
    pub async fn start(&mut self) -> Result<Uuid, SpawnError> {
        let id = Uuid::new_v4();
        let mut host = PropertyHost::new();
        self.apply_bindings(&mut host)?;
        self.apply_values(&mut host)?;
        self.child.start(&host).await.map_err(SpawnError::Child)?;
        info!(session = %id, properties = self.form.field_count(), "session started");
        self.session = Some((id, host));
        Ok(id)
    }

    pub async fn stop(&mut self) -> anyhow::Result<()> {
        self.child.stop().await?;
        if let Some((id, _)) = self.session.take() {
            info!(session = %id, "session stopped");
        }
        Ok(())
    }
}
