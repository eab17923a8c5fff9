//! Child session backed by a local process

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use tokio::process::{Child, Command};

use super::host::PropertyHost;
use super::traits::ChildSession;

/// Runs a command with every bound property exported to its environment
#[derive(Debug)]
pub struct CommandSession {
    program: String,
    args: Vec<String>,
    child: Option<Child>,
}

impl CommandSession {
    /// Create a session from `[program, args...]`
    pub fn new(command: &[String]) -> Result<Self> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| anyhow!("session command cannot be empty"))?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
            child: None,
        })
    }

    pub fn is_running(&self) -> bool {
        self.child.is_some()
    }

    pub fn pid(&self) -> Option<u32> {
        self.child.as_ref().and_then(Child::id)
    }
}

#[async_trait]
impl ChildSession for CommandSession {
    async fn start(&mut self, properties: &PropertyHost) -> Result<()> {
        if self.child.is_some() {
            bail!("session {} is already running", self.program);
        }
        let child = Command::new(&self.program)
            .args(&self.args)
            .envs(properties.env_vars())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {}", self.program))?;
        tracing::info!(program = %self.program, pid = ?child.id(), "started session process");
        self.child = Some(child);
        Ok(())
    }

    async fn wait(&mut self) -> Result<Option<i32>> {
        let Some(child) = self.child.as_mut() else {
            bail!("session {} is not running", self.program);
        };
        let status = child.wait().await?;
        self.child = None;
        Ok(status.code())
    }

    async fn stop(&mut self) -> Result<()> {
        if let Some(mut child) = self.child.take() {
            child.kill().await?;
            tracing::info!(program = %self.program, "stopped session process");
        }
        Ok(())
    }
}
