//! Docker lifecycle control for the managed node containers.
//!
//! Restarting a node is the one mutating action the harness performs on a
//! collaborator; callers must re-synchronize (new snapshot, warm-up wait)
//! afterwards. No automatic fencing is provided.

use crate::HarnessError;
use std::process::Command;

/// A named node container managed through the docker CLI.
#[derive(Debug, Clone)]
pub struct NodeContainer {
    name: String,
}

impl NodeContainer {
    /// Creates a handle for the container with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The container name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Starts the container.
    pub fn start(&self) -> Result<(), HarnessError> {
        self.docker("start")
    }

    /// Stops the container.
    pub fn stop(&self) -> Result<(), HarnessError> {
        self.docker("stop")
    }

    /// Restarts the container.
    pub fn restart(&self) -> Result<(), HarnessError> {
        tracing::info!(target: "preconf::harness", container = %self.name, "restarting container");
        self.docker("restart")
    }

    /// Whether the container is currently running.
    pub fn is_running(&self) -> Result<bool, HarnessError> {
        let output = Command::new("docker")
            .args(["inspect", "--format={{.State.Running}}", &self.name])
            .output()?;
        if !output.status.success() {
            return Err(HarnessError::Container {
                name: self.name.clone(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim() == "true")
    }

    /// Starts the container unless it is already running. Used by teardown
    /// to restore both nodes before the next scenario.
    pub fn ensure_running(&self) -> Result<(), HarnessError> {
        if !self.is_running()? {
            tracing::warn!(
                target: "preconf::harness",
                container = %self.name,
                "container stopped, starting it"
            );
            self.start()?;
        }
        Ok(())
    }

    fn docker(&self, subcommand: &str) -> Result<(), HarnessError> {
        let output = Command::new("docker").args([subcommand, &self.name]).output()?;
        if !output.status.success() {
            return Err(HarnessError::Container {
                name: self.name.clone(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}
