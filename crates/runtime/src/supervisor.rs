//! Child process supervision.
//!
//! The host chooses two free loopback ports, launches the embedded-browser
//! child with both as startup parameters, and terminates it on shutdown.
//! This is the precondition for the transport to connect; the bridge core
//! itself never respawns a dead child.

use std::path::Path;
use std::time::Duration;

use tokio::process::{Child, Command};

use crate::error::{Error, Result};

/// Picks a currently-free loopback port by binding port 0 and reading back
/// the assignment. The port is released again before returning, so a racing
/// process could grab it; callers bind or launch promptly.
pub fn choose_loopback_port() -> Result<u16> {
    let listener = std::net::TcpListener::bind(("127.0.0.1", 0))?;
    Ok(listener.local_addr()?.port())
}

/// A supervised embedded-browser child process.
#[derive(Debug)]
pub struct ChildProcess {
    process: Child,
}

impl ChildProcess {
    /// Launches `executable` with the host's listen port and the child's
    /// listen port as its two arguments.
    ///
    /// An immediate exit (bad executable, missing runtime files) is caught
    /// here rather than surfacing later as a connect timeout.
    pub async fn launch(executable: &Path, host_port: u16, child_port: u16) -> Result<Self> {
        let mut command = Command::new(executable);
        command
            .arg(host_port.to_string())
            .arg(child_port.to_string())
            .stdin(std::process::Stdio::null());

        let mut child = command
            .spawn()
            .map_err(|e| Error::LaunchFailed(format!("Failed to spawn process: {e}")))?;

        // Give a doomed process a moment to die so we can report it now.
        tokio::time::sleep(Duration::from_millis(100)).await;

        match child.try_wait() {
            Ok(Some(status)) => Err(Error::LaunchFailed(format!(
                "Child process exited immediately with status: {status}"
            ))),
            Ok(None) => Ok(Self { process: child }),
            Err(e) => Err(Error::LaunchFailed(format!(
                "Failed to check process status: {e}"
            ))),
        }
    }

    /// Terminates the child and reaps it, bounded so shutdown cannot hang on
    /// a wedged process.
    pub async fn kill(mut self) -> Result<()> {
        self.process
            .kill()
            .await
            .map_err(|e| Error::LaunchFailed(format!("Failed to kill process: {e}")))?;

        let _ = tokio::time::timeout(Duration::from_millis(500), self.process.wait()).await;
        Ok(())
    }

    /// The child's OS process id, if it is still running.
    pub fn id(&self) -> Option<u32> {
        self.process.id()
    }
}
