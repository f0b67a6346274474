//! Command runners - launch an external program with an argument vector

use anyhow::{Context, Result};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Launches external programs on behalf of the dispatcher
pub trait CommandRunner: Send + Sync {
    /// Start `program` with `args` and return without waiting for it
    fn launch(&self, program: &Path, args: &[String]) -> Result<()>;
}

/// Runs commands as child processes, fire-and-forget
///
/// Arguments are passed as a vector, never through a shell. The child's
/// output goes to our own stdout/stderr and its exit status is not observed.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn launch(&self, program: &Path, args: &[String]) -> Result<()> {
        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .with_context(|| format!("Failed to launch {}", program.display()))?;

        // Dropping the handle detaches the child; the runtime reaps it
        debug!(pid = ?child.id(), program = %program.display(), "Callback launched");
        Ok(())
    }
}
