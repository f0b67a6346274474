//! Dispatcher - hands accepted packets to the callback command

use super::runner::CommandRunner;
use anyhow::Result;
use lora_mailbox_shared::PacketRecord;
use std::path::{Path, PathBuf};
use tracing::info;

/// Invokes the configured callback once per accepted packet
///
/// The callback receives four positional arguments in fixed order:
/// `<rssi> <length> <weight> <battery>`.
pub struct Dispatcher<R> {
    command: PathBuf,
    runner: R,
}

impl<R: CommandRunner> Dispatcher<R> {
    /// Create a dispatcher for the given callback command
    pub fn new(command: impl Into<PathBuf>, runner: R) -> Self {
        Self {
            command: command.into(),
            runner,
        }
    }

    pub fn command(&self) -> &Path {
        &self.command
    }

    #[cfg(test)]
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Launch the callback for `record`
    ///
    /// Does not wait for the callback and never retries. A launch failure is
    /// returned to the caller for reporting.
    pub fn dispatch(&self, record: &PacketRecord) -> Result<()> {
        let args = record.to_args();

        self.runner.launch(&self.command, &args)?;

        info!(
            command = %self.command.display(),
            rssi = %record.signal_strength,
            length = %record.payload_length,
            weight = %record.weight,
            battery = %record.battery_level,
            "Callback dispatched"
        );
        Ok(())
    }
}
