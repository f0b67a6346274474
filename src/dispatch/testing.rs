//! Recording runner used by dispatch and pipeline tests

use super::CommandRunner;
use anyhow::{bail, Result};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Records every launch instead of spawning a process
#[derive(Debug, Default)]
pub struct RecordingRunner {
    launches: Mutex<Vec<(PathBuf, Vec<String>)>>,
    fail: bool,
}

impl RecordingRunner {
    /// A runner whose launches always fail
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn launches(&self) -> Vec<(PathBuf, Vec<String>)> {
        self.launches.lock().unwrap().clone()
    }
}

impl CommandRunner for RecordingRunner {
    fn launch(&self, program: &Path, args: &[String]) -> Result<()> {
        self.launches
            .lock()
            .unwrap()
            .push((program.to_path_buf(), args.to_vec()));

        if self.fail {
            bail!("No such file or directory: {}", program.display());
        }
        Ok(())
    }
}
