//! Callback dispatch for accepted packets
//!
//! This module handles:
//! - Turning a parsed record into the callback's positional arguments
//! - Launching the configured command without a shell
//! - Reporting launch failures (no retries)

mod dispatcher;
mod runner;

pub use dispatcher::Dispatcher;
pub use runner::{CommandRunner, ProcessRunner};

#[cfg(test)]
pub mod testing;
