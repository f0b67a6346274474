//! Ingestion pipeline - read, parse and dispatch one line at a time

use crate::dispatch::{CommandRunner, Dispatcher};
use crate::transport::LineSource;
use lora_mailbox_shared::{parse, RejectReason};
use std::collections::HashMap;
use tracing::{debug, error, info, warn};

/// What happened to a single line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineDisposition {
    /// Parsed and handed to the callback
    Dispatched,
    /// Parsed, but the callback could not be launched
    DispatchFailed,
    /// Skipped for the given reason
    Rejected(RejectReason),
}

/// Per-run line counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub lines: u64,
    pub dispatched: u64,
    pub dispatch_failures: u64,
    pub rejections: HashMap<RejectReason, u64>,
}

impl PipelineStats {
    fn record(&mut self, disposition: LineDisposition) {
        self.lines += 1;
        match disposition {
            LineDisposition::Dispatched => self.dispatched += 1,
            LineDisposition::DispatchFailed => self.dispatch_failures += 1,
            LineDisposition::Rejected(reason) => *self.rejections.entry(reason).or_default() += 1,
        }
    }

    /// Number of lines skipped for `reason`
    pub fn rejected(&self, reason: RejectReason) -> u64 {
        self.rejections.get(&reason).copied().unwrap_or(0)
    }

    /// Rejection counts as `reason=count` pairs, one per known reason
    pub fn rejection_summary(&self) -> String {
        RejectReason::ALL
            .iter()
            .map(|reason| format!("{}={}", reason.as_str(), self.rejected(*reason)))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Single-task pipeline from a line source to the callback dispatcher
///
/// Lines are handled strictly in order; nothing carries over from one line
/// to the next except the counters.
pub struct Pipeline<R> {
    dispatcher: Dispatcher<R>,
    stats: PipelineStats,
}

impl<R: CommandRunner> Pipeline<R> {
    pub fn new(dispatcher: Dispatcher<R>) -> Self {
        Self {
            dispatcher,
            stats: PipelineStats::default(),
        }
    }

    #[cfg(test)]
    pub fn stats(&self) -> &PipelineStats {
        &self.stats
    }

    #[cfg(test)]
    pub fn dispatcher(&self) -> &Dispatcher<R> {
        &self.dispatcher
    }

    /// Parse one raw line and dispatch it if it is a valid announcement
    pub fn handle_line(&mut self, line: &str) -> LineDisposition {
        let disposition = match parse(line) {
            Ok(record) => match self.dispatcher.dispatch(&record) {
                Ok(()) => LineDisposition::Dispatched,
                Err(e) => {
                    error!("Failed to dispatch callback: {e:#}");
                    LineDisposition::DispatchFailed
                }
            },
            Err(RejectReason::NotAnAnnouncement) => {
                // Gateways print boot banners and debug chatter too
                debug!(line = %line.trim(), "Ignoring non-announcement line");
                LineDisposition::Rejected(RejectReason::NotAnAnnouncement)
            }
            Err(reason) => {
                warn!(reason = reason.as_str(), line = %line.trim(), "Invalid announcement: {}", reason);
                LineDisposition::Rejected(reason)
            }
        };

        self.stats.record(disposition);
        disposition
    }

    /// Process lines until the transport fails
    ///
    /// Parse and dispatch problems never stop the loop. The only way out is a
    /// read error or end of stream, which is returned as the fatal error.
    pub async fn run<S: LineSource>(&mut self, source: &mut S) -> anyhow::Error {
        info!(command = %self.dispatcher.command().display(), "Waiting for LoRa packets");

        let failure = loop {
            match source.next_line().await {
                Ok(Some(line)) => {
                    self.handle_line(&line);
                }
                Ok(None) => break anyhow::anyhow!("Transport closed (device disconnected)"),
                Err(e) => break e.context("Transport read failed"),
            }
        };

        info!(
            lines = self.stats.lines,
            dispatched = self.stats.dispatched,
            dispatch_failures = self.stats.dispatch_failures,
            rejected = %self.stats.rejection_summary(),
            "Pipeline stopped"
        );

        failure
    }
}
