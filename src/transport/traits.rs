//! Transport trait abstraction for line-oriented device links

use anyhow::Result;
use async_trait::async_trait;

/// A source of newline-delimited text lines
#[async_trait]
pub trait LineSource: Send {
    /// Read the next line without its terminator
    ///
    /// Returns `Ok(None)` once the underlying stream has ended.
    async fn next_line(&mut self) -> Result<Option<String>>;
}

/// Factory for opening a line source
#[async_trait]
pub trait LineConnector: Send + Sync {
    /// The source type this connector produces
    type Source: LineSource;

    /// Open the link, returning a line source on success
    async fn connect(&self) -> Result<Self::Source>;

    /// Human-readable name for this transport
    fn name(&self) -> &'static str;
}
