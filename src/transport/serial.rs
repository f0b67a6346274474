//! Serial transport for the LoRa receiver gateway
//!
//! The gateway prints one text line per event over a USB serial adapter.
//! Bytes that are not valid UTF-8 (line noise, boot garbage) are replaced
//! rather than failing the read.

use crate::transport::traits::{LineConnector, LineSource};
use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio_serial::{DataBits, Parity, SerialPortBuilderExt, SerialStream, StopBits};
use tracing::{debug, info};

/// Newline-delimited line reader over any async byte stream
pub struct LineReader<R> {
    inner: BufReader<R>,
    buf: Vec<u8>,
}

impl<R: AsyncRead + Unpin + Send> LineReader<R> {
    pub fn new(stream: R) -> Self {
        Self {
            inner: BufReader::new(stream),
            buf: Vec::with_capacity(256),
        }
    }
}

#[async_trait]
impl<R: AsyncRead + Unpin + Send> LineSource for LineReader<R> {
    async fn next_line(&mut self) -> Result<Option<String>> {
        self.buf.clear();

        let n = self
            .inner
            .read_until(b'\n', &mut self.buf)
            .await
            .context("Failed to read from transport")?;

        if n == 0 {
            return Ok(None);
        }

        let line = String::from_utf8_lossy(&self.buf);
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

/// Connector for a serial device such as `/dev/ttyUSB0`
pub struct SerialConnector {
    port: String,
    baud_rate: u32,
}

impl SerialConnector {
    pub fn new(port: impl Into<String>, baud_rate: u32) -> Self {
        Self {
            port: port.into(),
            baud_rate,
        }
    }

    pub fn port(&self) -> &str {
        &self.port
    }
}

#[async_trait]
impl LineConnector for SerialConnector {
    type Source = LineReader<SerialStream>;

    async fn connect(&self) -> Result<Self::Source> {
        debug!(port = %self.port, baud = self.baud_rate, "Opening serial port");

        // 8N1, as configured on the gateway firmware
        let stream = tokio_serial::new(self.port.as_str(), self.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .open_native_async()
            .with_context(|| format!("Failed to open serial port {}", self.port))?;

        info!(port = %self.port, baud = self.baud_rate, "Serial port opened");
        Ok(LineReader::new(stream))
    }

    fn name(&self) -> &'static str {
        "Serial"
    }
}
