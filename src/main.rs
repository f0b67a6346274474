mod config;
mod dispatch;
mod ingest;
mod transport;

use anyhow::{Context, Result};
use config::BridgeConfig;
use dispatch::{Dispatcher, ProcessRunner};
use ingest::Pipeline;
use transport::{LineConnector, SerialConnector};

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = BridgeConfig::load_default().context("Failed to load configuration")?;

    info!("LoRa mailbox receiver starting");
    info!("  Serial port: {} @ {} baud", config.serial.port, config.serial.baud_rate);
    info!("  Callback: {}", config.callback.command.display());

    let connector = SerialConnector::new(config.serial.port.clone(), config.serial.baud_rate);
    let mut source = connector
        .connect()
        .await
        .with_context(|| format!("{} transport unavailable", connector.name()))?;

    let dispatcher = Dispatcher::new(config.callback.command.clone(), ProcessRunner);
    let mut pipeline = Pipeline::new(dispatcher);

    let failure = pipeline.run(&mut source).await;
    error!(port = connector.port(), "Program terminated: {:#}", failure);

    Err(failure)
}
