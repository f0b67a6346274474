//! Receiver configuration
//!
//! Loaded from a TOML file; every field has a default so a partial (or
//! absent) file is fine:
//! ```toml
//! [serial]
//! port = "/dev/ttyUSB4"
//! baud_rate = 9600
//!
//! [callback]
//! command = "/coding/mailbox/onMessage.sh"
//! ```

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "LORA_MAILBOX_CONFIG";

/// Config file read from the working directory when no path is given
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Complete receiver configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub serial: SerialConfig,
    pub callback: CallbackConfig,
}

/// Serial link to the LoRa gateway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    /// Device path (e.g., "/dev/ttyUSB0")
    pub port: String,
    pub baud_rate: u32,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: "/dev/ttyUSB4".into(),
            baud_rate: 9600,
        }
    }
}

/// External command run for every accepted packet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CallbackConfig {
    pub command: PathBuf,
}

impl Default for CallbackConfig {
    fn default() -> Self {
        Self {
            command: "/coding/mailbox/onMessage.sh".into(),
        }
    }
}

impl BridgeConfig {
    /// Load configuration from the environment-selected file
    ///
    /// Uses `$LORA_MAILBOX_CONFIG` when set (the file must exist), otherwise
    /// `config.toml` if present, otherwise built-in defaults.
    pub fn load_default() -> Result<Self> {
        match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => {
                info!("Using {} from environment", CONFIG_PATH_ENV);
                Self::load(Path::new(&path))
            }
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::load(Path::new(DEFAULT_CONFIG_PATH))
            }
            None => {
                info!("No {} found, using built-in defaults", DEFAULT_CONFIG_PATH);
                let config = Self::default();
                config.validate()?;
                Ok(config)
            }
        }
    }

    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config = Self::from_toml(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        info!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Parse and validate configuration text
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.serial.port.trim().is_empty() {
            bail!("Serial port must not be empty");
        }

        if self.serial.baud_rate == 0 {
            bail!("Serial baud_rate must be greater than 0");
        }

        if self.callback.command.as_os_str().is_empty() {
            bail!("Callback command must not be empty");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = BridgeConfig::default();
        assert_eq!(config.serial.port, "/dev/ttyUSB4");
        assert_eq!(config.serial.baud_rate, 9600);
        assert_eq!(config.callback.command, Path::new("/coding/mailbox/onMessage.sh"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = BridgeConfig::from_toml("[serial]\nport = \"/dev/ttyACM0\"\n").unwrap();
        assert_eq!(config.serial.port, "/dev/ttyACM0");
        assert_eq!(config.serial.baud_rate, 9600);
        assert_eq!(config.callback, CallbackConfig::default());

        assert_eq!(BridgeConfig::from_toml("").unwrap(), BridgeConfig::default());
    }

    #[test]
    fn test_config_validation() {
        let mut config = BridgeConfig::default();

        config.serial.port = " ".into();
        assert!(config.validate().is_err());
        config.serial.port = "/dev/ttyUSB0".into();

        config.serial.baud_rate = 0;
        assert!(config.validate().is_err());
        config.serial.baud_rate = 115200;

        config.callback.command = PathBuf::new();
        assert!(config.validate().is_err());

        assert!(BridgeConfig::from_toml("[serial]\nbaud_rate = 0\n").is_err());
        assert!(BridgeConfig::from_toml("[serial]\nbaud_rate = \"fast\"\n").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[serial]\nport = \"/dev/ttyUSB0\"\nbaud_rate = 115200\n\n[callback]\ncommand = \"/opt/mailbox/notify\""
        )
        .unwrap();

        let config = BridgeConfig::load(file.path()).unwrap();
        assert_eq!(config.serial.port, "/dev/ttyUSB0");
        assert_eq!(config.serial.baud_rate, 115200);
        assert_eq!(config.callback.command, Path::new("/opt/mailbox/notify"));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = BridgeConfig::load(&dir.path().join("missing.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
