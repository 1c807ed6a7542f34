//! Client configuration management

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::network::DEFAULT_PORT;

/// Device connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceSettings {
    /// Device address. Out of the box the appliances run an access point
    /// reachable at 192.168.4.1.
    pub host: String,
    /// Device TCP port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Upper bound for one command exchange, in seconds; 0 waits forever
    /// like the wire protocol natively does
    #[serde(default = "default_command_timeout_secs")]
    pub command_timeout_secs: u64,
}

/// General client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientSettings {
    /// Default log filter when RUST_LOG is not set
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub device: DeviceSettings,
    pub client: ClientSettings,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_command_timeout_secs() -> u64 {
    30
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            device: DeviceSettings {
                host: "192.168.4.1".to_string(),
                port: DEFAULT_PORT,
                command_timeout_secs: default_command_timeout_secs(),
            },
            client: ClientSettings {
                log_level: "info".to_string(),
            },
        }
    }
}

impl ClientConfig {
    /// Load configuration from the specified path, or search the standard
    /// locations when none is given.
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = if let Some(p) = path {
            p
        } else {
            let candidates = vec![
                Self::default_path(),
                PathBuf::from("/etc/brewlink/client.toml"),
            ];

            candidates
                .into_iter()
                .find(|p| p.exists())
                .ok_or_else(|| anyhow!("No configuration file found, using defaults"))?
        };

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: ClientConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        config.validate()?;

        tracing::info!("Loaded configuration from: {}", config_path.display());
        Ok(config)
    }

    /// Load configuration or return defaults if not found.
    pub fn load_or_default() -> Self {
        match Self::load(None) {
            Ok(config) => config,
            Err(e) => {
                // Print to stderr since logging might not be initialized yet
                eprintln!("Config: {}", e);
                Self::default()
            }
        }
    }

    /// Save configuration to the specified path.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::info!("Saved configuration to: {}", path.display());
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_path() -> PathBuf {
        if let Some(config_dir) = dirs::config_dir() {
            config_dir.join("brewlink").join("client.toml")
        } else {
            PathBuf::from(".config/brewlink/client.toml")
        }
    }

    /// The per-exchange deadline, `None` when disabled.
    pub fn command_timeout(&self) -> Option<Duration> {
        match self.device.command_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.client.log_level.as_str()) {
            return Err(anyhow!(
                "Invalid log level '{}', must be one of: {}",
                self.client.log_level,
                valid_levels.join(", ")
            ));
        }

        if self.device.host.is_empty() {
            return Err(anyhow!("Device host must not be empty"));
        }

        if self.device.port == 0 {
            return Err(anyhow!("Device port must not be 0"));
        }

        Ok(())
    }
}
