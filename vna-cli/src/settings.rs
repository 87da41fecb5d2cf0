//! Command-line settings

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use vna_detect::{ChannelConfig, ScannerConfig, SerialConfig};

/// Settings read from `settings.json`
///
/// Every field is optional in the file; missing fields keep their defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Serial baud rate
    pub baud_rate: u32,
    /// Serial read timeout in milliseconds
    pub read_timeout_ms: u64,
    /// Wait after each command before reading, in milliseconds
    pub grace_ms: u64,
    /// Wait between reads, in milliseconds
    pub read_delay_ms: u64,
    /// Maximum reads per command
    pub max_attempts: u32,
    /// Bytes per read
    pub read_buffer: usize,
    /// Ports whose name contains any of these are never probed
    pub skip_patterns: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        let serial = SerialConfig::default();
        let channel = ChannelConfig::default();
        Self {
            baud_rate: serial.baud_rate,
            read_timeout_ms: serial.read_timeout.as_millis() as u64,
            grace_ms: channel.grace.as_millis() as u64,
            read_delay_ms: channel.read_delay.as_millis() as u64,
            max_attempts: channel.max_attempts,
            read_buffer: channel.read_buffer,
            skip_patterns: vec!["Bluetooth".to_string(), "debug".to_string()],
        }
    }
}

impl Settings {
    /// Get the XDG config directory for nanovna
    /// Uses $XDG_CONFIG_HOME/nanovna, falls back to ~/.config/nanovna
    fn config_dir() -> Option<PathBuf> {
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_config);
            if path.is_absolute() {
                return Some(path.join("nanovna"));
            }
        }

        dirs::home_dir().map(|h| h.join(".config").join("nanovna"))
    }

    /// Get the default settings file path
    pub fn default_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.json"))
    }

    /// Load settings from the default path, or defaults if there is no file
    pub fn load() -> Self {
        Self::default_path()
            .and_then(|path| std::fs::read_to_string(path).ok())
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default()
    }

    /// Load settings from an explicit path; the file must exist and parse
    pub fn load_from(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse settings in {}", path.display()))
    }

    /// Save settings to `path`, creating its directory
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create settings directory")?;
        }

        let json = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;
        std::fs::write(path, json).context("Failed to write settings")?;

        Ok(())
    }

    /// Serial line settings
    pub fn serial_config(&self) -> SerialConfig {
        SerialConfig {
            baud_rate: self.baud_rate,
            read_timeout: Duration::from_millis(self.read_timeout_ms),
            ..SerialConfig::default()
        }
    }

    /// Command channel timing
    pub fn channel_config(&self) -> ChannelConfig {
        ChannelConfig {
            grace: Duration::from_millis(self.grace_ms),
            read_delay: Duration::from_millis(self.read_delay_ms),
            max_attempts: self.max_attempts,
            read_buffer: self.read_buffer,
        }
    }

    /// Port scanner configuration
    pub fn scanner_config(&self) -> ScannerConfig {
        ScannerConfig {
            skip_patterns: self.skip_patterns.clone(),
        }
    }
}
