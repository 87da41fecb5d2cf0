//! Variant probing
//!
//! This module pokes an open channel with a bare terminator, asks for `info`,
//! and hands both replies to [`vna_protocol::identify::classify`].

use std::thread;
use std::time::Duration;

use tracing::{debug, info, trace, warn};
use vna_protocol::{identify, CommandSet, HardwareVariant};

use crate::channel::{ChannelConfig, CommandChannel};
use crate::error::DetectError;
use crate::transport::{open_serial, SerialConfig, Transport};

/// Outcome of a successful probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    /// Identified variant
    pub variant: HardwareVariant,
    /// Version label of the matching rule (`v1`, `vh`, `v2`)
    pub version: &'static str,
    /// Raw reply to the bare terminator
    pub probe_response: String,
    /// Reply to `info` (empty if the query failed)
    pub info_response: String,
}

/// Configuration for probing
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Delay before the first byte is sent, letting a fresh port settle
    pub settle: Duration,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            settle: Duration::from_millis(50),
        }
    }
}

/// NanoVNA variant prober
pub struct VariantProber {
    config: ProbeConfig,
}

impl VariantProber {
    /// Create a new prober with default configuration
    pub fn new() -> Self {
        Self {
            config: ProbeConfig::default(),
        }
    }

    /// Create a prober with custom configuration
    pub fn with_config(config: ProbeConfig) -> Self {
        Self { config }
    }

    /// Identify the instrument behind `channel`
    ///
    /// `commands` is the dialect currently assumed for the session; its
    /// `info` command and prompt are used for the auxiliary query.
    pub fn detect<T: Transport>(
        &self,
        channel: &mut CommandChannel<T>,
        commands: &CommandSet,
    ) -> Result<Detection, DetectError> {
        thread::sleep(self.config.settle);

        let probe_response = channel.probe()?;
        trace!("Probe reply: {:?}", probe_response);

        let info_response = match channel.exchange(commands.info, commands.prompt) {
            Ok(text) => text,
            Err(e) => {
                debug!("info query failed during detection, continuing without it: {}", e);
                String::new()
            }
        };

        match identify::classify(&probe_response, &info_response) {
            Some(id) => {
                info!("Identified {} ({} prompt style)", id.variant, id.version);
                Ok(Detection {
                    variant: id.variant,
                    version: id.version,
                    probe_response,
                    info_response,
                })
            }
            None => {
                debug!("No variant matched probe reply {:?}", probe_response);
                Err(DetectError::UnrecognizedDevice {
                    response: probe_response,
                })
            }
        }
    }
}

impl Default for VariantProber {
    fn default() -> Self {
        Self::new()
    }
}

/// Open a serial port and probe it
///
/// This is a convenience function for listing what is attached where.
/// Returns `None` if the port cannot be opened or nothing is recognized.
pub fn probe_port(port_name: &str, config: &SerialConfig) -> Option<Detection> {
    debug!("Probing {} at {} baud", port_name, config.baud_rate);

    let port = match open_serial(port_name, config) {
        Ok(p) => p,
        Err(e) => {
            warn!("{}", e);
            return None;
        }
    };

    let mut channel = CommandChannel::with_config(port, ChannelConfig::default());
    let commands = vna_protocol::VnaDatabase::lookup(HardwareVariant::Unknown).command_set;
    VariantProber::new().detect(&mut channel, &commands).ok()
}
