//! Device handle
//!
//! [`NanoVna`] owns one connection: the command channel, the serial settings
//! it was opened with, and the identification state. Sweep, info and
//! calibration operations are implemented in their own modules.

use serialport::SerialPort;
use tracing::{debug, info, warn};
use vna_detect::{
    open_serial, ChannelConfig, CommandChannel, ProbeConfig, SerialConfig, Transport,
    VariantProber,
};
use vna_protocol::{FrequencyRange, HardwareCapabilities, HardwareInfo, HardwareVariant};

use crate::error::VnaError;
use crate::state::SessionState;

/// A connection to a NanoVNA-family analyzer
pub struct NanoVna<T = Box<dyn SerialPort>> {
    /// Port name, or a label for non-serial transports
    port: String,
    /// Settings the port was opened with (serial transports only)
    serial_config: Option<SerialConfig>,
    pub(crate) channel: CommandChannel<T>,
    pub(crate) state: SessionState,
    prober: VariantProber,
}

impl<T> std::fmt::Debug for NanoVna<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NanoVna")
            .field("port", &self.port)
            .field("serial_config", &self.serial_config)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl NanoVna<Box<dyn SerialPort>> {
    /// Open a serial port with default settings
    ///
    /// The session starts unidentified; call [`NanoVna::detect`] or use
    /// [`NanoVna::open_with_variant`].
    pub fn open(port: &str) -> Result<Self, VnaError> {
        Self::open_with_config(port, &SerialConfig::default(), ChannelConfig::default())
    }

    /// Open a serial port with custom settings
    pub fn open_with_config(
        port: &str,
        serial: &SerialConfig,
        channel: ChannelConfig,
    ) -> Result<Self, VnaError> {
        let handle = open_serial(port, serial)?;
        info!("Opened {}", port);
        let mut vna = Self::with_transport(port, handle, channel);
        vna.serial_config = Some(*serial);
        Ok(vna)
    }

    /// Open a serial port and assume `variant` instead of probing
    pub fn open_with_variant(port: &str, variant: HardwareVariant) -> Result<Self, VnaError> {
        let mut vna = Self::open(port)?;
        vna.force_variant(variant);
        Ok(vna)
    }
}

impl<T: Transport> NanoVna<T> {
    /// Wrap an already open transport
    ///
    /// `port` is only used for display.
    pub fn with_transport(port: impl Into<String>, transport: T, config: ChannelConfig) -> Self {
        Self {
            port: port.into(),
            serial_config: None,
            channel: CommandChannel::with_config(transport, config),
            state: SessionState::Unidentified,
            prober: VariantProber::new(),
        }
    }

    /// Set how long detection waits before probing
    pub fn set_probe_config(&mut self, config: ProbeConfig) {
        self.prober = VariantProber::with_config(config);
    }

    /// Probe the instrument and load the matching hardware entry
    ///
    /// Returns the version label of the probe rule that matched. On failure
    /// the session falls back to the unidentified defaults.
    pub fn detect(&mut self) -> Result<&'static str, VnaError> {
        let commands = self.hardware_info().command_set;
        match self.prober.detect(&mut self.channel, &commands) {
            Ok(detection) => {
                info!(
                    "{}: {} (version {})",
                    self.port, detection.variant, detection.version
                );
                self.state = SessionState::Detected {
                    variant: detection.variant,
                    version: detection.version,
                };
                Ok(detection.version)
            }
            Err(e) => {
                debug!("{}: detection failed: {}", self.port, e);
                self.state = SessionState::Unidentified;
                Err(e.into())
            }
        }
    }

    /// Assume `variant` without probing
    pub fn force_variant(&mut self, variant: HardwareVariant) {
        info!("{}: using {} without detection", self.port, variant);
        self.state = SessionState::Forced { variant };
    }

    /// Current identification state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Variant in effect (`Unknown` until identified)
    pub fn variant(&self) -> HardwareVariant {
        self.state.variant()
    }

    /// Version label (`v1`, `vh`, `v2`, ...)
    pub fn version(&self) -> &'static str {
        self.state.version()
    }

    /// Hardware entry of the variant in effect
    pub fn hardware_info(&self) -> &'static HardwareInfo {
        self.state.hardware_info()
    }

    /// Sweepable frequency range
    pub fn frequency_range(&self) -> FrequencyRange {
        self.hardware_info().frequency_range
    }

    /// Maximum number of points per sweep
    pub fn max_sweep_points(&self) -> u32 {
        self.hardware_info().max_sweep_points
    }

    /// Supported S-parameter ports
    pub fn supported_ports(&self) -> &'static [&'static str] {
        self.hardware_info().supported_ports
    }

    /// Feature flags
    pub fn capabilities(&self) -> HardwareCapabilities {
        self.hardware_info().capabilities
    }

    /// Check if an S-parameter port (e.g. `"S21"`) is supported
    pub fn is_port_supported(&self, port: &str) -> bool {
        self.hardware_info().is_port_supported(port)
    }

    /// Port name this session was opened on
    pub fn port(&self) -> &str {
        &self.port
    }

    /// Serial settings, if this session owns a serial port
    pub fn serial_config(&self) -> Option<&SerialConfig> {
        self.serial_config.as_ref()
    }

    /// One-line description of the port and its settings
    pub fn port_details(&self) -> String {
        match &self.serial_config {
            Some(config) => config.describe(&self.port),
            None => format!("Port: {} (config not available)", self.port),
        }
    }

    /// Whether a transport is attached
    pub fn is_connected(&self) -> bool {
        self.channel.is_connected()
    }

    /// Borrow the transport
    pub fn transport(&self) -> Option<&T> {
        self.channel.transport()
    }

    /// Mutably borrow the transport
    pub fn transport_mut(&mut self) -> Option<&mut T> {
        self.channel.transport_mut()
    }

    /// Swap in a different transport of the same type
    pub fn set_transport(&mut self, transport: T) -> Option<T> {
        self.channel.replace_transport(transport)
    }

    /// Rebuild the session around a wrapped transport
    ///
    /// Identification and settings carry over, e.g. to add a
    /// [`vna_detect::TracedTransport`] after opening.
    pub fn map_transport<U: Transport>(self, wrap: impl FnOnce(T) -> U) -> NanoVna<U> {
        let config = *self.channel.config();
        let channel = match self.channel.into_transport() {
            Some(inner) => CommandChannel::with_config(wrap(inner), config),
            None => CommandChannel::closed(config),
        };
        NanoVna {
            port: self.port,
            serial_config: self.serial_config,
            channel,
            state: self.state,
            prober: self.prober,
        }
    }

    /// Release the transport
    ///
    /// Later I/O fails with [`VnaError::NotConnected`].
    pub fn close(&mut self) -> Result<(), VnaError> {
        if self.channel.is_connected() {
            info!("Closing {}", self.port);
        }
        self.channel.close().map_err(|e| {
            warn!("{}: error while closing: {}", self.port, e);
            VnaError::from(e)
        })
    }
}
