//! Serial port scanner
//!
//! Lists the serial ports an instrument could be attached to. Ports whose USB
//! IDs belong to a known analyzer are listed first so that auto-connect
//! tries them before anything else.

use serialport::{available_ports, SerialPortType};
use tracing::{debug, info};

use crate::error::DetectError;
use crate::usb_ids;

/// A serial port that might have an analyzer behind it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialPortInfo {
    /// Port name (e.g., /dev/ttyACM0, COM3)
    pub port: String,
    /// USB vendor ID
    pub vid: Option<u16>,
    /// USB product ID
    pub pid: Option<u16>,
    /// USB serial number
    pub serial_number: Option<String>,
    /// USB product description
    pub product: Option<String>,
}

impl SerialPortInfo {
    fn from_serialport(name: String, port_type: &SerialPortType) -> Self {
        let mut info = Self {
            port: name,
            vid: None,
            pid: None,
            serial_number: None,
            product: None,
        };
        if let SerialPortType::UsbPort(usb) = port_type {
            info.vid = Some(usb.vid);
            info.pid = Some(usb.pid);
            info.serial_number = usb.serial_number.clone();
            info.product = usb.product.clone();
        }
        info
    }

    /// Whether the USB IDs belong to a known analyzer
    pub fn is_known_analyzer(&self) -> bool {
        match (self.vid, self.pid) {
            (Some(vid), Some(pid)) => usb_ids::is_known(vid, pid),
            _ => false,
        }
    }
}

/// Which ports the scanner ignores
#[derive(Debug, Clone, Default)]
pub struct ScannerConfig {
    /// Skip ports whose name contains any of these
    pub skip_patterns: Vec<String>,
}

/// Serial port scanner
pub struct PortScanner {
    config: ScannerConfig,
}

impl PortScanner {
    /// Scanner that ignores Bluetooth and debug ports
    pub fn new() -> Self {
        Self {
            config: ScannerConfig {
                skip_patterns: vec!["Bluetooth".to_string(), "debug".to_string()],
            },
        }
    }

    /// Create a scanner with custom configuration
    pub fn with_config(config: ScannerConfig) -> Self {
        Self { config }
    }

    /// Enumerate serial ports, known analyzers first
    pub fn enumerate_ports(&self) -> Result<Vec<SerialPortInfo>, DetectError> {
        let ports = available_ports().map_err(|e| DetectError::EnumerationFailed(e.to_string()))?;

        let result = self.rank(
            ports
                .into_iter()
                .map(|p| SerialPortInfo::from_serialport(p.port_name, &p.port_type)),
        );

        if result.is_empty() {
            info!("No serial ports found");
        } else {
            info!("Found {} serial port(s)", result.len());
            for port in &result {
                debug!(
                    "  {} - {}{}",
                    port.port,
                    port.product.as_deref().unwrap_or("Unknown"),
                    if port.is_known_analyzer() { " (analyzer)" } else { "" }
                );
            }
        }

        Ok(result)
    }

    /// Names of candidate ports, in the order auto-connect should try them
    pub fn candidate_ports(&self) -> Result<Vec<String>, DetectError> {
        Ok(self
            .enumerate_ports()?
            .into_iter()
            .map(|p| p.port)
            .collect())
    }

    /// Drop skipped ports and move known analyzers to the front
    fn rank(&self, ports: impl Iterator<Item = SerialPortInfo>) -> Vec<SerialPortInfo> {
        let mut result: Vec<_> = ports.filter(|p| !self.should_skip_port(p)).collect();
        // stable: keeps OS order within each group
        result.sort_by_key(|p| !p.is_known_analyzer());
        result
    }

    fn should_skip_port(&self, port: &SerialPortInfo) -> bool {
        self.config
            .skip_patterns
            .iter()
            .any(|pattern| port.port.contains(pattern.as_str()))
    }
}

impl Default for PortScanner {
    fn default() -> Self {
        Self::new()
    }
}
