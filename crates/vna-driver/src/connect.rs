//! Auto-connect
//!
//! Tries candidate ports in order: open, probe, keep the first one that
//! identifies as a known variant.

use serialport::SerialPort;
use tracing::{debug, info};
use vna_detect::{ChannelConfig, PortScanner, SerialConfig, Transport};

use crate::device::NanoVna;
use crate::error::VnaError;

/// Connect to the first port that answers as a known analyzer
///
/// `open` turns a port name into a session; ports that fail to open or to
/// identify are skipped and closed.
pub fn auto_connect<T, I, F>(ports: I, mut open: F) -> Result<NanoVna<T>, VnaError>
where
    T: Transport,
    I: IntoIterator,
    I::Item: AsRef<str>,
    F: FnMut(&str) -> Result<NanoVna<T>, VnaError>,
{
    for port in ports {
        let port = port.as_ref();

        let mut vna = match open(port) {
            Ok(vna) => vna,
            Err(e) => {
                debug!("Skipping {}: {}", port, e);
                continue;
            }
        };

        match vna.detect() {
            Ok(version) => {
                info!("Found {} on {} (version {})", vna.variant(), port, version);
                return Ok(vna);
            }
            Err(e) => {
                debug!("Nothing recognized on {}: {}", port, e);
                if let Err(e) = vna.close() {
                    debug!("Closing {} failed: {}", port, e);
                }
            }
        }
    }

    Err(VnaError::NoDeviceFound)
}

/// Scan serial ports with default settings and connect to the first analyzer
pub fn auto_detect() -> Result<NanoVna<Box<dyn SerialPort>>, VnaError> {
    auto_detect_with(
        &PortScanner::new(),
        &SerialConfig::default(),
        ChannelConfig::default(),
    )
}

/// Scan serial ports and connect to the first analyzer
pub fn auto_detect_with(
    scanner: &PortScanner,
    serial: &SerialConfig,
    channel: ChannelConfig,
) -> Result<NanoVna<Box<dyn SerialPort>>, VnaError> {
    let ports = scanner.candidate_ports()?;
    auto_connect(ports, |port| NanoVna::open_with_config(port, serial, channel))
}
