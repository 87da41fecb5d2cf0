//! Duplex transport
//!
//! The driver talks to any blocking byte stream that can also drop unread
//! input. Read timeouts must surface as [`io::ErrorKind::TimedOut`]; the
//! command channel relies on that to tell "no more output" from failures.

use std::io::{self, Read, Write};
use std::time::Duration;

use serialport::{ClearBuffer, DataBits, Parity, SerialPort, StopBits};
use tracing::{debug, trace};

use crate::error::DetectError;

/// A blocking duplex byte channel to an instrument
pub trait Transport: Read + Write + Send {
    /// Drop any bytes received but not yet read
    fn discard_input(&mut self) -> io::Result<()>;
}

impl Transport for Box<dyn SerialPort> {
    fn discard_input(&mut self) -> io::Result<()> {
        self.clear(ClearBuffer::Input).map_err(io::Error::from)
    }
}

/// Serial line settings used when opening a port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerialConfig {
    /// Baud rate (USB CDC devices ignore it, but the OS wants one)
    pub baud_rate: u32,
    /// Blocking read timeout
    pub read_timeout: Duration,
    /// Data bits
    pub data_bits: DataBits,
    /// Parity
    pub parity: Parity,
    /// Stop bits
    pub stop_bits: StopBits,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baud_rate: 9600,
            read_timeout: Duration::from_secs(5),
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

impl SerialConfig {
    /// One-line description of the settings for a port
    pub fn describe(&self, port: &str) -> String {
        format!(
            "Port: {}, Baud: {}, ReadTimeout: {:?}, Size: {:?}, Parity: {:?}, StopBits: {:?}",
            port, self.baud_rate, self.read_timeout, self.data_bits, self.parity, self.stop_bits
        )
    }
}

/// Open a serial port with the given settings
pub fn open_serial(port: &str, config: &SerialConfig) -> Result<Box<dyn SerialPort>, DetectError> {
    debug!("Opening {}", config.describe(port));

    serialport::new(port, config.baud_rate)
        .data_bits(config.data_bits)
        .parity(config.parity)
        .stop_bits(config.stop_bits)
        .timeout(config.read_timeout)
        .open()
        .map_err(|e| DetectError::OpenFailed {
            port: port.to_string(),
            reason: e.to_string(),
        })
}

/// Transport wrapper that traces every byte in both directions
pub struct TracedTransport<T> {
    inner: T,
    label: String,
}

impl<T: Transport> TracedTransport<T> {
    /// Wrap a transport; `label` prefixes the trace lines
    pub fn new(inner: T, label: impl Into<String>) -> Self {
        Self {
            inner,
            label: label.into(),
        }
    }
}

impl<T: Transport> Read for TracedTransport<T> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let result = self.inner.read(buf);
        match &result {
            Ok(n) => trace!("{} <- {:?}", self.label, String::from_utf8_lossy(&buf[..*n])),
            Err(e) => trace!("{} <- error: {}", self.label, e),
        }
        result
    }
}

impl<T: Transport> Write for TracedTransport<T> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        trace!("{} -> {:?}", self.label, String::from_utf8_lossy(&buf[..n]));
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl<T: Transport> Transport for TracedTransport<T> {
    fn discard_input(&mut self) -> io::Result<()> {
        trace!("{} discard input", self.label);
        self.inner.discard_input()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serial_config_default() {
        let config = SerialConfig::default();
        assert_eq!(config.baud_rate, 9600);
        assert_eq!(config.read_timeout, Duration::from_secs(5));
        assert_eq!(config.data_bits, DataBits::Eight);
        assert_eq!(config.parity, Parity::None);
        assert_eq!(config.stop_bits, StopBits::One);
    }

    #[test]
    fn test_describe_names_port_and_baud() {
        let details = SerialConfig::default().describe("COM3");
        assert!(details.starts_with("Port: COM3, Baud: 9600"));
        assert!(details.contains("5s"));
    }

    #[test]
    fn test_open_missing_port_fails() {
        let err = open_serial("/dev/does-not-exist-vna", &SerialConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            DetectError::OpenFailed { ref port, .. } if port == "/dev/does-not-exist-vna"
        ));
    }
}
