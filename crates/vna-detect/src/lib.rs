//! NanoVNA Serial Transport and Detection Library
//!
//! This crate owns the I/O edge of the driver:
//!
//! - [`transport`]: the duplex byte channel abstraction and the serial opener
//! - [`channel`]: the synchronous command/response exchange
//! - [`probe`]: variant detection over an open channel
//! - [`scanner`]: serial port enumeration
//!
//! # Example
//!
//! ```rust,no_run
//! use vna_detect::{open_serial, CommandChannel, SerialConfig, VariantProber};
//! use vna_protocol::{HardwareVariant, VnaDatabase};
//!
//! let port = open_serial("/dev/ttyACM0", &SerialConfig::default()).unwrap();
//! let mut channel = CommandChannel::new(port);
//!
//! let defaults = VnaDatabase::lookup(HardwareVariant::Unknown);
//! let detection = VariantProber::new()
//!     .detect(&mut channel, &defaults.command_set)
//!     .unwrap();
//! println!("Found {}", detection.variant);
//! ```

pub mod channel;
pub mod error;
pub mod probe;
pub mod scanner;
pub mod transport;
pub mod usb_ids;

pub use channel::{ChannelConfig, CommandChannel};
pub use error::DetectError;
pub use probe::{probe_port, Detection, ProbeConfig, VariantProber};
pub use scanner::{PortScanner, ScannerConfig, SerialPortInfo};
pub use transport::{open_serial, SerialConfig, TracedTransport, Transport};
