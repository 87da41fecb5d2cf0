//! NanoVNA Driver
//!
//! This crate drives NanoVNA-family vector network analyzers over their text
//! shell. A [`NanoVna`] session identifies the attached variant, then checks
//! every request against that variant's limits and speaks its dialect.
//!
//! # Session lifecycle
//!
//! - **Open**: a serial port (or any [`Transport`]) is attached; the session
//!   starts with the conservative `Unknown` limits
//! - **Identify**: [`NanoVna::detect`] probes the instrument, or
//!   [`NanoVna::force_variant`] skips probing
//! - **Measure**: [`NanoVna::configure`], [`NanoVna::run_sweep`],
//!   [`NanoVna::get_info`]
//! - **Close**: the transport is dropped; later I/O fails with
//!   [`VnaError::NotConnected`]
//!
//! # Example
//!
//! ```rust,no_run
//! use vna_driver::NanoVna;
//!
//! let mut vna = NanoVna::open("/dev/ttyACM0").unwrap();
//! vna.detect().unwrap();
//!
//! vna.configure(1_000_000, 900_000_000, 101).unwrap();
//! let sweep = vna.run_sweep().unwrap();
//! println!("{} points from {}", sweep.len(), vna.variant());
//! ```

pub mod calibration;
pub mod connect;
pub mod device;
pub mod error;
pub mod info;
pub mod state;
pub mod sweep;

pub use calibration::CalibrationData;
pub use connect::{auto_connect, auto_detect, auto_detect_with};
pub use device::NanoVna;
pub use error::{SweepParameter, VnaError};
pub use state::SessionState;

pub use vna_detect::{ChannelConfig, SerialConfig, Transport};
pub use vna_protocol::{
    DeviceInfo, FrequencyRange, HardwareCapabilities, HardwareInfo, HardwareVariant, SweepData,
};
