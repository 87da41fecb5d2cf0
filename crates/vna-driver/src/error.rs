//! Error types for the driver

use std::fmt;

use thiserror::Error;
use vna_detect::DetectError;

/// Sweep parameter checked against the hardware limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepParameter {
    /// Start frequency, bounded below
    Start,
    /// Stop frequency, bounded above
    Stop,
    /// Number of points, bounded above
    Points,
}

impl fmt::Display for SweepParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SweepParameter::Start => f.write_str("start frequency"),
            SweepParameter::Stop => f.write_str("stop frequency"),
            SweepParameter::Points => f.write_str("point count"),
        }
    }
}

/// Errors that can occur driving an analyzer
#[derive(Debug, Error)]
pub enum VnaError {
    /// No transport attached (never opened, or already closed)
    #[error("device not connected")]
    NotConnected,

    /// A sweep parameter violates the hardware limits
    #[error("{parameter} {value} is outside the hardware limit {limit}")]
    OutOfRange {
        /// Which bound was violated
        parameter: SweepParameter,
        /// Requested value
        value: u64,
        /// Limit of the active variant
        limit: u64,
    },

    /// A command and all of its fallbacks failed
    #[error("command {command:?} failed")]
    CommandFailed {
        /// Command line that was sent first
        command: String,
        /// Error of that first attempt
        #[source]
        source: DetectError,
    },

    /// The sweep produced no frequencies or no S11 samples
    #[error("no sweep data received")]
    NoData,

    /// The probe reply matched no known variant
    #[error("unrecognized device, probe reply {response:?}")]
    UnrecognizedDevice { response: String },

    /// Auto-connect found nothing on any port
    #[error("no NanoVNA found on any serial port")]
    NoDeviceFound,

    /// Transport level failure
    #[error(transparent)]
    Channel(DetectError),
}

impl From<DetectError> for VnaError {
    fn from(err: DetectError) -> Self {
        match err {
            DetectError::NotConnected => VnaError::NotConnected,
            DetectError::UnrecognizedDevice { response } => {
                VnaError::UnrecognizedDevice { response }
            }
            other => VnaError::Channel(other),
        }
    }
}
