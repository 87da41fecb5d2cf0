//! Error types for transport and detection

use std::io;

use thiserror::Error;

/// Errors that can occur talking to or identifying an instrument
#[derive(Debug, Error)]
pub enum DetectError {
    /// No transport is attached (never opened, or already closed)
    #[error("device not open")]
    NotConnected,

    /// The probe reply matched no known variant
    #[error("unrecognized response: {response:?}")]
    UnrecognizedDevice { response: String },

    /// Failed to enumerate serial ports
    #[error("failed to enumerate ports: {0}")]
    EnumerationFailed(String),

    /// Failed to open serial port
    #[error("failed to open port {port}: {reason}")]
    OpenFailed { port: String, reason: String },

    /// I/O error on the transport
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl DetectError {
    /// Whether this is a read timeout with nothing received
    pub fn is_timeout(&self) -> bool {
        matches!(self, DetectError::Io(e) if e.kind() == io::ErrorKind::TimedOut)
    }
}
