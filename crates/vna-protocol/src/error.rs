//! Error types for NanoVNA protocol parsing

use thiserror::Error;

/// Errors that can occur while parsing protocol text
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Variant name not recognized
    #[error("unknown hardware variant: {0}")]
    UnknownVariant(String),
}
