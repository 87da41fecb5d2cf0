//! NanoVNA Protocol Library
//!
//! This crate provides the pure (I/O free) half of the NanoVNA driver:
//!
//! - **Variants**: the closed set of hardware models in the NanoVNA family
//! - **Registry**: per-variant frequency range, point limit, ports, command
//!   dialect and feature flags ([`models`])
//! - **Commands**: typed formatting of the text commands ([`command`])
//! - **Responses**: line-oriented parsing of sweep and info responses
//!   ([`response`])
//! - **Identification**: the heuristics that classify a probe response
//!   ([`identify`])
//!
//! The instruments speak a shell-like text protocol: every command is a line
//! terminated by `\r`, the firmware echoes it back, prints its output one
//! value per line and finishes with a prompt (`ch> ` or `2> `).
//!
//! # Example
//!
//! ```rust
//! use vna_protocol::{identify, HardwareVariant, VnaDatabase};
//!
//! let id = identify::classify("ch> ", "LiteVNA 64 board").unwrap();
//! assert_eq!(id.variant, HardwareVariant::LiteVna);
//!
//! let info = VnaDatabase::lookup(id.variant);
//! assert!(info.is_port_supported("S21"));
//! ```

pub mod command;
pub mod error;
pub mod identify;
pub mod models;
pub mod response;

use std::fmt;
use std::str::FromStr;

pub use command::{CommandSet, SweepStep};
pub use error::ParseError;
pub use identify::Identification;
pub use models::{FrequencyRange, HardwareCapabilities, HardwareInfo, VnaDatabase};
pub use response::{DeviceInfo, SweepData};

/// Complex sample type used for S-parameters
pub use num_complex::Complex64;

/// Identifies which member of the NanoVNA family is attached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HardwareVariant {
    /// Not (yet) identified; conservative defaults apply
    #[default]
    Unknown,
    /// Original NanoVNA v1
    V1,
    /// NanoVNA-H
    Vh,
    /// NanoVNA v2 (S-A-A-2 based)
    V2,
    /// NanoVNA v2 Plus
    V2Plus,
    /// NanoVNA v2 Plus4
    V2Plus4,
    /// Standalone SAA2
    Saa2,
    /// TinySA spectrum analyzer
    TinySa,
    /// LiteVNA
    LiteVna,
}

impl HardwareVariant {
    /// Every variant, in declaration order
    pub const ALL: [HardwareVariant; 9] = [
        HardwareVariant::Unknown,
        HardwareVariant::V1,
        HardwareVariant::Vh,
        HardwareVariant::V2,
        HardwareVariant::V2Plus,
        HardwareVariant::V2Plus4,
        HardwareVariant::Saa2,
        HardwareVariant::TinySa,
        HardwareVariant::LiteVna,
    ];

    /// Returns a human-readable name for the variant
    pub fn name(&self) -> &'static str {
        match self {
            HardwareVariant::Unknown => "Unknown",
            HardwareVariant::V1 => "NanoVNA v1",
            HardwareVariant::Vh => "NanoVNA-H",
            HardwareVariant::V2 => "NanoVNA v2",
            HardwareVariant::V2Plus => "NanoVNA v2 Plus",
            HardwareVariant::V2Plus4 => "NanoVNA v2 Plus4",
            HardwareVariant::Saa2 => "SAA2",
            HardwareVariant::TinySa => "TinySA",
            HardwareVariant::LiteVna => "LiteVNA",
        }
    }

    /// Short version label reported for a session running this variant
    ///
    /// The whole V2 family shares the `v2` label since it shares one dialect.
    pub fn version_label(&self) -> &'static str {
        match self {
            HardwareVariant::V1 => "v1",
            HardwareVariant::Vh => "vh",
            HardwareVariant::V2
            | HardwareVariant::V2Plus
            | HardwareVariant::V2Plus4
            | HardwareVariant::Saa2 => "v2",
            HardwareVariant::TinySa => "tinysa",
            HardwareVariant::LiteVna => "litevna",
            HardwareVariant::Unknown => "unknown",
        }
    }

    /// Whether this variant speaks the V2 dialect (`2>` prompt, `freq` query)
    pub fn is_v2_family(&self) -> bool {
        matches!(
            self,
            HardwareVariant::V2
                | HardwareVariant::V2Plus
                | HardwareVariant::V2Plus4
                | HardwareVariant::Saa2
        )
    }
}

impl fmt::Display for HardwareVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HardwareVariant {
    type Err = ParseError;

    /// Accepts version labels (`v1`, `vh`, `tinysa`, ...) and compact names
    /// (`v2plus`, `v2plus4`, `saa2`), case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect();

        match key.as_str() {
            "unknown" => Ok(HardwareVariant::Unknown),
            "v1" => Ok(HardwareVariant::V1),
            "vh" | "h" => Ok(HardwareVariant::Vh),
            "v2" => Ok(HardwareVariant::V2),
            "v2plus" => Ok(HardwareVariant::V2Plus),
            "v2plus4" => Ok(HardwareVariant::V2Plus4),
            "saa2" => Ok(HardwareVariant::Saa2),
            "tinysa" => Ok(HardwareVariant::TinySa),
            "litevna" => Ok(HardwareVariant::LiteVna),
            _ => Err(ParseError::UnknownVariant(s.to_string())),
        }
    }
}
