//! Hardware capability database
//!
//! This module contains the frequency range, point limit, measurement ports,
//! command dialect and feature flags of every known variant.

use crate::command::{CommandSet, CH_DIALECT, V2_DIALECT};
use crate::HardwareVariant;

/// Frequency range supported by a variant
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrequencyRange {
    /// Lowest sweepable frequency in Hz
    pub min_hz: f64,
    /// Highest sweepable frequency in Hz
    pub max_hz: f64,
}

impl FrequencyRange {
    /// Check if a frequency lies inside the range (inclusive)
    pub fn contains(&self, hz: f64) -> bool {
        hz >= self.min_hz && hz <= self.max_hz
    }
}

/// Feature flags of a variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HardwareCapabilities {
    /// Measures S21 transmission
    pub has_s21: bool,
    /// Time domain (TDR) processing
    pub has_time_domain: bool,
    /// Calibration slots
    pub has_calibration: bool,
    /// More than two measurement ports
    pub has_multiple_ports: bool,
    /// Signal generator output
    pub has_generator: bool,
    /// Spectrum analyzer mode
    pub has_spectrum_mode: bool,
}

/// Everything the driver knows about one variant
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct HardwareInfo {
    /// Variant this entry describes
    pub variant: HardwareVariant,
    /// Sweepable frequency range
    pub frequency_range: FrequencyRange,
    /// Maximum number of points in one sweep
    pub max_sweep_points: u32,
    /// Supported S-parameter ports, in display order
    pub supported_ports: &'static [&'static str],
    /// Command dialect
    pub command_set: CommandSet,
    /// Feature flags
    pub capabilities: HardwareCapabilities,
}

impl HardwareInfo {
    /// Check if a specific S-parameter port (e.g. `"S21"`) is supported
    pub fn is_port_supported(&self, port: &str) -> bool {
        self.supported_ports.iter().any(|p| *p == port)
    }
}

/// Database of known variants
pub struct VnaDatabase;

impl VnaDatabase {
    /// Look up the entry for a variant
    ///
    /// Total over [`HardwareVariant`]; `Unknown` yields the conservative
    /// defaults.
    pub fn lookup(variant: HardwareVariant) -> &'static HardwareInfo {
        HARDWARE
            .iter()
            .find(|info| info.variant == variant)
            .unwrap_or(&HARDWARE[0])
    }

    /// Get all entries, `Unknown` first
    pub fn all() -> impl Iterator<Item = &'static HardwareInfo> {
        HARDWARE.iter()
    }
}

// Port sets
static PORTS_S11: &[&str] = &["S11"];
static PORTS_TWO: &[&str] = &["S11", "S21"];
static PORTS_FOUR: &[&str] = &["S11", "S21", "S12", "S22"];

const MHZ: f64 = 1_000_000.0;
const GHZ: f64 = 1_000_000_000.0;

// Full feature set of the V2 family
const V2_CAPABILITIES: HardwareCapabilities = HardwareCapabilities {
    has_s21: true,
    has_time_domain: true,
    has_calibration: true,
    has_multiple_ports: false,
    has_generator: true,
    has_spectrum_mode: true,
};

// Index 0 must stay the Unknown entry (lookup fallback)
static HARDWARE: &[HardwareInfo] = &[
    HardwareInfo {
        variant: HardwareVariant::Unknown,
        frequency_range: FrequencyRange {
            min_hz: 50_000.0,
            max_hz: 900.0 * MHZ,
        },
        max_sweep_points: 101,
        supported_ports: PORTS_S11,
        command_set: CH_DIALECT,
        capabilities: HardwareCapabilities {
            has_s21: false,
            has_time_domain: false,
            has_calibration: true,
            has_multiple_ports: false,
            has_generator: false,
            has_spectrum_mode: false,
        },
    },
    HardwareInfo {
        variant: HardwareVariant::V1,
        frequency_range: FrequencyRange {
            min_hz: 50_000.0,
            max_hz: 900.0 * MHZ,
        },
        max_sweep_points: 101,
        supported_ports: PORTS_TWO,
        command_set: CH_DIALECT,
        capabilities: HardwareCapabilities {
            has_s21: true,
            has_time_domain: false,
            has_calibration: true,
            has_multiple_ports: false,
            has_generator: false,
            has_spectrum_mode: false,
        },
    },
    HardwareInfo {
        variant: HardwareVariant::Vh,
        frequency_range: FrequencyRange {
            min_hz: 50_000.0,
            max_hz: 1.5 * GHZ,
        },
        max_sweep_points: 201,
        supported_ports: PORTS_TWO,
        command_set: CH_DIALECT,
        capabilities: HardwareCapabilities {
            has_s21: true,
            has_time_domain: true,
            has_calibration: true,
            has_multiple_ports: false,
            has_generator: true,
            has_spectrum_mode: false,
        },
    },
    HardwareInfo {
        variant: HardwareVariant::V2,
        frequency_range: FrequencyRange {
            min_hz: 50_000.0,
            max_hz: 3.0 * GHZ,
        },
        max_sweep_points: 4000,
        supported_ports: PORTS_TWO,
        command_set: V2_DIALECT,
        capabilities: V2_CAPABILITIES,
    },
    HardwareInfo {
        variant: HardwareVariant::V2Plus,
        frequency_range: FrequencyRange {
            min_hz: 50_000.0,
            max_hz: 6.0 * GHZ,
        },
        max_sweep_points: 4000,
        supported_ports: PORTS_TWO,
        command_set: V2_DIALECT,
        capabilities: V2_CAPABILITIES,
    },
    HardwareInfo {
        variant: HardwareVariant::V2Plus4,
        frequency_range: FrequencyRange {
            min_hz: 50_000.0,
            max_hz: 6.0 * GHZ,
        },
        max_sweep_points: 4000,
        supported_ports: PORTS_FOUR,
        command_set: V2_DIALECT,
        capabilities: HardwareCapabilities {
            has_multiple_ports: true,
            ..V2_CAPABILITIES
        },
    },
    HardwareInfo {
        variant: HardwareVariant::Saa2,
        frequency_range: FrequencyRange {
            min_hz: 50_000.0,
            max_hz: 3.0 * GHZ,
        },
        max_sweep_points: 4000,
        supported_ports: PORTS_TWO,
        command_set: V2_DIALECT,
        capabilities: V2_CAPABILITIES,
    },
    HardwareInfo {
        variant: HardwareVariant::TinySa,
        frequency_range: FrequencyRange {
            min_hz: 100_000.0,
            max_hz: 960.0 * MHZ,
        },
        max_sweep_points: 500,
        supported_ports: PORTS_S11,
        command_set: CH_DIALECT,
        capabilities: HardwareCapabilities {
            has_s21: false,
            has_time_domain: false,
            has_calibration: true,
            has_multiple_ports: false,
            has_generator: true,
            has_spectrum_mode: true,
        },
    },
    HardwareInfo {
        variant: HardwareVariant::LiteVna,
        frequency_range: FrequencyRange {
            min_hz: 50_000.0,
            max_hz: 6.3 * GHZ,
        },
        max_sweep_points: 1024,
        supported_ports: PORTS_TWO,
        command_set: CH_DIALECT,
        capabilities: HardwareCapabilities {
            has_s21: true,
            has_time_domain: true,
            has_calibration: true,
            has_multiple_ports: false,
            has_generator: true,
            has_spectrum_mode: false,
        },
    },
];
