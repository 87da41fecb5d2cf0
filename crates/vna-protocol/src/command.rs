//! Command dialects
//!
//! Every NanoVNA-family firmware exposes the same small shell, but the
//! spelling of a few commands and the prompt differ between variants.
//! A [`CommandSet`] captures one dialect and formats the concrete command
//! lines sent over the wire (without the `\r` terminator).
//!
//! # Common Commands
//! - `sweep <start> <stop> <points>` - configure the sweep
//! - `frequencies` / `freq` - list the swept frequencies, one per line
//! - `data <port>` - list complex samples (`<re> <im>` per line)
//! - `info` / `version` - identification text
//! - `save <slot>` / `recall <slot>` - calibration slots

use std::fmt;

/// Terminator appended to every command line
pub const TERMINATOR: &str = "\r";

/// Port index of the reflection (S11) channel in `data <port>`
pub const PORT_S11: u8 = 0;

/// Port index of the transmission (S21) channel in `data <port>`
pub const PORT_S21: u8 = 1;

/// Command vocabulary and prompt of one firmware dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CommandSet {
    /// Sweep configuration keyword (`sweep`)
    pub sweep: &'static str,
    /// Frequency list query (`frequencies` or `freq`)
    pub frequencies: &'static str,
    /// Sample data keyword (`data`)
    pub data: &'static str,
    /// Identification query (`info`)
    pub info: &'static str,
    /// Firmware version query (`version`)
    pub version: &'static str,
    /// Calibration save keyword (`save`)
    pub calibration_save: &'static str,
    /// Calibration recall keyword (`recall`)
    pub calibration_load: &'static str,
    /// Prompt printed when the firmware is ready for the next command
    pub prompt: &'static str,
    /// Keyword prefixed to the one-parameter sweep fallbacks (`sweep start ..`),
    /// or `None` when the bare forms (`start ..`) are used
    pub scoped_sweep_prefix: Option<&'static str>,
}

/// Dialect shared by the original NanoVNA, NanoVNA-H, TinySA and LiteVNA
pub const CH_DIALECT: CommandSet = CommandSet {
    sweep: "sweep",
    frequencies: "frequencies",
    data: "data",
    info: "info",
    version: "version",
    calibration_save: "save",
    calibration_load: "recall",
    prompt: "ch>",
    scoped_sweep_prefix: None,
};

/// Dialect of the V2 family
pub const V2_DIALECT: CommandSet = CommandSet {
    frequencies: "freq",
    prompt: "2>",
    scoped_sweep_prefix: Some("sweep"),
    ..CH_DIALECT
};

/// One parameter of a sweep, set on its own by the fallback commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepStep {
    /// Start frequency in Hz
    Start(u64),
    /// Stop frequency in Hz
    Stop(u64),
    /// Number of points
    Points(u32),
}

impl fmt::Display for SweepStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SweepStep::Start(hz) => write!(f, "start {}", hz),
            SweepStep::Stop(hz) => write!(f, "stop {}", hz),
            SweepStep::Points(n) => write!(f, "points {}", n),
        }
    }
}

impl CommandSet {
    /// `sweep <start> <stop> <points>`
    pub fn sweep_command(&self, start_hz: u64, stop_hz: u64, points: u32) -> String {
        format!("{} {} {} {}", self.sweep, start_hz, stop_hz, points)
    }

    /// `data <port>`
    pub fn data_command(&self, port: u8) -> String {
        format!("{} {}", self.data, port)
    }

    /// `save <slot>`
    pub fn calibration_save_command(&self, slot: u8) -> String {
        format!("{} {}", self.calibration_save, slot)
    }

    /// `recall <slot>`
    pub fn calibration_load_command(&self, slot: u8) -> String {
        format!("{} {}", self.calibration_load, slot)
    }

    /// One-parameter form of a sweep setting in this dialect
    pub fn scoped_sweep_command(&self, step: SweepStep) -> String {
        match self.scoped_sweep_prefix {
            Some(prefix) => format!("{} {}", prefix, step),
            None => step.to_string(),
        }
    }

    /// Fallback commands tried in order when the combined sweep command fails
    pub fn sweep_fallbacks(&self, start_hz: u64, stop_hz: u64, points: u32) -> [String; 3] {
        [
            self.scoped_sweep_command(SweepStep::Start(start_hz)),
            self.scoped_sweep_command(SweepStep::Stop(stop_hz)),
            self.scoped_sweep_command(SweepStep::Points(points)),
        ]
    }

    /// Full wire bytes for a command line
    pub fn encode(command: &str) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(command.len() + TERMINATOR.len());
        bytes.extend_from_slice(command.as_bytes());
        bytes.extend_from_slice(TERMINATOR.as_bytes());
        bytes
    }
}
