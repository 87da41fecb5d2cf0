//! Variant identification heuristics
//!
//! Identification looks at two pieces of text:
//!
//! - the raw bytes the firmware prints in reply to a bare `\r` (the probe),
//!   which reveal the prompt style of the dialect
//! - the output of `info`, which names the board and separates variants
//!   sharing a dialect
//!
//! The rules are ordered. The probe prefix picks the base variant, then
//! case-insensitive substrings in the info text refine it. More specific
//! substrings are tested first (`plus4` before `plus`).

use crate::HardwareVariant;

/// Result of a successful classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identification {
    /// Resolved variant
    pub variant: HardwareVariant,
    /// Label of the base rule that matched (`v1`, `vh` or `v2`)
    pub version: &'static str,
}

/// Probe reply of the original firmware: prompt right away
const PROMPT_V1: &str = "ch> ";

/// Probe replies of NanoVNA-H firmware: blank line (optionally `?`) then prompt
const PROMPTS_VH: [&str; 2] = ["\r\nch> ", "\r\n?\r\nch> "];

/// V2 firmware prints `2>` style prompts
const PROMPT_V2: &str = "2>";

/// Classify a probe reply, refined by the `info` text
///
/// Returns `None` when no rule matches.
pub fn classify(probe: &str, info: &str) -> Option<Identification> {
    let info = info.to_lowercase();

    if probe.starts_with(PROMPT_V1) {
        let variant = if info.contains("tinysa") {
            HardwareVariant::TinySa
        } else if info.contains("litevna") {
            HardwareVariant::LiteVna
        } else {
            HardwareVariant::V1
        };
        return Some(Identification {
            variant,
            version: "v1",
        });
    }

    if PROMPTS_VH.iter().any(|p| probe.starts_with(p)) {
        // Some v1 boards run firmware with the -H prompt style
        let variant = if info.contains("nanovna v1") {
            HardwareVariant::V1
        } else {
            HardwareVariant::Vh
        };
        return Some(Identification {
            variant,
            version: "vh",
        });
    }

    if probe.starts_with('2') || probe.contains(PROMPT_V2) {
        let variant = if info.contains("plus4") {
            HardwareVariant::V2Plus4
        } else if info.contains("plus") {
            HardwareVariant::V2Plus
        } else if info.contains("saa2") {
            HardwareVariant::Saa2
        } else {
            HardwareVariant::V2
        };
        return Some(Identification {
            variant,
            version: "v2",
        });
    }

    None
}
