//! Response parsing
//!
//! Firmware output is free-form text: the echoed command, one value per line,
//! and the prompt. Parsing is line oriented and lenient; lines that do not
//! parse are skipped rather than reported, since the instruments interleave
//! diagnostics with data.

use num_complex::Complex64;
use tracing::trace;

use crate::HardwareVariant;

/// Marker the firmware prints in place of output it could not produce
const ERROR_MARKER: &str = "?";

/// Zero placeholder used for missing samples
pub const ZERO: Complex64 = Complex64::new(0.0, 0.0);

/// Result of one sweep
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SweepData {
    /// Swept frequencies in Hz
    pub frequencies: Vec<f64>,
    /// Reflection samples
    pub s11: Vec<Complex64>,
    /// Transmission samples (zeros when not measured)
    pub s21: Vec<Complex64>,
}

impl SweepData {
    /// Number of points
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    /// Whether the sweep holds no points
    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Extend S21 with zero samples up to the length of S11
    pub fn pad_s21(&mut self) {
        if self.s21.len() < self.s11.len() {
            self.s21.resize(self.s11.len(), ZERO);
        }
    }

    /// Cut frequencies and S11 to their common length; S21 is cut or
    /// zero-padded to match
    pub fn align(&mut self) {
        let len = self.frequencies.len().min(self.s11.len());
        self.frequencies.truncate(len);
        self.s11.truncate(len);
        self.s21.resize(len, ZERO);
    }
}

/// Identification fields reported by `info`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceInfo {
    /// Model / board description
    pub model: String,
    /// Firmware version
    pub firmware: String,
    /// Serial number, if printed
    pub serial_number: String,
}

/// Content lines of a response
///
/// Lines are trimmed; blank lines, the echo of `command` and the prompt line
/// are dropped.
pub fn content_lines<'a>(
    response: &'a str,
    command: &'a str,
    prompt: &'a str,
) -> impl Iterator<Item = &'a str> + 'a {
    response
        .split('\n')
        .map(str::trim)
        .filter(move |line| !line.is_empty() && *line != command && !line.contains(prompt))
}

/// Parse the reply to the frequency query, one value per line
pub fn parse_frequencies(response: &str, command: &str, prompt: &str) -> Vec<f64> {
    content_lines(response, command, prompt)
        .filter(|line| !line.contains(ERROR_MARKER))
        .filter_map(|line| {
            let value = line.parse::<f64>().ok();
            if value.is_none() {
                trace!("Skipping non-numeric frequency line {:?}", line);
            }
            value
        })
        .collect()
}

/// Parse the reply to `data <port>`, one `<re> <im>` pair per line
///
/// Lines starting with `keyword` (the echoed data command) are skipped.
pub fn parse_samples(
    response: &str,
    command: &str,
    keyword: &str,
    prompt: &str,
) -> Vec<Complex64> {
    content_lines(response, command, prompt)
        .filter(|line| !line.contains(ERROR_MARKER) && !line.starts_with(keyword))
        .filter_map(|line| {
            let sample = parse_sample(line);
            if sample.is_none() {
                trace!("Skipping malformed sample line {:?}", line);
            }
            sample
        })
        .collect()
}

fn parse_sample(line: &str) -> Option<Complex64> {
    let mut fields = line.split_whitespace();
    let re = fields.next()?.parse::<f64>().ok()?;
    let im = fields.next()?.parse::<f64>().ok()?;
    Some(Complex64::new(re, im))
}

/// First content line of a response, e.g. the reply to `version`
pub fn first_line(response: &str, command: &str, prompt: &str) -> Option<String> {
    content_lines(response, command, prompt)
        .next()
        .map(str::to_string)
}

/// Extract model, firmware and serial number from the reply to `info`
pub fn parse_device_info(
    response: &str,
    command: &str,
    prompt: &str,
    variant: HardwareVariant,
) -> DeviceInfo {
    let mut model: Option<String> = None;
    let mut firmware = String::new();
    let mut serial_number = String::new();

    for line in content_lines(response, command, prompt) {
        let lower = line.to_lowercase();

        if variant.is_v2_family() {
            if lower.contains("nanovna") || lower.contains("saa2") {
                model = Some(line.to_string());
            }
            if lower.contains("firmware") || lower.contains("version") {
                if let Some((_, value)) = line.split_once(':') {
                    firmware = value.trim().to_string();
                }
            }
            continue;
        }

        if model.is_none() {
            model = Some(line.to_string());
        }

        if lower.starts_with("serial") {
            serial_number = line
                .strip_prefix("Serial:")
                .unwrap_or(line)
                .trim()
                .to_string();
        }

        if firmware.is_empty() {
            if let Some(token) = line
                .split_whitespace()
                .find(|t| t.starts_with('v') && t.len() > 1)
            {
                firmware = token.to_string();
            }
        }
    }

    let model = match model {
        Some(m) if !m.is_empty() && m != variant.name() => m,
        _ => format!("{} (detected)", variant.name()),
    };

    DeviceInfo {
        model,
        firmware,
        serial_number,
    }
}
