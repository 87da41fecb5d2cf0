//! Synthetic measurement model
//!
//! The simulated device under test is a 25 Ω resistor behind a short length
//! of cable, seen on port 1, with an attenuating through path to port 2.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use vna_protocol::Complex64;

/// Load reflection coefficient of 25 Ω in a 50 Ω system
const LOAD_GAMMA: f64 = -1.0 / 3.0;

/// One-way electrical delay of the cable, seconds
const CABLE_DELAY_S: f64 = 1.0e-9;

/// Linear gain of the through path
const THROUGH_GAIN: f64 = 0.7;

/// Frequencies and samples reported by the virtual analyzer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    /// Swept frequencies in Hz
    pub frequencies: Vec<f64>,
    /// Port 1 reflection
    pub s11: Vec<Complex64>,
    /// Port 1 to port 2 transmission
    pub s21: Vec<Complex64>,
}

impl Trace {
    /// Evenly spaced sweep with modeled samples
    pub fn linear(start_hz: u64, stop_hz: u64, points: u32) -> Self {
        let frequencies = linspace(start_hz as f64, stop_hz as f64, points as usize);
        let s11 = frequencies.iter().map(|&f| reflection(f)).collect();
        let s21 = frequencies.iter().map(|&f| transmission(f)).collect();
        Self {
            frequencies,
            s11,
            s21,
        }
    }
}

fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

fn reflection(hz: f64) -> Complex64 {
    // round trip through the cable
    Complex64::from_polar(LOAD_GAMMA.abs(), PI - 4.0 * PI * hz * CABLE_DELAY_S)
}

fn transmission(hz: f64) -> Complex64 {
    Complex64::from_polar(THROUGH_GAIN, -2.0 * PI * hz * CABLE_DELAY_S)
}
