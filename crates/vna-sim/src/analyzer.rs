//! Virtual analyzer simulation
//!
//! Provides a simulated instrument that answers the text shell of a chosen
//! variant: it echoes each command line, prints the reply body and finishes
//! with the variant's prompt, the same framing the firmware uses.

use std::collections::VecDeque;
use std::io::{self, Read, Write};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use vna_detect::Transport;
use vna_protocol::{CommandSet, Complex64, HardwareVariant, VnaDatabase};

use crate::model::Trace;

/// Configuration for creating a virtual analyzer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VirtualVnaConfig {
    /// Variant whose dialect and limits are simulated
    pub variant: HardwareVariant,
    /// Reply to a bare terminator
    pub banner: String,
    /// Lines printed by `info`
    pub info: Vec<String>,
    /// Line printed by `version`
    pub version: String,
    /// Initial sweep start in Hz
    pub start_hz: u64,
    /// Initial sweep stop in Hz
    pub stop_hz: u64,
    /// Initial number of points
    pub points: u32,
    /// Command prefixes that get no reply at all
    pub silent: Vec<String>,
    /// Largest number of bytes handed out by one read
    pub max_chunk: usize,
}

impl Default for VirtualVnaConfig {
    fn default() -> Self {
        Self::for_variant(HardwareVariant::Vh)
    }
}

impl VirtualVnaConfig {
    /// Typical banner and identification text of a variant
    pub fn for_variant(variant: HardwareVariant) -> Self {
        let (banner, info, version): (&str, &[&str], &str) = match variant {
            HardwareVariant::V1 => ("ch> ", &["NanoVNA v1", "2016-2019 Copyright @edy555"], "0.2.3"),
            HardwareVariant::Vh => (
                "\r\nch> ",
                &["NanoVNA-H 4 v1.2.00", "Serial: 4E4F0C2D", "Platform: STM32F303"],
                "1.2.00",
            ),
            HardwareVariant::V2 => ("2> ", &["Board: NanoVNA V2_2", "Firmware: 20201013"], "1.0"),
            HardwareVariant::V2Plus => (
                "2> ",
                &["Board: NanoVNA V2 Plus", "Firmware: 20201013"],
                "1.0",
            ),
            HardwareVariant::V2Plus4 => (
                "2> ",
                &["Board: NanoVNA V2 Plus4", "Firmware version: 20211115"],
                "1.0",
            ),
            HardwareVariant::Saa2 => ("2> ", &["S-A-A-2 SAA2", "Firmware: 20200730"], "1.0"),
            HardwareVariant::TinySa => ("ch> ", &["tinySA v1.3-451", "Serial: 0451"], "1.3"),
            HardwareVariant::LiteVna => ("ch> ", &["LiteVNA 64 v0.3.1"], "0.3.1"),
            HardwareVariant::Unknown => ("OK\r\n", &["Generic serial device"], "1"),
        };

        let hw = VnaDatabase::lookup(variant);
        Self {
            variant,
            banner: banner.to_string(),
            info: info.iter().map(|s| s.to_string()).collect(),
            version: version.to_string(),
            start_hz: hw.frequency_range.min_hz as u64,
            stop_hz: 900_000_000.min(hw.frequency_range.max_hz as u64),
            points: 101.min(hw.max_sweep_points),
            silent: Vec::new(),
            max_chunk: 1024,
        }
    }
}

/// A simulated analyzer that implements [`Transport`]
#[derive(Debug)]
pub struct VirtualVna {
    config: VirtualVnaConfig,
    /// Dialect derived from the variant
    commands: CommandSet,
    /// Current sweep
    start_hz: u64,
    stop_hz: u64,
    points: u32,
    /// Samples reported by `frequencies` and `data`
    trace: Trace,
    /// Raw replies that replace the built-in handling of a command
    overrides: Vec<(String, Vec<String>)>,
    /// Bytes written but not yet terminated
    line: Vec<u8>,
    /// Output not yet read by the host
    pending_output: VecDeque<u8>,
    /// Every command line received, in order
    received: Vec<String>,
    /// Writes fail as if the cable was pulled
    unplugged: bool,
}

impl VirtualVna {
    /// Create a virtual analyzer with the typical settings of `variant`
    pub fn new(variant: HardwareVariant) -> Self {
        Self::from_config(VirtualVnaConfig::for_variant(variant))
    }

    /// Create a virtual analyzer from configuration
    pub fn from_config(config: VirtualVnaConfig) -> Self {
        let commands = VnaDatabase::lookup(config.variant).command_set;
        let trace = Trace::linear(config.start_hz, config.stop_hz, config.points);
        Self {
            commands,
            start_hz: config.start_hz,
            stop_hz: config.stop_hz,
            points: config.points,
            trace,
            overrides: Vec::new(),
            line: Vec::new(),
            pending_output: VecDeque::new(),
            received: Vec::new(),
            unplugged: false,
            config,
        }
    }

    /// Get the simulated variant
    pub fn variant(&self) -> HardwareVariant {
        self.config.variant
    }

    /// Current sweep as (start, stop, points)
    pub fn sweep(&self) -> (u64, u64, u32) {
        (self.start_hz, self.stop_hz, self.points)
    }

    /// Command lines received so far
    pub fn commands(&self) -> &[String] {
        &self.received
    }

    /// Replace the reported samples
    ///
    /// The sequences may differ in length; the analyzer prints exactly what
    /// it is given until the next sweep command regenerates the trace.
    pub fn set_trace(&mut self, frequencies: Vec<f64>, s11: Vec<Complex64>, s21: Vec<Complex64>) {
        self.trace = Trace {
            frequencies,
            s11,
            s21,
        };
    }

    /// Answer `command` with `lines` instead of the built-in reply
    pub fn set_reply(&mut self, command: impl Into<String>, lines: Vec<String>) {
        let command = command.into();
        self.overrides.retain(|(c, _)| *c != command);
        self.overrides.push((command, lines));
    }

    /// Stop answering commands that start with `prefix`
    pub fn silence(&mut self, prefix: impl Into<String>) {
        self.config.silent.push(prefix.into());
    }

    /// Make every write fail with `BrokenPipe`
    pub fn set_unplugged(&mut self, unplugged: bool) {
        self.unplugged = unplugged;
    }

    /// Check if there is pending output
    pub fn has_output(&self) -> bool {
        !self.pending_output.is_empty()
    }

    fn handle_line(&mut self, line: &str) {
        if line.is_empty() {
            let banner = self.config.banner.clone();
            self.pending_output.extend(banner.as_bytes());
            return;
        }

        trace!("{} <- {:?}", self.config.variant, line);
        self.received.push(line.to_string());

        if self.config.silent.iter().any(|p| line.starts_with(p.as_str())) {
            debug!("{} ignoring {:?}", self.config.variant, line);
            return;
        }

        let body = match self.overrides.iter().find(|(c, _)| c == line) {
            Some((_, lines)) => lines.clone(),
            None => self.respond(line),
        };

        self.queue(line);
        for body_line in &body {
            self.queue(body_line);
        }
        self.pending_output.extend(self.commands.prompt.as_bytes());
        self.pending_output.push_back(b' ');
    }

    fn queue(&mut self, line: &str) {
        self.pending_output.extend(line.as_bytes());
        self.pending_output.extend(b"\r\n");
    }

    fn respond(&mut self, line: &str) -> Vec<String> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let commands = self.commands;

        match words.as_slice() {
            [cmd] if *cmd == commands.frequencies => self
                .trace
                .frequencies
                .iter()
                .map(|f| format!("{}", f.round() as u64))
                .collect(),
            [cmd, port] if *cmd == commands.data => match *port {
                "0" => format_samples(&self.trace.s11),
                "1" => format_samples(&self.trace.s21),
                _ => vec!["usage: data [array]".to_string()],
            },
            [cmd] if *cmd == commands.info => self.config.info.clone(),
            [cmd] if *cmd == commands.version => vec![self.config.version.clone()],
            [cmd, start, stop, points] if *cmd == commands.sweep => {
                match (start.parse(), stop.parse(), points.parse()) {
                    (Ok(start), Ok(stop), Ok(points)) => {
                        self.retune(start, stop, points);
                        Vec::new()
                    }
                    _ => vec!["usage: sweep {start(Hz)} [stop(Hz)] [points]".to_string()],
                }
            }
            [cmd, key, value] if *cmd == commands.sweep => self.set_one(key, value),
            [key, value] if matches!(*key, "start" | "stop" | "points") => {
                self.set_one(key, value)
            }
            [cmd, _slot]
                if *cmd == commands.calibration_save || *cmd == commands.calibration_load =>
            {
                Vec::new()
            }
            _ => vec![format!("{}?", words.first().copied().unwrap_or_default())],
        }
    }

    fn set_one(&mut self, key: &str, value: &str) -> Vec<String> {
        let (mut start, mut stop, mut points) = (self.start_hz, self.stop_hz, self.points);
        let parsed = match key {
            "start" => value.parse().map(|v| start = v).is_ok(),
            "stop" => value.parse().map(|v| stop = v).is_ok(),
            "points" => value.parse().map(|v| points = v).is_ok(),
            _ => false,
        };
        if parsed {
            self.retune(start, stop, points);
            Vec::new()
        } else {
            vec![format!("{}?", key)]
        }
    }

    fn retune(&mut self, start_hz: u64, stop_hz: u64, points: u32) {
        debug!(
            "{} sweep {}..{} Hz, {} points",
            self.config.variant, start_hz, stop_hz, points
        );
        self.start_hz = start_hz;
        self.stop_hz = stop_hz;
        self.points = points;
        self.trace = Trace::linear(start_hz, stop_hz, points);
    }
}

fn format_samples(samples: &[Complex64]) -> Vec<String> {
    samples
        .iter()
        .map(|s| format!("{:.9} {:.9}", s.re, s.im))
        .collect()
}

impl Read for VirtualVna {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pending_output.is_empty() {
            return Err(io::Error::new(io::ErrorKind::TimedOut, "no reply from virtual analyzer"));
        }
        let n = buf.len().min(self.config.max_chunk).min(self.pending_output.len());
        for (slot, byte) in buf.iter_mut().zip(self.pending_output.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }
}

impl Write for VirtualVna {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.unplugged {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "virtual analyzer unplugged"));
        }
        for &byte in buf {
            if byte == b'\r' {
                let line = String::from_utf8_lossy(&self.line).trim().to_string();
                self.line.clear();
                self.handle_line(&line);
            } else {
                self.line.push(byte);
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.unplugged {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "virtual analyzer unplugged"));
        }
        Ok(())
    }
}

impl Transport for VirtualVna {
    fn discard_input(&mut self) -> io::Result<()> {
        self.pending_output.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn send(vna: &mut VirtualVna, command: &str) -> String {
        vna.write_all(command.as_bytes()).unwrap();
        vna.write_all(b"\r").unwrap();
        let mut out = Vec::new();
        let mut buf = [0u8; 64];
        while let Ok(n) = vna.read(&mut buf) {
            out.extend_from_slice(&buf[..n]);
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_banner_on_bare_terminator() {
        let mut vna = VirtualVna::new(HardwareVariant::Vh);
        vna.write_all(b"\r").unwrap();
        let mut buf = [0u8; 64];
        let n = vna.read(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"\r\nch> ");
        assert!(vna.commands().is_empty());
    }

    #[test]
    fn test_reply_framing() {
        let mut vna = VirtualVna::new(HardwareVariant::Vh);
        assert_eq!(send(&mut vna, "version"), "version\r\n1.2.00\r\nch> ");
    }

    #[test]
    fn test_v2_prompt_and_freq_command() {
        let mut vna = VirtualVna::new(HardwareVariant::V2Plus4);
        send(&mut vna, "sweep 1000000 3000000 3");
        let reply = send(&mut vna, "freq");
        assert_eq!(reply, "freq\r\n1000000\r\n2000000\r\n3000000\r\n2> ");
        assert_eq!(send(&mut vna, "frequencies"), "frequencies\r\nfrequencies?\r\n2> ");
    }

    #[test]
    fn test_scoped_and_bare_sweep_steps() {
        let mut vna = VirtualVna::new(HardwareVariant::V2);
        send(&mut vna, "sweep start 2000000");
        send(&mut vna, "sweep points 11");
        let (start, _, points) = vna.sweep();
        assert_eq!((start, points), (2_000_000, 11));

        let mut vna = VirtualVna::new(HardwareVariant::V1);
        send(&mut vna, "stop 5000000");
        assert_eq!(vna.sweep().1, 5_000_000);
    }

    #[test]
    fn test_data_lines_follow_trace() {
        let mut vna = VirtualVna::new(HardwareVariant::V1);
        vna.set_trace(
            vec![1e6],
            vec![Complex64::new(0.5, -0.25)],
            vec![Complex64::new(0.0, 1.0)],
        );
        assert_eq!(send(&mut vna, "data 0"), "data 0\r\n0.500000000 -0.250000000\r\nch> ");
        assert_eq!(send(&mut vna, "data 1"), "data 1\r\n0.000000000 1.000000000\r\nch> ");
    }

    #[test]
    fn test_silent_command_times_out() {
        let mut vna = VirtualVna::new(HardwareVariant::V1);
        vna.silence("data 1");
        vna.write_all(b"data 1\r").unwrap();
        let mut buf = [0u8; 16];
        let err = vna.read(&mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::TimedOut);
        assert_eq!(vna.commands(), ["data 1"]);
    }

    #[test]
    fn test_reply_override() {
        let mut vna = VirtualVna::new(HardwareVariant::Vh);
        vna.set_reply("info", vec!["custom".to_string()]);
        assert_eq!(send(&mut vna, "info"), "info\r\ncustom\r\nch> ");
    }

    #[test]
    fn test_reads_are_chunked() {
        let mut vna = VirtualVna::from_config(VirtualVnaConfig {
            max_chunk: 4,
            ..VirtualVnaConfig::for_variant(HardwareVariant::Vh)
        });
        vna.write_all(b"version\r").unwrap();
        let mut buf = [0u8; 64];
        assert_eq!(vna.read(&mut buf).unwrap(), 4);
        vna.discard_input().unwrap();
        assert!(!vna.has_output());
    }

    #[test]
    fn test_unplugged_writes_fail() {
        let mut vna = VirtualVna::new(HardwareVariant::Vh);
        vna.set_unplugged(true);
        let err = vna.write_all(b"info\r").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    proptest! {
        #[test]
        fn split_writes_match_single_write(split in 0usize..16) {
            let command = b"sweep 1000 2000 5\r";
            let split = split.min(command.len());

            let mut whole = VirtualVna::new(HardwareVariant::V1);
            whole.write_all(command).unwrap();

            let mut pieces = VirtualVna::new(HardwareVariant::V1);
            pieces.write_all(&command[..split]).unwrap();
            pieces.write_all(&command[split..]).unwrap();

            prop_assert_eq!(whole.commands(), pieces.commands());
            prop_assert_eq!(whole.sweep(), (1000, 2000, 5));
            prop_assert_eq!(pieces.sweep(), (1000, 2000, 5));
        }
    }

    #[test]
    fn test_presets_fit_registry_limits() {
        for variant in HardwareVariant::ALL {
            let config = VirtualVnaConfig::for_variant(variant);
            let hw = VnaDatabase::lookup(variant);
            assert!(config.points <= hw.max_sweep_points);
            assert!(hw.frequency_range.contains(config.start_hz as f64));
            assert!(hw.frequency_range.contains(config.stop_hz as f64));
        }
    }
}
