//! Sweep configuration and acquisition

use tracing::{debug, info, warn};
use vna_detect::{DetectError, Transport};
use vna_protocol::command::{PORT_S11, PORT_S21};
use vna_protocol::response::{self, ZERO};
use vna_protocol::SweepData;

use crate::device::NanoVna;
use crate::error::{SweepParameter, VnaError};

impl<T: Transport> NanoVna<T> {
    /// Set the sweep range and point count
    ///
    /// Parameters are checked against the active hardware entry (start,
    /// then stop, then points). If the instrument rejects the combined
    /// `sweep` command, the single-parameter forms of the dialect are sent
    /// instead; any one of them being accepted counts as success.
    pub fn configure(&mut self, start_hz: u64, stop_hz: u64, points: u32) -> Result<(), VnaError> {
        let hw = self.hardware_info();
        let range = hw.frequency_range;

        if (start_hz as f64) < range.min_hz {
            return Err(VnaError::OutOfRange {
                parameter: SweepParameter::Start,
                value: start_hz,
                limit: range.min_hz as u64,
            });
        }
        if (stop_hz as f64) > range.max_hz {
            return Err(VnaError::OutOfRange {
                parameter: SweepParameter::Stop,
                value: stop_hz,
                limit: range.max_hz as u64,
            });
        }
        if points > hw.max_sweep_points {
            return Err(VnaError::OutOfRange {
                parameter: SweepParameter::Points,
                value: u64::from(points),
                limit: u64::from(hw.max_sweep_points),
            });
        }

        let commands = hw.command_set;
        let primary = commands.sweep_command(start_hz, stop_hz, points);
        let error = match self.channel.exchange(&primary, commands.prompt) {
            Ok(_) => {
                info!("Sweep set to {}..{} Hz, {} points", start_hz, stop_hz, points);
                return Ok(());
            }
            Err(DetectError::NotConnected) => return Err(VnaError::NotConnected),
            Err(e) => e,
        };

        warn!("{:?} failed ({}), trying single-parameter commands", primary, error);

        let mut accepted = false;
        for fallback in commands.sweep_fallbacks(start_hz, stop_hz, points) {
            match self.channel.exchange(&fallback, commands.prompt) {
                Ok(_) => {
                    debug!("{:?} accepted", fallback);
                    accepted = true;
                }
                Err(e) => debug!("{:?} failed: {}", fallback, e),
            }
        }

        if accepted {
            Ok(())
        } else {
            Err(VnaError::CommandFailed {
                command: primary,
                source: error,
            })
        }
    }

    /// Read the frequencies and samples of the current sweep
    ///
    /// S21 is read only when the variant measures it; a failed S21 query
    /// yields zero samples rather than an error. All sequences in the result
    /// have the same length.
    pub fn run_sweep(&mut self) -> Result<SweepData, VnaError> {
        let hw = self.hardware_info();
        let commands = hw.command_set;

        let text = self.query(commands.frequencies)?;
        let frequencies = response::parse_frequencies(&text, commands.frequencies, commands.prompt);

        let s11_command = commands.data_command(PORT_S11);
        let text = self.query(&s11_command)?;
        let s11 = response::parse_samples(&text, &s11_command, commands.data, commands.prompt);

        let s21 = if hw.capabilities.has_s21 && hw.is_port_supported("S21") {
            let s21_command = commands.data_command(PORT_S21);
            match self.channel.exchange(&s21_command, commands.prompt) {
                Ok(text) => {
                    response::parse_samples(&text, &s21_command, commands.data, commands.prompt)
                }
                Err(e) => {
                    warn!("S21 query failed, reporting zeros: {}", e);
                    vec![ZERO; s11.len()]
                }
            }
        } else {
            Vec::new()
        };

        let mut data = SweepData {
            frequencies,
            s11,
            s21,
        };
        data.pad_s21();

        if data.frequencies.is_empty() || data.s11.is_empty() {
            debug!(
                "Empty sweep: {} frequencies, {} S11 samples",
                data.frequencies.len(),
                data.s11.len()
            );
            return Err(VnaError::NoData);
        }

        data.align();
        debug!("Sweep returned {} points", data.len());
        Ok(data)
    }

    /// Exchange a query, naming it in the error on failure
    fn query(&mut self, command: &str) -> Result<String, VnaError> {
        let prompt = self.hardware_info().command_set.prompt;
        self.channel
            .exchange(command, prompt)
            .map_err(|e| match e {
                DetectError::NotConnected => VnaError::NotConnected,
                source => VnaError::CommandFailed {
                    command: command.to_string(),
                    source,
                },
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vna_detect::ChannelConfig;
    use vna_protocol::{Complex64, HardwareVariant};
    use vna_sim::VirtualVna;

    fn session(variant: HardwareVariant) -> NanoVna<VirtualVna> {
        let mut vna =
            NanoVna::with_transport("sim", VirtualVna::new(variant), ChannelConfig::immediate());
        vna.force_variant(variant);
        vna
    }

    fn sim(vna: &mut NanoVna<VirtualVna>) -> &mut VirtualVna {
        vna.transport_mut().unwrap()
    }

    #[test]
    fn test_bounds_checked_in_order() {
        let mut vna = session(HardwareVariant::V1);
        // start and points both invalid: start is reported
        let err = vna.configure(10, 900_000_000, 5000).unwrap_err();
        assert!(matches!(
            err,
            VnaError::OutOfRange {
                parameter: SweepParameter::Start,
                value: 10,
                limit: 50_000
            }
        ));

        let err = vna.configure(50_000, 900_000_001, 5000).unwrap_err();
        assert!(matches!(
            err,
            VnaError::OutOfRange {
                parameter: SweepParameter::Stop,
                ..
            }
        ));

        let err = vna.configure(50_000, 900_000_000, 102).unwrap_err();
        assert!(matches!(
            err,
            VnaError::OutOfRange {
                parameter: SweepParameter::Points,
                value: 102,
                limit: 101
            }
        ));
        // nothing reached the instrument
        assert!(vna.transport().unwrap().commands().is_empty());
    }

    #[test]
    fn test_limits_are_inclusive() {
        let mut vna = session(HardwareVariant::V1);
        vna.configure(50_000, 900_000_000, 101).unwrap();
        assert_eq!(
            vna.transport().unwrap().commands(),
            ["sweep 50000 900000000 101"]
        );
    }

    #[test]
    fn test_primary_failure_uses_bare_fallbacks() {
        let mut vna = session(HardwareVariant::Vh);
        sim(&mut vna).silence("sweep");
        vna.configure(1_000_000, 2_000_000, 11).unwrap();
        assert_eq!(
            vna.transport().unwrap().commands(),
            [
                "sweep 1000000 2000000 11",
                "start 1000000",
                "stop 2000000",
                "points 11"
            ]
        );
    }

    #[test]
    fn test_v2_fallbacks_are_scoped() {
        let mut vna = session(HardwareVariant::V2Plus4);
        sim(&mut vna).silence("sweep 1");
        vna.configure(1_000_000, 2_000_000, 11).unwrap();
        let sent = vna.transport().unwrap().commands();
        assert_eq!(&sent[1..], ["sweep start 1000000", "sweep stop 2000000", "sweep points 11"]);
        assert_eq!(vna.transport().unwrap().sweep(), (1_000_000, 2_000_000, 11));
    }

    #[test]
    fn test_single_accepted_fallback_is_success() {
        let mut vna = session(HardwareVariant::Vh);
        let analyzer = sim(&mut vna);
        analyzer.silence("sweep");
        analyzer.silence("start");
        analyzer.silence("stop");
        assert!(vna.configure(1_000_000, 2_000_000, 11).is_ok());
    }

    #[test]
    fn test_all_forms_failing_reports_primary() {
        let mut vna = session(HardwareVariant::Vh);
        let analyzer = sim(&mut vna);
        for prefix in ["sweep", "start", "stop", "points"] {
            analyzer.silence(prefix);
        }
        match vna.configure(1_000_000, 2_000_000, 11).unwrap_err() {
            VnaError::CommandFailed { command, source } => {
                assert_eq!(command, "sweep 1000000 2000000 11");
                assert!(source.is_timeout());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_s21_skipped_without_capability() {
        let mut vna = session(HardwareVariant::TinySa);
        sim(&mut vna).set_trace(
            vec![1e6, 2e6],
            vec![Complex64::new(0.1, 0.2), Complex64::new(0.3, 0.4)],
            vec![Complex64::new(9.0, 9.0); 2],
        );
        let data = vna.run_sweep().unwrap();
        assert_eq!(data.s21, vec![ZERO; 2]);
        assert!(!vna
            .transport()
            .unwrap()
            .commands()
            .iter()
            .any(|c| c == "data 1"));
    }

    #[test]
    fn test_failed_s21_query_pads_zeros() {
        let mut vna = session(HardwareVariant::Vh);
        sim(&mut vna).silence("data 1");
        let data = vna.run_sweep().unwrap();
        assert_eq!(data.len(), 101);
        assert!(data.s21.iter().all(|s| *s == ZERO));
    }

    #[test]
    fn test_missing_frequencies_is_no_data() {
        let mut vna = session(HardwareVariant::Vh);
        sim(&mut vna).set_trace(Vec::new(), vec![ZERO; 3], Vec::new());
        assert!(matches!(vna.run_sweep(), Err(VnaError::NoData)));
    }

    #[test]
    fn test_failed_s11_query_names_command() {
        let mut vna = session(HardwareVariant::Vh);
        sim(&mut vna).silence("data 0");
        match vna.run_sweep().unwrap_err() {
            VnaError::CommandFailed { command, .. } => assert_eq!(command, "data 0"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_closed_session_is_not_connected() {
        let mut vna = session(HardwareVariant::Vh);
        vna.close().unwrap();
        assert!(matches!(vna.run_sweep(), Err(VnaError::NotConnected)));
        assert!(matches!(
            vna.configure(1_000_000, 2_000_000, 11),
            Err(VnaError::NotConnected)
        ));
    }
}
