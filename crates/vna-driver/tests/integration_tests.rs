//! Integration tests for the NanoVNA driver
//!
//! These tests drive complete sessions against the virtual analyzer:
//! - Variant detection for every simulated firmware
//! - Sweep configuration limits and fallbacks
//! - Sweep acquisition and length reconciliation
//! - Session lifecycle (forced variants, transport wrapping, close)

use std::time::Duration;

use vna_detect::{ProbeConfig, TracedTransport};
use vna_driver::{
    ChannelConfig, HardwareVariant, NanoVna, SessionState, SweepParameter, VnaError,
};
use vna_protocol::response::ZERO;
use vna_protocol::{Complex64, VnaDatabase};
use vna_sim::{VirtualVna, VirtualVnaConfig};

// ============================================================================
// Helper Functions
// ============================================================================

mod helpers {
    use super::*;

    /// Session on a virtual analyzer, not yet identified
    pub fn session_on(analyzer: VirtualVna) -> NanoVna<VirtualVna> {
        let mut vna = NanoVna::with_transport("sim", analyzer, ChannelConfig::immediate());
        vna.set_probe_config(ProbeConfig {
            settle: Duration::ZERO,
        });
        vna
    }

    /// Session on the stock simulation of `variant`, not yet identified
    pub fn session(variant: HardwareVariant) -> NanoVna<VirtualVna> {
        session_on(VirtualVna::new(variant))
    }

    /// Session on the stock simulation of `variant`, forced to that variant
    pub fn forced(variant: HardwareVariant) -> NanoVna<VirtualVna> {
        let mut vna = session(variant);
        vna.force_variant(variant);
        vna
    }

    /// The virtual analyzer behind a session
    pub fn analyzer(vna: &mut NanoVna<VirtualVna>) -> &mut VirtualVna {
        vna.transport_mut().expect("session is open")
    }
}

// ============================================================================
// Detection
// ============================================================================

mod detection_tests {
    use super::*;

    #[test]
    fn test_every_simulated_variant_is_detected() {
        let cases = [
            (HardwareVariant::V1, "v1"),
            (HardwareVariant::Vh, "vh"),
            (HardwareVariant::V2, "v2"),
            (HardwareVariant::V2Plus, "v2"),
            (HardwareVariant::V2Plus4, "v2"),
            (HardwareVariant::Saa2, "v2"),
            (HardwareVariant::TinySa, "v1"),
            (HardwareVariant::LiteVna, "v1"),
        ];

        for (variant, version) in cases {
            let mut vna = helpers::session(variant);
            assert_eq!(vna.detect().unwrap(), version, "{variant}");
            assert_eq!(vna.variant(), variant);
            assert_eq!(vna.version(), version);
            assert_eq!(vna.hardware_info(), VnaDatabase::lookup(variant));
        }
    }

    #[test]
    fn test_litevna_behind_plain_prompt() {
        let mut vna = helpers::session_on(VirtualVna::from_config(VirtualVnaConfig {
            info: vec!["LiteVNA".to_string()],
            ..VirtualVnaConfig::for_variant(HardwareVariant::V1)
        }));
        vna.detect().unwrap();
        assert_eq!(vna.variant(), HardwareVariant::LiteVna);
        assert_eq!(vna.max_sweep_points(), 1024);
    }

    #[test]
    fn test_v1_board_with_h_prompt() {
        let mut vna = helpers::session_on(VirtualVna::from_config(VirtualVnaConfig {
            info: vec!["NanoVNA v1 clone".to_string()],
            ..VirtualVnaConfig::for_variant(HardwareVariant::Vh)
        }));
        assert_eq!(vna.detect().unwrap(), "vh");
        assert_eq!(vna.variant(), HardwareVariant::V1);
    }

    #[test]
    fn test_plus4_wins_over_plus() {
        let mut vna = helpers::session_on(VirtualVna::from_config(VirtualVnaConfig {
            info: vec!["NanoVNA V2 Plus (Plus4 board)".to_string()],
            ..VirtualVnaConfig::for_variant(HardwareVariant::V2)
        }));
        vna.detect().unwrap();
        assert_eq!(vna.variant(), HardwareVariant::V2Plus4);
        assert!(vna.is_port_supported("S12"));
        assert!(!vna.is_port_supported("S33"));
        assert!(vna.capabilities().has_multiple_ports);
    }

    #[test]
    fn test_detection_is_idempotent() {
        let mut vna = helpers::session(HardwareVariant::Saa2);
        let first = vna.detect().unwrap();
        let state = vna.state();
        assert_eq!(vna.detect().unwrap(), first);
        assert_eq!(vna.state(), state);
    }

    #[test]
    fn test_silent_info_still_detects_base_variant() {
        let mut analyzer = VirtualVna::new(HardwareVariant::V2Plus);
        analyzer.silence("info");
        let mut vna = helpers::session_on(analyzer);
        vna.detect().unwrap();
        assert_eq!(vna.variant(), HardwareVariant::V2);
    }

    #[test]
    fn test_unrecognized_device_resets_session() {
        let mut vna = helpers::session(HardwareVariant::Unknown);
        vna.force_variant(HardwareVariant::V2Plus4);

        match vna.detect().unwrap_err() {
            VnaError::UnrecognizedDevice { response } => assert_eq!(response, "OK\r\n"),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(vna.state(), SessionState::Unidentified);
        assert_eq!(vna.variant(), HardwareVariant::Unknown);
        assert_eq!(vna.max_sweep_points(), 101);
    }

    #[test]
    fn test_unidentified_session_has_conservative_limits() {
        let vna = helpers::session(HardwareVariant::V2Plus4);
        assert_eq!(vna.variant(), HardwareVariant::Unknown);
        assert_eq!(vna.supported_ports(), ["S11"]);
        assert!(!vna.capabilities().has_s21);
        assert!(vna.capabilities().has_calibration);
    }
}

// ============================================================================
// Sweep
// ============================================================================

mod sweep_tests {
    use super::*;

    #[test]
    fn test_v1_rejects_start_below_range() {
        let mut vna = helpers::forced(HardwareVariant::V1);
        let err = vna.configure(10, 900_000_000, 101).unwrap_err();
        assert!(matches!(
            err,
            VnaError::OutOfRange {
                parameter: SweepParameter::Start,
                ..
            }
        ));
    }

    #[test]
    fn test_detect_configure_and_sweep() {
        let mut vna = helpers::session(HardwareVariant::Vh);
        vna.detect().unwrap();
        vna.configure(1_000_000, 10_000_000, 10).unwrap();

        let data = vna.run_sweep().unwrap();
        assert_eq!(data.len(), 10);
        assert_eq!(data.frequencies[0], 1_000_000.0);
        assert_eq!(data.frequencies[9], 10_000_000.0);
        for s in &data.s11 {
            assert!((s.norm() - 1.0 / 3.0).abs() < 1e-6);
        }
        for s in &data.s21 {
            assert!((s.norm() - 0.7).abs() < 1e-6);
        }
    }

    #[test]
    fn test_v2_session_uses_v2_dialect() {
        let mut vna = helpers::session(HardwareVariant::V2Plus4);
        vna.detect().unwrap();
        vna.configure(1_000_000, 5_000_000_000, 201).unwrap();
        let data = vna.run_sweep().unwrap();
        assert_eq!(data.len(), 201);

        let sent = helpers::analyzer(&mut vna).commands().to_vec();
        assert!(sent.contains(&"freq".to_string()));
        assert!(!sent.contains(&"frequencies".to_string()));
    }

    #[test]
    fn test_short_s11_truncates_everything() {
        let mut vna = helpers::forced(HardwareVariant::V1);
        let sim = helpers::analyzer(&mut vna);
        sim.set_trace(vec![1e6, 2e6], vec![Complex64::new(0.5, -0.2)], Vec::new());

        let data = vna.run_sweep().unwrap();
        assert_eq!(data.frequencies, vec![1_000_000.0]);
        assert_eq!(data.s11, vec![Complex64::new(0.5, -0.2)]);
        assert_eq!(data.s21, vec![ZERO]);
    }

    #[test]
    fn test_error_lines_are_ignored() {
        let mut vna = helpers::forced(HardwareVariant::Vh);
        let sim = helpers::analyzer(&mut vna);
        sim.set_reply(
            "frequencies",
            vec!["1000000".into(), "?".into(), "2000000".into()],
        );
        sim.set_reply(
            "data 0",
            vec!["0.1 0.2".into(), "garbage".into(), "0.3 0.4 0.0".into()],
        );
        sim.set_reply("data 1", vec!["0.5".into(), "0.6 0.7".into()]);

        let data = vna.run_sweep().unwrap();
        assert_eq!(data.frequencies, vec![1_000_000.0, 2_000_000.0]);
        assert_eq!(
            data.s11,
            vec![Complex64::new(0.1, 0.2), Complex64::new(0.3, 0.4)]
        );
        assert_eq!(data.s21, vec![Complex64::new(0.6, 0.7), ZERO]);
    }

    #[test]
    fn test_silent_s21_query_pads_zeros() {
        let mut vna = helpers::forced(HardwareVariant::LiteVna);
        helpers::analyzer(&mut vna).silence("data 1");

        let data = vna.run_sweep().unwrap();
        assert!(!data.is_empty());
        assert!(data.s21.iter().all(|s| *s == ZERO));
    }

    #[test]
    fn test_unplugged_frequency_query_fails() {
        let mut vna = helpers::forced(HardwareVariant::Vh);
        helpers::analyzer(&mut vna).set_unplugged(true);
        match vna.run_sweep().unwrap_err() {
            VnaError::CommandFailed { command, .. } => assert_eq!(command, "frequencies"),
            other => panic!("unexpected error: {other}"),
        }
    }
}

// ============================================================================
// Session lifecycle
// ============================================================================

mod lifecycle_tests {
    use super::*;

    #[test]
    fn test_forced_variant_skips_probe() {
        let vna = helpers::forced(HardwareVariant::TinySa);
        assert_eq!(vna.version(), "tinysa");
        assert_eq!(
            vna.state(),
            SessionState::Forced {
                variant: HardwareVariant::TinySa
            }
        );
        assert_eq!(vna.frequency_range().min_hz, 100_000.0);
        assert!(vna.transport().unwrap().commands().is_empty());
    }

    #[test]
    fn test_port_details_without_serial_config() {
        let vna = helpers::session(HardwareVariant::Vh);
        assert_eq!(vna.port_details(), "Port: sim (config not available)");
        assert!(vna.serial_config().is_none());
    }

    #[test]
    fn test_traced_transport_keeps_session() {
        let mut vna = helpers::session(HardwareVariant::Vh);
        vna.detect().unwrap();

        let mut traced = vna.map_transport(|t| TracedTransport::new(t, "sim"));
        assert_eq!(traced.variant(), HardwareVariant::Vh);
        let info = traced.get_info().unwrap();
        assert_eq!(info.serial_number, "4E4F0C2D");
    }

    #[test]
    fn test_replaced_transport_is_used() {
        let mut vna = helpers::forced(HardwareVariant::Vh);
        let old = vna.set_transport(VirtualVna::new(HardwareVariant::Vh)).unwrap();
        assert!(old.commands().is_empty());
        assert_eq!(vna.firmware_version().unwrap(), "1.2.00");
    }

    #[test]
    fn test_close_ends_the_session() {
        let mut vna = helpers::forced(HardwareVariant::Vh);
        vna.close().unwrap();
        assert!(!vna.is_connected());
        // limits are still readable
        assert_eq!(vna.max_sweep_points(), 201);

        assert!(matches!(vna.get_info(), Err(VnaError::NotConnected)));
        assert!(matches!(vna.run_sweep(), Err(VnaError::NotConnected)));
        assert!(matches!(vna.detect(), Err(VnaError::NotConnected)));
        assert!(matches!(vna.firmware_version(), Err(VnaError::NotConnected)));
        assert_eq!(vna.state(), SessionState::Unidentified);
    }
}

// ============================================================================
// Property-based tests
// ============================================================================

mod properties_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_configure_accepts_exactly_the_valid_requests(
            start in 0u64..2_000_000_000,
            stop in 0u64..2_000_000_000,
            points in 0u32..400,
        ) {
            let mut vna = helpers::forced(HardwareVariant::Vh);
            let hw = VnaDatabase::lookup(HardwareVariant::Vh);
            let valid = start as f64 >= hw.frequency_range.min_hz
                && stop as f64 <= hw.frequency_range.max_hz
                && points <= hw.max_sweep_points;

            match vna.configure(start, stop, points) {
                Ok(()) => prop_assert!(valid),
                Err(VnaError::OutOfRange { .. }) => prop_assert!(!valid),
                Err(other) => prop_assert!(false, "unexpected error: {}", other),
            }
        }

        #[test]
        fn prop_sweep_sequences_have_equal_length(
            n_freq in 0usize..40,
            n_s11 in 0usize..40,
            n_s21 in 0usize..40,
        ) {
            let mut vna = helpers::forced(HardwareVariant::Vh);
            let frequencies = (0..n_freq).map(|i| 1e6 + i as f64 * 1e3).collect();
            helpers::analyzer(&mut vna).set_trace(
                frequencies,
                vec![Complex64::new(0.25, -0.5); n_s11],
                vec![Complex64::new(0.5, 0.25); n_s21],
            );

            match vna.run_sweep() {
                Ok(data) => {
                    let expected = n_freq.min(n_s11);
                    prop_assert_eq!(data.frequencies.len(), expected);
                    prop_assert_eq!(data.s11.len(), expected);
                    prop_assert_eq!(data.s21.len(), expected);
                    prop_assert!(data.s21.iter().skip(n_s21).all(|s| *s == ZERO));
                }
                Err(VnaError::NoData) => prop_assert!(n_freq == 0 || n_s11 == 0),
                Err(other) => prop_assert!(false, "unexpected error: {}", other),
            }
        }

        #[test]
        fn prop_s21_is_zero_without_capability(n in 1usize..40) {
            let mut vna = helpers::forced(HardwareVariant::TinySa);
            let frequencies = (0..n).map(|i| 1e6 + i as f64 * 1e3).collect();
            helpers::analyzer(&mut vna).set_trace(
                frequencies,
                vec![Complex64::new(0.25, -0.5); n],
                vec![Complex64::new(0.5, 0.25); n],
            );

            let data = vna.run_sweep().unwrap();
            prop_assert_eq!(data.len(), n);
            prop_assert!(data.s21.iter().all(|s| *s == ZERO));
        }
    }
}
