//! Subcommand implementations

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use tracing::info;
use vna_detect::{probe_port, ChannelConfig, PortScanner, TracedTransport, Transport};
use vna_driver::{auto_detect_with, NanoVna};
use vna_protocol::{HardwareCapabilities, HardwareVariant, SweepData};
use vna_sim::VirtualVna;

use crate::settings::Settings;
use crate::ConnectArgs;

/// Work done on a connected session
#[derive(Debug, Clone, Copy)]
pub enum Action {
    /// Print hardware and device info
    Info,
    /// Configure and print one sweep
    Sweep {
        start_hz: u64,
        stop_hz: u64,
        points: u32,
    },
}

impl Action {
    fn perform<T: Transport>(self, vna: &mut NanoVna<T>) -> Result<()> {
        match self {
            Action::Info => print_info(vna),
            Action::Sweep {
                start_hz,
                stop_hz,
                points,
            } => {
                vna.configure(start_hz, stop_hz, points)
                    .context("Failed to configure sweep")?;
                let data = vna.run_sweep().context("Sweep failed")?;
                print_sweep(&data);
                Ok(())
            }
        }
    }
}

/// Connect as requested, perform `action`, and close the session
pub fn run(connect: &ConnectArgs, settings: &Settings, action: Action) -> Result<()> {
    if let Some(simulated) = connect.simulate {
        let analyzer = TracedTransport::new(VirtualVna::new(simulated), "sim");
        let mut vna = NanoVna::with_transport(
            format!("sim:{}", simulated.version_label()),
            analyzer,
            ChannelConfig::immediate(),
        );
        identify(&mut vna, connect.variant)?;
        return finish(&mut vna, action);
    }

    let serial = settings.serial_config();
    let channel = settings.channel_config();

    let vna = match &connect.port {
        Some(port) => {
            let mut vna = NanoVna::open_with_config(port, &serial, channel)?;
            identify(&mut vna, connect.variant)?;
            vna
        }
        None => {
            let scanner = PortScanner::with_config(settings.scanner_config());
            let mut vna = auto_detect_with(&scanner, &serial, channel)?;
            if let Some(variant) = connect.variant {
                vna.force_variant(variant);
            }
            vna
        }
    };

    let port = vna.port().to_string();
    let mut vna = vna.map_transport(|t| TracedTransport::new(t, port));
    finish(&mut vna, action)
}

/// Force `variant` if given, otherwise probe
fn identify<T: Transport>(vna: &mut NanoVna<T>, variant: Option<HardwareVariant>) -> Result<()> {
    match variant {
        Some(variant) => vna.force_variant(variant),
        None => {
            let version = vna
                .detect()
                .with_context(|| format!("Could not identify the analyzer on {}", vna.port()))?;
            info!("Detected {} (version {})", vna.variant(), version);
        }
    }
    Ok(())
}

fn finish<T: Transport>(vna: &mut NanoVna<T>, action: Action) -> Result<()> {
    let result = action.perform(vna);
    vna.close()?;
    result
}

/// List serial ports, known analyzers first
///
/// With `probe`, every listed port is opened and asked to identify itself.
pub fn list_ports(settings: &Settings, probe: bool) -> Result<()> {
    let serial = settings.serial_config();
    let scanner = PortScanner::with_config(settings.scanner_config());
    let ports = scanner.enumerate_ports()?;

    if ports.is_empty() {
        println!("No serial ports found");
        return Ok(());
    }

    for port in ports {
        let ids = match (port.vid, port.pid) {
            (Some(vid), Some(pid)) => format!("{:04x}:{:04x}", vid, pid),
            _ => "-".to_string(),
        };
        println!(
            "{:<24} {:<10} {}{}",
            port.port,
            ids,
            port.product.as_deref().unwrap_or(""),
            if port.is_known_analyzer() {
                " (analyzer)"
            } else {
                ""
            }
        );

        if probe {
            match probe_port(&port.port, &serial) {
                Some(found) => println!("{:<24} -> {} ({})", "", found.variant, found.version),
                None => println!("{:<24} -> no analyzer", ""),
            }
        }
    }
    Ok(())
}

/// Print the settings in effect, optionally writing them out
pub fn show_settings(settings: &Settings, path: Option<PathBuf>, save: bool) -> Result<()> {
    let path = path.or_else(Settings::default_path);

    if save {
        let path = path
            .as_deref()
            .ok_or_else(|| anyhow!("Could not determine settings path"))?;
        settings.save_to(path)?;
        println!("Saved {}", path.display());
    } else if let Some(path) = &path {
        println!("# {}", path.display());
    }

    println!("{}", serde_json::to_string_pretty(settings)?);
    Ok(())
}

fn print_info<T: Transport>(vna: &mut NanoVna<T>) -> Result<()> {
    let hw = vna.hardware_info();
    let range = hw.frequency_range;

    println!("Port:        {}", vna.port_details());
    println!("Variant:     {} (version {})", vna.variant(), vna.version());
    println!(
        "Range:       {:.3} - {:.3} MHz",
        range.min_hz / 1e6,
        range.max_hz / 1e6
    );
    println!("Max points:  {}", hw.max_sweep_points);
    println!("Ports:       {}", hw.supported_ports.join(", "));
    println!("Features:    {}", feature_list(&hw.capabilities));

    let device = vna.get_info().context("Failed to read device info")?;
    println!("Model:       {}", device.model);
    if !device.firmware.is_empty() {
        println!("Firmware:    {}", device.firmware);
    }
    if !device.serial_number.is_empty() {
        println!("Serial:      {}", device.serial_number);
    }

    let version = vna.firmware_version().context("Failed to read version")?;
    if !version.is_empty() {
        println!("Version:     {}", version);
    }
    Ok(())
}

fn feature_list(caps: &HardwareCapabilities) -> String {
    let flags = [
        (caps.has_s21, "S21"),
        (caps.has_time_domain, "time-domain"),
        (caps.has_calibration, "calibration"),
        (caps.has_multiple_ports, "multi-port"),
        (caps.has_generator, "generator"),
        (caps.has_spectrum_mode, "spectrum"),
    ];
    let names: Vec<&str> = flags
        .iter()
        .filter(|(on, _)| *on)
        .map(|(_, name)| *name)
        .collect();
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(" ")
    }
}

fn print_sweep(data: &SweepData) {
    println!(
        "{:>14} {:>12} {:>12} {:>12} {:>12}",
        "freq_mhz", "s11_re", "s11_im", "s21_re", "s21_im"
    );
    for ((f, s11), s21) in data.frequencies.iter().zip(&data.s11).zip(&data.s21) {
        println!(
            "{:>14.6} {:>12.6} {:>12.6} {:>12.6} {:>12.6}",
            f / 1e6,
            s11.re,
            s11.im,
            s21.re,
            s21.im
        );
    }
}
