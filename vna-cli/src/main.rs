//! NanoVNA Command-Line Tool
//!
//! Lists serial ports, identifies attached analyzers and runs sweeps.
//!
//! # Usage
//!
//! ```bash
//! # List serial ports, analyzers first
//! nanovna ports
//! nanovna ports --probe
//!
//! # Identify whatever is attached
//! nanovna info
//! nanovna info --port /dev/ttyACM0 --variant vh
//!
//! # Sweep 1-30 MHz in 51 points
//! nanovna sweep --start 1000000 --stop 30000000 --points 51
//!
//! # Try it without hardware
//! nanovna sweep --simulate v2plus4 --start 1000000 --stop 3000000000
//! ```
//!
//! Set `RUST_LOG=vna_detect=trace` to see the raw serial traffic.

mod commands;
mod settings;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vna_protocol::HardwareVariant;

use crate::commands::Action;
use crate::settings::Settings;

#[derive(Parser)]
#[command(name = "nanovna", author, version, about, long_about = None)]
struct Cli {
    /// Settings file (default: $XDG_CONFIG_HOME/nanovna/settings.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// How to reach the analyzer
#[derive(Args, Debug, Clone)]
pub struct ConnectArgs {
    /// Serial port; all ports are scanned when omitted
    #[arg(short, long)]
    pub port: Option<String>,

    /// Skip detection and assume this variant
    /// (v1, vh, v2, v2plus, v2plus4, saa2, tinysa, litevna)
    #[arg(long)]
    pub variant: Option<HardwareVariant>,

    /// Talk to a virtual analyzer of this variant instead of hardware
    #[arg(long, conflicts_with = "port")]
    pub simulate: Option<HardwareVariant>,
}

#[derive(Subcommand)]
enum Commands {
    /// List serial ports
    Ports {
        /// Open each port and report which variant answers
        #[arg(long)]
        probe: bool,
    },

    /// Identify the analyzer and print its capabilities
    Info {
        #[command(flatten)]
        connect: ConnectArgs,
    },

    /// Configure and run one sweep
    Sweep {
        #[command(flatten)]
        connect: ConnectArgs,

        /// Start frequency in Hz
        #[arg(long)]
        start: u64,

        /// Stop frequency in Hz
        #[arg(long)]
        stop: u64,

        /// Number of points
        #[arg(long, default_value_t = 101)]
        points: u32,
    },

    /// Print the effective settings
    Settings {
        /// Write them to the settings file
        #[arg(long)]
        save: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "nanovna=info,vna_protocol=info,vna_detect=info,vna_driver=info,vna_sim=info"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load(),
    };

    match cli.command {
        Commands::Ports { probe } => commands::list_ports(&settings, probe),
        Commands::Info { connect } => commands::run(&connect, &settings, Action::Info),
        Commands::Sweep {
            connect,
            start,
            stop,
            points,
        } => commands::run(
            &connect,
            &settings,
            Action::Sweep {
                start_hz: start,
                stop_hz: stop,
                points,
            },
        ),
        Commands::Settings { save } => commands::show_settings(&settings, cli.config, save),
    }
}
