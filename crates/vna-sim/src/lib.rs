//! NanoVNA Simulation Library
//!
//! This crate provides a simulated analyzer for exercising the driver without
//! physical hardware. It includes:
//!
//! - **VirtualVna**: speaks the text shell of a chosen variant and implements
//!   the driver's `Transport` trait
//! - **Trace model**: deterministic S11/S21 samples for a configured sweep
//!
//! # Example
//!
//! ```rust
//! use std::io::{Read, Write};
//! use vna_sim::VirtualVna;
//! use vna_protocol::HardwareVariant;
//!
//! let mut vna = VirtualVna::new(HardwareVariant::Vh);
//! vna.write_all(b"version\r").unwrap();
//!
//! let mut buf = [0u8; 256];
//! let n = vna.read(&mut buf).unwrap();
//! assert!(String::from_utf8_lossy(&buf[..n]).ends_with("ch> "));
//! ```

pub mod analyzer;
pub mod model;

pub use analyzer::{VirtualVna, VirtualVnaConfig};
pub use model::Trace;
