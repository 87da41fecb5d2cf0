//! Command/response channel
//!
//! One exchange is: drop stale input, write `command\r`, give the firmware a
//! moment, then read until the prompt shows up or the attempt budget runs
//! out. Whatever arrived is returned; a missing prompt is not an error.

use std::io;
use std::thread;
use std::time::Duration;

use tracing::trace;
use vna_protocol::command::{CommandSet, TERMINATOR};

use crate::error::DetectError;
use crate::transport::Transport;

/// Timing of the command channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelConfig {
    /// Wait after writing before the first read
    pub grace: Duration,
    /// Wait between reads
    pub read_delay: Duration,
    /// Maximum reads per exchange
    pub max_attempts: u32,
    /// Size of one read
    pub read_buffer: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            grace: Duration::from_millis(50),
            read_delay: Duration::from_millis(20),
            max_attempts: 10,
            read_buffer: 1024,
        }
    }
}

impl ChannelConfig {
    /// Same budget without any sleeping, for in-memory transports
    pub fn immediate() -> Self {
        Self {
            grace: Duration::ZERO,
            read_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}

/// Synchronous request/response channel over a [`Transport`]
pub struct CommandChannel<T> {
    transport: Option<T>,
    config: ChannelConfig,
}

impl<T: Transport> CommandChannel<T> {
    /// Create a channel with default timing
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, ChannelConfig::default())
    }

    /// Create a channel with custom timing
    pub fn with_config(transport: T, config: ChannelConfig) -> Self {
        Self {
            transport: Some(transport),
            config,
        }
    }

    /// Create a channel with no transport attached
    pub fn closed(config: ChannelConfig) -> Self {
        Self {
            transport: None,
            config,
        }
    }

    /// Get the channel timing
    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    /// Whether a transport is attached
    pub fn is_connected(&self) -> bool {
        self.transport.is_some()
    }

    /// Borrow the transport
    pub fn transport(&self) -> Option<&T> {
        self.transport.as_ref()
    }

    /// Mutably borrow the transport
    pub fn transport_mut(&mut self) -> Option<&mut T> {
        self.transport.as_mut()
    }

    /// Swap in a different transport, returning the previous one
    pub fn replace_transport(&mut self, transport: T) -> Option<T> {
        self.transport.replace(transport)
    }

    /// Take the transport out of the channel
    pub fn into_transport(self) -> Option<T> {
        self.transport
    }

    /// Release the transport; later exchanges fail with `NotConnected`
    pub fn close(&mut self) -> Result<(), DetectError> {
        if let Some(mut transport) = self.transport.take() {
            transport.flush()?;
        }
        Ok(())
    }

    /// Send a command and collect the reply up to `prompt`
    pub fn exchange(&mut self, command: &str, prompt: &str) -> Result<String, DetectError> {
        let config = self.config;
        let transport = self.transport.as_mut().ok_or(DetectError::NotConnected)?;

        transport.discard_input()?;
        transport.write_all(&CommandSet::encode(command))?;
        transport.flush()?;
        thread::sleep(config.grace);

        let mut buf = vec![0u8; config.read_buffer];
        let mut response = Vec::new();

        for attempt in 0..config.max_attempts {
            match transport.read(&mut buf) {
                Ok(n) => {
                    response.extend_from_slice(&buf[..n]);
                    if contains_marker(&response, prompt) {
                        break;
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::TimedOut && !response.is_empty() => break,
                Err(e) => return Err(e.into()),
            }

            if attempt + 1 < config.max_attempts {
                thread::sleep(config.read_delay);
            }
        }

        let text = String::from_utf8_lossy(&response).into_owned();
        trace!("{:?} -> {:?}", command, text);
        Ok(text)
    }

    /// Send a bare terminator and return the single read that follows
    ///
    /// This is what a terminal user sees on pressing enter: the prompt, in
    /// whichever style the firmware uses.
    pub fn probe(&mut self) -> Result<String, DetectError> {
        let config = self.config;
        let transport = self.transport.as_mut().ok_or(DetectError::NotConnected)?;

        transport.discard_input()?;
        transport.write_all(TERMINATOR.as_bytes())?;
        transport.flush()?;
        thread::sleep(config.grace);

        let mut buf = vec![0u8; config.read_buffer];
        let n = transport.read(&mut buf)?;
        let text = String::from_utf8_lossy(&buf[..n]).into_owned();
        trace!("probe -> {:?}", text);
        Ok(text)
    }
}

fn contains_marker(haystack: &[u8], marker: &str) -> bool {
    let marker = marker.as_bytes();
    !marker.is_empty() && haystack.windows(marker.len()).any(|w| w == marker)
}
