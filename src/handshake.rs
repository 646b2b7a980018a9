//! Status handshake with the bridge

use std::{
    convert::Infallible,
    io::{Read, Write},
};

use embedded_hal::blocking::delay::DelayMs;

use crate::{
    command::CommandSource, config::SynthesizerConfig, constants::*, device::Adf4351, errors::*,
};

/// Bridge status byte
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Status {
    /// Bridge accepts the next write
    Ready,
    /// Anything else, nothing is written
    Busy(u8),
}

impl From<u8> for Status {
    #[inline]
    fn from(b: u8) -> Self {
        if b == STATUS_READY {
            Status::Ready
        } else {
            Status::Busy(b)
        }
    }
}

/// What one handshake cycle did
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Cycle {
    /// Bridge not ready
    Busy(u8),
    /// Bridge ready, no command pending
    Idle,
    /// A command arrived but produced no usable configuration
    Rejected,
    /// A command arrived and the device was brought up with it
    Reconfigured,
}

/// Turns an inbound command into a new configuration
pub trait CommandHandler {
    /// `None` leaves the device as it is.
    fn on_new_command(
        &mut self,
        current: &SynthesizerConfig,
        bytes: &[u8],
    ) -> Option<SynthesizerConfig>;
}

impl<F> CommandHandler for F
where
    F: FnMut(&SynthesizerConfig, &[u8]) -> Option<SynthesizerConfig>,
{
    fn on_new_command(
        &mut self,
        current: &SynthesizerConfig,
        bytes: &[u8],
    ) -> Option<SynthesizerConfig> {
        self(current, bytes)
    }
}

/// Polls the bridge for status, re-runs bring-up when a command asks for it.
///
/// Single threaded: writes only happen inside [`Adf4351::init`], which
/// completes before the next status read.
pub struct HandshakeLoop<L, S, H, D> {
    device: Adf4351<L>,
    config: SynthesizerConfig,
    commands: S,
    handler: H,
    delay: D,
}

impl<L, S, H, D> HandshakeLoop<L, S, H, D>
where
    L: Read + Write,
    S: CommandSource,
    H: CommandHandler,
    D: DelayMs<u16>,
{
    /// `config` is what the device currently runs with.
    pub fn new(
        device: Adf4351<L>,
        config: SynthesizerConfig,
        commands: S,
        handler: H,
        delay: D,
    ) -> Self {
        HandshakeLoop {
            device,
            config,
            commands,
            handler,
            delay,
        }
    }

    /// Configuration last written to the synthesizer
    pub fn config(&self) -> &SynthesizerConfig {
        &self.config
    }

    /// The device the loop drives
    pub fn device(&self) -> &Adf4351<L> {
        &self.device
    }

    /// One cycle: block for a status byte, then, if the bridge is ready,
    /// check for a pending command without blocking.
    pub fn poll_once(&mut self) -> Result<Cycle, Error> {
        let status = self.device.read_status()?;
        tracing::trace!(?status, "bridge status");

        if let Status::Busy(b) = status {
            return Ok(Cycle::Busy(b));
        }

        let bytes = match self.commands.poll_command() {
            Ok(bytes) => bytes,
            Err(nb::Error::WouldBlock) => return Ok(Cycle::Idle),
            Err(nb::Error::Other(e)) => {
                tracing::warn!("dropping command: {}", e);
                return Ok(Cycle::Rejected);
            }
        };

        let config = match self.handler.on_new_command(&self.config, &bytes) {
            Some(config) => config,
            None => return Ok(Cycle::Rejected),
        };

        match self.device.init(&mut self.delay, &config) {
            Ok(()) => {
                self.config = config;
                Ok(Cycle::Reconfigured)
            }
            Err(e @ Error::ConfigOutOfRange { .. }) => {
                tracing::warn!("rejected configuration: {}", e);
                Ok(Cycle::Rejected)
            }
            Err(e) => Err(e),
        }
    }

    /// Runs until the link fails.
    pub fn run(&mut self) -> Result<Infallible, Error> {
        loop {
            self.poll_once()?;
        }
    }
}
