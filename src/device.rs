//! ADF4351 behind the serial bridge

use std::io::{self, ErrorKind, Read, Write};

use embedded_hal::blocking::delay::DelayMs;

use crate::{
    config::SynthesizerConfig, constants::*, errors::*, frame::Frame, handshake::Status,
    register::*,
};

/// ADF4351 device, owns the link to the bridge microcontroller.
///
/// The link is any byte stream: a serial port on the host, an in-memory
/// double in tests.
pub struct Adf4351<L> {
    link: L,
}

impl<L> Adf4351<L> {
    /// Creates the device, nothing is written until [`Adf4351::init`].
    pub fn new(link: L) -> Self {
        Adf4351 { link }
    }

    /// Borrowed link, e.g. to inspect it
    pub fn link(&self) -> &L {
        &self.link
    }

    /// Gives the link back
    pub fn release(self) -> L {
        self.link
    }
}

impl<L> Adf4351<L>
where
    L: Write,
{
    /// Writes one frame, accumulating short writes until all of it is out.
    ///
    /// A write that makes no progress is a failure, not a reason to spin.
    pub fn send(&mut self, frame: &Frame) -> Result<(), LinkError> {
        let bytes = frame.as_bytes();
        let mut sent = 0;
        while sent < bytes.len() {
            match self.link.write(&bytes[sent..]) {
                Ok(0) => {
                    return Err(LinkError::WriteFailed(io::Error::new(
                        ErrorKind::WriteZero,
                        format!("bridge accepted {} of {} bytes", sent, bytes.len()),
                    )))
                }
                Ok(n) => sent += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(LinkError::WriteFailed(e)),
            }
        }
        self.link.flush().map_err(LinkError::WriteFailed)
    }

    /// Frames and sends one register word.
    /// The bridge shifts it out MSB first and latches it by its control bits.
    pub fn write_register(&mut self, index: u8, w: u32) -> Result<(), Error> {
        let frame = Frame::encode(index, w)?;
        tracing::debug!("R{} <- {:#010x}", index, w | index as u32);
        self.send(&frame)?;
        Ok(())
    }

    /// Writes all control registers out, R5 first, R0 last.
    /// Stops at the first failure.
    pub fn write_register_set(&mut self, rs: &RegisterSet) -> Result<(), Error> {
        let words = rs.to_words();
        for index in WRITE_ORDER {
            self.write_register(index, words[index as usize])?;
        }
        Ok(())
    }

    /// Bring-up sequence: full write with phase adjust off (band selection
    /// runs), settle, enable phase adjust, full write again.
    ///
    /// The `phase_adjust` value of `config` is ignored, the first pass
    /// always has it cleared.
    ///
    /// Blocking call.
    pub fn init<Delay>(
        &mut self,
        delay: &mut Delay,
        config: &SynthesizerConfig,
    ) -> Result<(), Error>
    where
        Delay: DelayMs<u16>,
    {
        let rs = config.with_phase_adjust(0).encode()?;
        self.write_register_set(&rs)?;

        delay.delay_ms(SETTLE_DELAY_MS);

        let rs = rs.set(PhaseAdjust(1));
        self.write_register_set(&rs)?;

        tracing::info!(
            "ADF4351 configured: INT {} FRAC {} MOD {}",
            config.int_div,
            config.frac,
            config.modulus
        );
        Ok(())
    }
}

impl<L> Adf4351<L>
where
    L: Read,
{
    /// Blocks for one status byte from the bridge.
    /// End of stream is a failure.
    pub fn read_status(&mut self) -> Result<Status, LinkError> {
        let mut buf = [0u8; 1];
        loop {
            match self.link.read(&mut buf) {
                Ok(0) => {
                    return Err(LinkError::ReadFailed(io::Error::new(
                        ErrorKind::UnexpectedEof,
                        "bridge closed the link",
                    )))
                }
                Ok(_) => return Ok(Status::from(buf[0])),
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(LinkError::ReadFailed(e)),
            }
        }
    }
}
