//! Inbound reconfiguration commands
//!
//! Commands arrive one per line. [`LineCommands`] reads them on a helper
//! thread so the handshake loop can poll without blocking, [`JsonCommands`]
//! turns a line of JSON field overrides into a new configuration:
//!
//! ```text
//! {"int_div": 44, "frac": 250}
//! ```

use std::{
    io::{self, BufRead},
    sync::mpsc::{self, Receiver, TryRecvError},
    thread,
};

use crate::{config::SynthesizerConfig, constants::*, errors::*, handshake::CommandHandler};

/// Non-blocking source of raw commands
pub trait CommandSource {
    /// `WouldBlock` when nothing is pending.
    fn poll_command(&mut self) -> nb::Result<Vec<u8>, CommandError>;
}

/// Line-oriented command reader running on its own thread.
/// The thread only reads its input, it never touches the bridge link.
pub struct LineCommands {
    rx: Receiver<Result<Vec<u8>, CommandError>>,
    closed: bool,
}

impl LineCommands {
    /// Starts reading `reader` until end of input or the first read error.
    ///
    /// At most [`COMMAND_QUEUE_LEN`] commands wait in the queue, the reader
    /// blocks until the loop takes one.
    pub fn spawn<R>(mut reader: R) -> io::Result<Self>
    where
        R: BufRead + Send + 'static,
    {
        let (tx, rx) = mpsc::sync_channel::<Result<Vec<u8>, CommandError>>(COMMAND_QUEUE_LEN);
        thread::Builder::new()
            .name("commands".into())
            .spawn(move || loop {
                let mut line = Vec::new();
                let item = match read_line(&mut reader, &mut line) {
                    Ok(None) => break,
                    Ok(Some(len)) if len > MAX_COMMAND_LEN => Err(CommandError::TooLong(len)),
                    Ok(Some(_)) => Ok(line),
                    Err(e) => {
                        let _ = tx.send(Err(e.into()));
                        break;
                    }
                };
                if tx.send(item).is_err() {
                    break;
                }
            })?;

        Ok(LineCommands { rx, closed: false })
    }

    /// Reads commands from standard input
    pub fn stdin() -> io::Result<Self> {
        Self::spawn(io::BufReader::new(io::stdin()))
    }

    /// True once the input has ended and every command was taken
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

/// Reads one line without its `\n` / `\r\n` ending into `line`.
///
/// Keeps at most `MAX_COMMAND_LEN + 1` bytes, the rest of a longer line is
/// skipped. Returns the full line length, `None` at end of input.
fn read_line<R: BufRead>(reader: &mut R, line: &mut Vec<u8>) -> io::Result<Option<usize>> {
    let mut len = 0;
    let mut seen = false;
    loop {
        let buf = match reader.fill_buf() {
            Ok(buf) => buf,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        if buf.is_empty() {
            break;
        }
        seen = true;

        let (chunk, done) = match buf.iter().position(|&b| b == b'\n') {
            Some(i) => (&buf[..i], true),
            None => (buf, false),
        };
        let room = (MAX_COMMAND_LEN + 1).saturating_sub(line.len());
        line.extend_from_slice(&chunk[..chunk.len().min(room)]);
        len += chunk.len();

        let used = chunk.len() + usize::from(done);
        reader.consume(used);
        if done {
            break;
        }
    }
    if !seen {
        return Ok(None);
    }

    if len <= MAX_COMMAND_LEN + 1 && line.last() == Some(&b'\r') {
        line.pop();
        len -= 1;
    }
    Ok(Some(len))
}

impl CommandSource for LineCommands {
    fn poll_command(&mut self) -> nb::Result<Vec<u8>, CommandError> {
        match self.rx.try_recv() {
            Ok(item) => item.map_err(nb::Error::Other),
            Err(TryRecvError::Empty) => Err(nb::Error::WouldBlock),
            Err(TryRecvError::Disconnected) => {
                if !self.closed {
                    tracing::debug!("command input closed");
                    self.closed = true;
                }
                Err(nb::Error::WouldBlock)
            }
        }
    }
}

/// Each command is a JSON object of [`SynthesizerConfig`] fields applied
/// on top of the running configuration. Blank lines are ignored.
#[derive(Debug, Default, Copy, Clone)]
pub struct JsonCommands;

impl CommandHandler for JsonCommands {
    fn on_new_command(
        &mut self,
        current: &SynthesizerConfig,
        bytes: &[u8],
    ) -> Option<SynthesizerConfig> {
        let text = match std::str::from_utf8(bytes) {
            Ok(text) => text.trim(),
            Err(e) => {
                tracing::warn!("rejected command: {}", e);
                return None;
            }
        };
        if text.is_empty() {
            return None;
        }

        match current.merge_json(text) {
            Ok(config) => {
                tracing::info!("new configuration: {}", text);
                Some(config)
            }
            Err(e) => {
                tracing::warn!("rejected command {:?}: {}", text, e);
                None
            }
        }
    }
}
