//! Errors

use std::io;

use thiserror::Error;

/// Crate error
#[derive(Debug, Error)]
pub enum Error {
    /// A configuration field does not fit its register bitfield
    #[error("{field} = {value} does not fit in {max_bits} bits")]
    ConfigOutOfRange {
        field: &'static str,
        value: u32,
        max_bits: u8,
    },

    /// Register index above 5, or a word whose control bits are already set
    #[error("cannot frame register {index} with word {word:#010x}")]
    IndexOutOfRange { index: u8, word: u32 },

    /// Inbound frame does not start with the 'R' tag
    #[error("bad frame tag {0:#04x}")]
    BadFrameTag(u8),

    /// REFin outside of the supported range
    #[error("reference frequency {0} Hz is out of range")]
    InvalidReferenceFrequency(u32),

    /// Zero R counter or modulus
    #[error("{0} must be non-zero")]
    InvalidDivider(&'static str),

    #[error(transparent)]
    Link(#[from] LinkError),

    /// Malformed JSON configuration
    #[error("bad configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Bridge link failures, all fatal to the caller
#[derive(Debug, Error)]
pub enum LinkError {
    /// Write failed or made no progress
    #[error("write to bridge failed: {0}")]
    WriteFailed(#[source] io::Error),

    /// Status read failed or returned no data
    #[error("read from bridge failed: {0}")]
    ReadFailed(#[source] io::Error),
}

/// Inbound command source failures
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("command source failed: {0}")]
    Io(#[from] io::Error),

    #[error("command is {0} bytes long")]
    TooLong(usize),
}
