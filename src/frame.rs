//! Bridge wire frame: 'R' followed by (word | address), MSB first

use crate::{constants::*, errors::*};

/// One register write as sent to the bridge
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Frame([u8; FRAME_LEN]);

impl Frame {
    /// Frames register `index` with its word.
    /// The word's control bits must be clear, they carry the index.
    pub fn encode(index: u8, word: u32) -> Result<Self, Error> {
        if index as usize >= REGISTER_COUNT || word & CONTROL_BITS_MASK != 0 {
            return Err(Error::IndexOutOfRange { index, word });
        }

        let [b1, b2, b3, b4] = (word | index as u32).to_be_bytes();
        Ok(Frame([FRAME_TAG, b1, b2, b3, b4]))
    }

    /// Splits a frame back into (index, word)
    pub fn decode(bytes: &[u8; FRAME_LEN]) -> Result<(u8, u32), Error> {
        let [tag, b1, b2, b3, b4] = *bytes;
        if tag != FRAME_TAG {
            return Err(Error::BadFrameTag(tag));
        }

        let payload = u32::from_be_bytes([b1, b2, b3, b4]);
        let index = (payload & CONTROL_BITS_MASK) as u8;
        let word = payload & !CONTROL_BITS_MASK;
        if index as usize >= REGISTER_COUNT {
            return Err(Error::IndexOutOfRange { index, word });
        }
        Ok((index, word))
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.0
    }
}
