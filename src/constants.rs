//! Constants

/// Minimum allowed REFin frequency
pub const REF_IN_FREQ_MIN: u32 = 10_000_000;

/// Maximum allowed REFin frequency
pub const REF_IN_FREQ_MAX: u32 = 250_000_000;

/// Fundamental VCO mode (before dividers), min frequency
pub const VCO_FREQ_MIN: u64 = 2_200_000_000;

/// Fundamental VCO mode (before dividers), max frequency
pub const VCO_FREQ_MAX: u64 = 4_400_000_000;

/// Number of control registers (R0..R5)
pub const REGISTER_COUNT: usize = 6;

/// When power is first applied to the ADF4351, the part requires
/// six writes (one each to R5, R4, R3, R2, R1, and R0) for the output
/// to become active. Every full write cycle uses the same order.
pub const WRITE_ORDER: [u8; REGISTER_COUNT] = [5, 4, 3, 2, 1, 0];

/// Bits [2:0] of every register word carry the register address.
pub const CONTROL_BITS_MASK: u32 = 0b111;

/// Bridge frame tag, ASCII 'R'
pub const FRAME_TAG: u8 = b'R';

/// Frame length: tag + 32 bit big-endian word
pub const FRAME_LEN: usize = 5;

/// Status byte sent by the bridge when it can accept the next write
pub const STATUS_READY: u8 = 17;

/// Hardware settling time between the two bring-up passes, ms
pub const SETTLE_DELAY_MS: u16 = 100;

/// Longest inbound command line accepted, bytes
pub const MAX_COMMAND_LEN: usize = 1024;

/// Commands read ahead of the handshake loop before the reader waits
pub const COMMAND_QUEUE_LEN: usize = 4;
