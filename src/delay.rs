//! Host delay

use std::{thread, time::Duration};

use embedded_hal::blocking::delay::DelayMs;

/// Blocking delay backed by `std::thread::sleep`
#[derive(Debug, Default, Copy, Clone)]
pub struct StdDelay;

impl DelayMs<u16> for StdDelay {
    fn delay_ms(&mut self, ms: u16) {
        thread::sleep(Duration::from_millis(ms as u64));
    }
}
