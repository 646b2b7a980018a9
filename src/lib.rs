//! [ADF4351](https://www.analog.com/en/products/adf4351.html) bring-up through
//! a serial bridge microcontroller.
//!
//! The bridge takes 5 byte frames (`'R'` + register word, MSB first) and
//! answers with a status byte, `17` when it can take the next write.

pub mod command;
pub mod config;
pub mod constants;
pub mod delay;
pub mod device;
pub mod errors;
pub mod frame;
pub mod frequency;
pub mod handshake;
pub mod register;
pub mod serial;

#[cfg(test)]
mod mock;
