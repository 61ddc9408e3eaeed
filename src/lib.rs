//! Driver for the AD7616 analog-to-digital converter in parallel hardware mode, built only on
//! discrete [`embedded_hal`] digital lines and a delay provider.
//!
//! The converter is driven by four control lines (RESET, CONVST, CS and RD), one status input
//! (BUSY) and two 8-bit parallel data buses that together carry one 16-bit sample. No bus
//! peripheral is involved: every edge is a GPIO write and every wait is a blocking delay.
//!
//! [`sequencer::Ad7616`] owns the lines and runs the acquisition handshake:
//!
//! 1. [`reset`](sequencer::Ad7616::reset) parks CS/RD high and CONVST low, then pulses RESET.
//! 2. [`trigger`](sequencer::Ad7616::trigger) raises CONVST.
//! 3. [`poll_busy`](sequencer::Ad7616::poll_busy) watches BUSY until the conversion is done.
//! 4. [`read_sample`](sequencer::Ad7616::read_sample) asserts CS then RD, captures both buses
//!    and releases the strobes.
//!
//! The results are printed through [`report::Reporter`], which writes to any [`embedded_io`]
//! transmitter.
//!
//! # Usage
//!
//! Board bring-up (pin directions, clocks, the UART) is the job of the board HAL. See
//! `device-examples/msp430fr2355` for a complete binding on an MSP430FR2355 Launchpad.
//!
//! # Features
//!
//! - `defmt`: derives `defmt::Format` for the public types and emits protocol trace events.
//! - `embedded-hal-02`: enables [`compat::Compat02`] so `embedded-hal` 0.2 pins can be used.

#![cfg_attr(not(test), no_std)]
#![deny(missing_docs)]

#[macro_use]
mod log;

pub mod bus;
#[cfg(feature = "embedded-hal-02")]
pub mod compat;
pub mod error;
pub mod line;
pub mod prelude;
pub mod report;
pub mod sample;
pub mod sequencer;
pub mod session;
pub mod state;
pub mod timing;

mod util;

#[cfg(test)]
mod mock;

pub use error::Error;
pub use sample::{BusProbe, Sample};
pub use sequencer::Ad7616;
pub use state::State;
pub use timing::Timing;
