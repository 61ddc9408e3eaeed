//! Parallel data buses
//!
//! In parallel hardware mode the AD7616 presents each 16-bit result on DB0-DB15. The host reads
//! them as two 8-bit groups, so a bus here is anything that can return one byte per read.
//!
//! Two implementations are provided:
//!
//! - [`PinBus`] samples eight individual [`InputPin`]s, index 0 being the least significant bit.
//!   Use `&mut dyn InputPin<Error = E>` as the pin type when the pins have distinct types.
//! - [`PortBus`] wraps a closure that reads a whole 8-bit port register at once, which is both
//!   faster and glitch-free when the board routes a bus to a single port.

use crate::util::BitsExt;
use core::convert::Infallible;
use embedded_hal::digital::{ErrorType, InputPin};

/// An 8-bit parallel input group.
pub trait DataBus: ErrorType {
    /// Samples all eight lines of the bus.
    fn read_byte(&mut self) -> Result<u8, Self::Error>;
}

impl<T: DataBus + ?Sized> DataBus for &mut T {
    #[inline]
    fn read_byte(&mut self) -> Result<u8, Self::Error> {
        T::read_byte(self)
    }
}

/// Bus built from eight single-bit input pins.
pub struct PinBus<P> {
    pins: [P; 8],
}

impl<P: InputPin> PinBus<P> {
    /// Creates a bus from pins ordered LSB first.
    pub fn new(pins: [P; 8]) -> Self {
        PinBus { pins }
    }

    /// Returns the pins.
    pub fn free(self) -> [P; 8] {
        self.pins
    }
}

impl<P: InputPin> ErrorType for PinBus<P> {
    type Error = P::Error;
}

impl<P: InputPin> DataBus for PinBus<P> {
    fn read_byte(&mut self) -> Result<u8, Self::Error> {
        let mut byte = 0u8;
        for (bit, pin) in self.pins.iter_mut().enumerate() {
            byte = byte.set_if(bit as u8, pin.is_high()?);
        }
        Ok(byte)
    }
}

/// Bus read through a whole-port register access.
pub struct PortBus<F> {
    read: F,
}

impl<F: FnMut() -> u8> PortBus<F> {
    /// Creates a bus that calls `read` to sample the port.
    pub fn new(read: F) -> Self {
        PortBus { read }
    }
}

impl<F: FnMut() -> u8> ErrorType for PortBus<F> {
    type Error = Infallible;
}

impl<F: FnMut() -> u8> DataBus for PortBus<F> {
    #[inline]
    fn read_byte(&mut self) -> Result<u8, Self::Error> {
        Ok((self.read)())
    }
}
