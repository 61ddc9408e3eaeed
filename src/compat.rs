//! Adapters for `embedded-hal` 0.2 pins
//!
//! Boards whose HAL still implements `embedded_hal::digital::v2` can wrap their pins in
//! [`Compat02`] to pass them to [`DigitalLine`](crate::line::DigitalLine).

use core::fmt::Debug;
use embedded_hal::digital::{Error, ErrorKind, ErrorType, InputPin, OutputPin};
use embedded_hal_02::digital::v2;

/// An `embedded-hal` 0.2 output pin seen as an `embedded-hal` 1.0 output pin.
pub struct Compat02<P>(pub P);

impl<P> Compat02<P> {
    /// Returns the wrapped pin.
    pub fn free(self) -> P {
        self.0
    }
}

/// Error reported by a wrapped 0.2 pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Compat02Error<E>(pub E);

impl<E: Debug> Error for Compat02Error<E> {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

// 0.2 gives input and output unrelated error types, so each direction gets its own wrapper.
impl<P: v2::OutputPin> ErrorType for Compat02<P>
where
    P::Error: Debug,
{
    type Error = Compat02Error<P::Error>;
}

impl<P: v2::OutputPin> OutputPin for Compat02<P>
where
    P::Error: Debug,
{
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.set_low().map_err(Compat02Error)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.set_high().map_err(Compat02Error)
    }
}

/// An `embedded-hal` 0.2 input pin seen as an `embedded-hal` 1.0 input pin.
pub struct Compat02Input<P>(pub P);

impl<P> Compat02Input<P> {
    /// Returns the wrapped pin.
    pub fn free(self) -> P {
        self.0
    }
}

impl<P: v2::InputPin> ErrorType for Compat02Input<P>
where
    P::Error: Debug,
{
    type Error = Compat02Error<P::Error>;
}

impl<P: v2::InputPin> InputPin for Compat02Input<P>
where
    P::Error: Debug,
{
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.0.is_high().map_err(Compat02Error)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.0.is_low().map_err(Compat02Error)
    }
}
