//! Named digital lines
//!
//! Every physical signal the sequencer touches is wrapped in a [`DigitalLine`], which pairs an
//! [`embedded_hal`] pin with the logical [`LineId`] it carries and the [`Direction`] it was
//! configured with. Pin-to-port multiplexing is the board HAL's business; the sequencer only
//! ever sees these named handles.
//!
//! Direction is checked at runtime so that writing an input or reading an output is a reported
//! [`Error::MisconfiguredLine`] rather than a silent no-op. A rejected call never reaches the pin.

use crate::error::Error;
use embedded_hal::digital::{Error as _, InputPin, OutputPin};

/// Logical signals of the AD7616 parallel interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineId {
    /// Active-low device reset.
    Reset,
    /// Conversion start, active high.
    Convst,
    /// Active-low chip select, enables the data bus outputs.
    ChipSelect,
    /// Active-low read strobe, presents the conversion result on the buses.
    ReadStrobe,
    /// Conversion in progress, low once the result is ready.
    Busy,
    /// Data bus carrying bits 0-7.
    DataLow,
    /// Data bus carrying bits 8-15.
    DataHigh,
}

/// Logic level of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    /// Logic 0
    Low,
    /// Logic 1
    High,
}

impl From<bool> for Level {
    fn from(value: bool) -> Self {
        if value {
            Level::High
        } else {
            Level::Low
        }
    }
}

impl From<Level> for bool {
    fn from(value: Level) -> Self {
        matches!(value, Level::High)
    }
}

/// Direction a line was configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Driven by the host
    Output,
    /// Observed by the host
    Input,
}

/// A single named digital signal.
pub struct DigitalLine<P> {
    id: LineId,
    direction: Direction,
    pin: P,
}

impl<P> DigitalLine<P> {
    /// Wraps a pin that the board HAL configured as an output.
    pub fn output(id: LineId, pin: P) -> Self {
        DigitalLine {
            id,
            direction: Direction::Output,
            pin,
        }
    }

    /// Wraps a pin that the board HAL configured as an input.
    pub fn input(id: LineId, pin: P) -> Self {
        DigitalLine {
            id,
            direction: Direction::Input,
            pin,
        }
    }

    /// The logical signal this line carries.
    #[inline]
    pub fn id(&self) -> LineId {
        self.id
    }

    /// The direction this line was configured with.
    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Fails unless the line was configured as `direction`.
    pub fn expect_direction(&self, direction: Direction) -> Result<(), Error> {
        if self.direction == direction {
            Ok(())
        } else {
            Err(Error::MisconfiguredLine {
                line: self.id,
                direction: self.direction,
            })
        }
    }

    /// Returns the wrapped pin.
    pub fn free(self) -> P {
        self.pin
    }
}

impl<P: OutputPin> DigitalLine<P> {
    /// Drives the line to `level`.
    pub fn set(&mut self, level: Level) -> Result<(), Error> {
        self.expect_direction(Direction::Output)?;
        let id = self.id;
        match level {
            Level::High => self.pin.set_high(),
            Level::Low => self.pin.set_low(),
        }
        .map_err(|e| Error::Pin {
            line: id,
            kind: e.kind(),
        })
    }

    /// Drives the line high.
    #[inline]
    pub fn set_high(&mut self) -> Result<(), Error> {
        self.set(Level::High)
    }

    /// Drives the line low.
    #[inline]
    pub fn set_low(&mut self) -> Result<(), Error> {
        self.set(Level::Low)
    }
}

impl<P: InputPin> DigitalLine<P> {
    /// Samples the line.
    pub fn read(&mut self) -> Result<Level, Error> {
        self.expect_direction(Direction::Input)?;
        let id = self.id;
        self.pin
            .is_high()
            .map(Level::from)
            .map_err(|e| Error::Pin {
                line: id,
                kind: e.kind(),
            })
    }
}
