//! Diagnostic reporting
//!
//! Acquisition results are printed as one human-readable line each over any [`embedded_io`]
//! transmitter, typically a UART at 115200 baud:
//!
//! ```text
//! The initial value on the UART: ffff
//! The value after the conversion: 73c
//! Acquisition error: BUSY did not clear after 10000 polls
//! ```
//!
//! Serial drivers that only expose the single-byte, non-blocking
//! [`embedded_hal_nb::serial::Write`] interface can be wrapped in [`NbWriter`].

use crate::error::Error;
use crate::sample::{BusProbe, Sample};
use core::fmt;
use embedded_hal_nb::serial;
use nb::block;

/// Which acquisition phase a reported value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Bus probe taken before any conversion.
    Initial,
    /// Result of a completed conversion.
    Converted,
}

impl Phase {
    fn label(self) -> &'static str {
        match self {
            Phase::Initial => "The initial value on the UART",
            Phase::Converted => "The value after the conversion",
        }
    }
}

/// How the two bus bytes are turned into the printed value.
///
/// Default: [`Combination::Concatenate`]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Combination {
    /// `(high << 8) | low`, the real 16-bit result.
    #[default]
    Concatenate,
    /// `low * high`, for output parity with early bring-up logs.
    LegacyProduct,
}

/// Failure to emit a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReportError<E> {
    /// The transmitter failed.
    Write(E),
    /// A formatting trait implementation returned an error.
    Format,
}

impl<E> From<embedded_io::WriteFmtError<E>> for ReportError<E> {
    fn from(err: embedded_io::WriteFmtError<E>) -> Self {
        match err {
            embedded_io::WriteFmtError::Other(e) => ReportError::Write(e),
            _ => ReportError::Format,
        }
    }
}

/// Writes acquisition reports to a text channel.
pub struct Reporter<W> {
    writer: W,
    combination: Combination,
}

impl<W: embedded_io::Write> Reporter<W> {
    /// Creates a reporter that prints concatenated 16-bit values.
    pub fn new(writer: W) -> Self {
        Reporter {
            writer,
            combination: Combination::default(),
        }
    }

    /// Changes how bus bytes are combined for printing.
    pub fn with_combination(mut self, combination: Combination) -> Self {
        self.combination = combination;
        self
    }

    /// Combination rule in use.
    #[inline]
    pub fn combination(&self) -> Combination {
        self.combination
    }

    /// Prints a pre-conversion bus probe.
    pub fn report_probe(&mut self, probe: &BusProbe) -> Result<(), ReportError<W::Error>> {
        let value = match self.combination {
            Combination::Concatenate => probe.raw(),
            Combination::LegacyProduct => probe.legacy_product(),
        };
        self.report_value(Phase::Initial, value)
    }

    /// Prints a converted sample.
    pub fn report_sample(&mut self, sample: &Sample) -> Result<(), ReportError<W::Error>> {
        let value = match self.combination {
            Combination::Concatenate => sample.raw(),
            Combination::LegacyProduct => sample.legacy_product(),
        };
        self.report_value(Phase::Converted, value)
    }

    /// Prints a labeled value in hex.
    pub fn report_value(&mut self, phase: Phase, value: u16) -> Result<(), ReportError<W::Error>> {
        write!(self.writer, "{}: {:x}\r\n", phase.label(), value)?;
        self.writer.flush().map_err(ReportError::Write)
    }

    /// Prints a failed acquisition.
    pub fn report_error(&mut self, err: &Error) -> Result<(), ReportError<W::Error>> {
        write!(self.writer, "Acquisition error: {}\r\n", err)?;
        self.writer.flush().map_err(ReportError::Write)
    }

    /// Returns the writer.
    pub fn free(self) -> W {
        self.writer
    }
}

/// [`embedded_io::Write`] on top of a single-byte non-blocking serial transmitter.
pub struct NbWriter<S> {
    serial: S,
}

impl<S: serial::Write<u8>> NbWriter<S> {
    /// Wraps `serial`.
    pub fn new(serial: S) -> Self {
        NbWriter { serial }
    }

    /// Returns the transmitter.
    pub fn free(self) -> S {
        self.serial
    }
}

/// Serial failure seen through [`NbWriter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerialError(pub serial::ErrorKind);

impl fmt::Display for SerialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "serial error: {:?}", self.0)
    }
}

impl embedded_io::Error for SerialError {
    fn kind(&self) -> embedded_io::ErrorKind {
        embedded_io::ErrorKind::Other
    }
}

impl<S: serial::Write<u8>> embedded_io::ErrorType for NbWriter<S> {
    type Error = SerialError;
}

impl<S: serial::Write<u8>> embedded_io::Write for NbWriter<S> {
    /// Sends the whole buffer, blocking on each byte until the transmitter accepts it.
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        use serial::Error as _;
        for &byte in buf {
            block!(self.serial.write(byte)).map_err(|e| SerialError(e.kind()))?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        use serial::Error as _;
        block!(self.serial.flush()).map_err(|e| SerialError(e.kind()))
    }
}
