//! Single-shot acquisition flow
//!
//! Reset the device, print the floating bus as a wiring check, run one conversion and print the
//! result. This is the whole firmware for bring-up of a new board.

use crate::bus::DataBus;
use crate::error::Error;
use crate::report::{ReportError, Reporter};
use crate::sample::Sample;
use crate::sequencer::Ad7616;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

/// Why a session ended early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionError<E> {
    /// The acquisition failed. The error has already been reported.
    Acquisition(Error),
    /// The report channel failed.
    Report(ReportError<E>),
}

impl<E> From<ReportError<E>> for SessionError<E> {
    fn from(err: ReportError<E>) -> Self {
        SessionError::Report(err)
    }
}

/// Runs reset, bus probe, one conversion and both reports.
///
/// An acquisition error is printed through `reporter` before being returned.
pub fn single_shot<RST, CNV, CS, RD, BSY, LO, HI, D, W>(
    adc: &mut Ad7616<RST, CNV, CS, RD, BSY, LO, HI, D>,
    reporter: &mut Reporter<W>,
) -> Result<Sample, SessionError<W::Error>>
where
    RST: OutputPin,
    CNV: OutputPin,
    CS: OutputPin,
    RD: OutputPin,
    BSY: InputPin,
    LO: DataBus,
    HI: DataBus,
    D: DelayNs,
    W: embedded_io::Write,
{
    let result = adc.reset().and_then(|()| adc.probe_bus());
    let probe = acquisition(result, reporter)?;
    reporter.report_probe(&probe)?;

    let sample = acquisition(adc.trigger_and_read(), reporter)?;
    reporter.report_sample(&sample)?;
    Ok(sample)
}

fn acquisition<T, W: embedded_io::Write>(
    result: Result<T, Error>,
    reporter: &mut Reporter<W>,
) -> Result<T, SessionError<W::Error>> {
    match result {
        Ok(value) => Ok(value),
        Err(err) => {
            reporter.report_error(&err)?;
            Err(SessionError::Acquisition(err))
        }
    }
}
