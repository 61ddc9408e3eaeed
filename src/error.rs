//! Acquisition errors

use crate::line::{Direction, LineId};
use crate::state::State;
use core::fmt;
use embedded_hal::digital::ErrorKind;

/// Errors raised while driving the converter.
///
/// Every error aborts the acquisition it happened in; the sequencer returns its lines to idle
/// before handing the error back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The pin behind `line` reported a failure.
    Pin {
        /// Affected line
        line: LineId,
        /// What the pin reported
        kind: ErrorKind,
    },
    /// BUSY still read high after `polls` samples.
    Timeout {
        /// Number of BUSY samples taken
        polls: u32,
    },
    /// The operation needs the other direction than `line` was configured with.
    MisconfiguredLine {
        /// Affected line
        line: LineId,
        /// Direction the line actually has
        direction: Direction,
    },
    /// The operation is not allowed in the current protocol state.
    IllegalTransition {
        /// Current state
        from: State,
        /// Requested state
        to: State,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Pin { line, kind } => write!(f, "pin error on {:?}: {:?}", line, kind),
            Error::Timeout { polls } => write!(f, "BUSY did not clear after {} polls", polls),
            Error::MisconfiguredLine { line, direction } => {
                write!(f, "{:?} is configured as {:?}", line, direction)
            }
            Error::IllegalTransition { from, to } => {
                write!(f, "illegal transition {:?} -> {:?}", from, to)
            }
        }
    }
}
