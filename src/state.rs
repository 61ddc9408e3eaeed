//! Sequencer state machine
//!
//! ```text
//!            reset()                 trigger()              BUSY low
//!   Idle ───────────► Resetting ───► AwaitingConversion ───► Converting ───► Reading
//!                         ▲                  ▲  ▲                                │
//!                         │                  │  └──────── abort() ───────────────┤
//!                         │                  │                                   ▼
//!                         └──── reset() ─────┴──────────────────────────── SampleReady
//! ```
//!
//! `SampleReady` may also go straight to `Converting` for the next acquisition.

use crate::error::Error;

/// Where the sequencer is in the acquisition protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Lines not yet driven to a known baseline.
    Idle,
    /// Reset pulse in progress.
    Resetting,
    /// Device reset and idle, ready for CONVST.
    AwaitingConversion,
    /// CONVST raised, waiting for BUSY to clear.
    Converting,
    /// Conversion complete, read strobes in progress.
    Reading,
    /// A sample was captured and the strobes released.
    SampleReady,
}

impl State {
    /// Whether the protocol allows moving from `self` to `to`.
    pub fn can_transition(self, to: State) -> bool {
        use State::*;
        matches!(
            (self, to),
            (Idle, Resetting)
                | (AwaitingConversion, Resetting)
                | (SampleReady, Resetting)
                | (Resetting, AwaitingConversion)
                | (AwaitingConversion, Converting)
                | (SampleReady, Converting)
                | (Converting, Reading)
                | (Reading, SampleReady)
                | (SampleReady, AwaitingConversion)
                // aborts
                | (Resetting, Idle)
                | (Converting, AwaitingConversion)
                | (Reading, AwaitingConversion)
        )
    }

    /// Moves to `to`, or reports the illegal transition.
    pub fn transition(self, to: State) -> Result<State, Error> {
        if self.can_transition(to) {
            Ok(to)
        } else {
            Err(Error::IllegalTransition { from: self, to })
        }
    }

    /// Whether the device has been through a completed reset.
    pub fn is_reset(self) -> bool {
        !matches!(self, State::Idle | State::Resetting)
    }

    /// State an aborted cycle falls back to.
    pub(crate) fn abort_target(self) -> State {
        if self.is_reset() {
            State::AwaitingConversion
        } else {
            State::Idle
        }
    }
}
