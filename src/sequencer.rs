//! Acquisition sequencer
//!
//! [`Ad7616`] owns every control line of the converter and is the only thing that drives them.
//! One acquisition is:
//!
//! ```text
//! RESET  ‾‾‾‾‾‾‾|_____|‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾
//! CONVST ______________________|‾‾‾‾‾‾‾‾‾‾‾‾‾|________________________
//! BUSY   ___________________________|‾‾‾‾‾‾‾|_________________________
//! CS     ‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾|_______________|‾‾‾‾‾
//! RD     ‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾|_____|‾‾‾‾‾‾‾‾‾‾‾
//! DB     ----------------------------------------------<XX>-----------
//! ```
//!
//! The buses are sampled while CS and RD are both low, before either is released. Every wait is
//! taken from [`Timing`]. Any failure aborts the cycle: CONVST is dropped, RD and CS are
//! released, and the error is handed back.
//!
//! The BUSY poll is exposed as a non-blocking step, [`Ad7616::poll_busy`], in the same way a
//! one-shot ADC read returns `WouldBlock` until the result is ready. Use [`nb::block!`] or
//! [`Ad7616::trigger_and_read`] to wait for it.

use crate::bus::DataBus;
use crate::error::Error;
use crate::line::{DigitalLine, Direction, Level, LineId};
use crate::sample::{BusProbe, Sample};
use crate::state::State;
use crate::timing::Timing;
use bitflags::bitflags;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{Error as _, InputPin, OutputPin};

bitflags! {
    /// Control lines currently held at their active level.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Strobes: u8 {
        /// RESET low
        const RESET = 1 << 0;
        /// CONVST high
        const CONVST = 1 << 1;
        /// CS low
        const CHIP_SELECT = 1 << 2;
        /// RD low
        const READ_STROBE = 1 << 3;
    }
}

impl Strobes {
    /// Both strobes that open the data bus.
    pub const READ_WINDOW: Strobes = Strobes::CHIP_SELECT.union(Strobes::READ_STROBE);

    // CONVST is the only active-high control input.
    fn level(self, active: bool) -> Level {
        Level::from(active == (self == Strobes::CONVST))
    }
}

/// The five single-bit lines of the interface.
pub struct ControlLines<RST, CNV, CS, RD, BSY> {
    /// RESET, output
    pub reset: DigitalLine<RST>,
    /// CONVST, output
    pub convst: DigitalLine<CNV>,
    /// CS, output
    pub chip_select: DigitalLine<CS>,
    /// RD, output
    pub read_strobe: DigitalLine<RD>,
    /// BUSY, input
    pub busy: DigitalLine<BSY>,
}

/// The two 8-bit halves of the data bus.
pub struct DataBuses<LO, HI> {
    /// DB0-DB7
    pub low: LO,
    /// DB8-DB15
    pub high: HI,
}

/// Bus access granted only while CS and RD are asserted.
struct ReadWindow<'a, LO, HI> {
    buses: &'a mut DataBuses<LO, HI>,
}

impl<'a, LO: DataBus, HI: DataBus> ReadWindow<'a, LO, HI> {
    fn open(strobes: Strobes, buses: &'a mut DataBuses<LO, HI>) -> Option<Self> {
        if strobes.contains(Strobes::READ_WINDOW) {
            Some(ReadWindow { buses })
        } else {
            None
        }
    }

    fn capture(self) -> Result<Sample, Error> {
        let low = read_bus(&mut self.buses.low, LineId::DataLow)?;
        let high = read_bus(&mut self.buses.high, LineId::DataHigh)?;
        Ok(Sample::new(low, high))
    }
}

fn read_bus<B: DataBus>(bus: &mut B, line: LineId) -> Result<u8, Error> {
    bus.read_byte()
        .map_err(|e| Error::Pin { line, kind: e.kind() })
}

/// Parallel-mode AD7616 driven over discrete GPIO.
pub struct Ad7616<RST, CNV, CS, RD, BSY, LO, HI, D> {
    lines: ControlLines<RST, CNV, CS, RD, BSY>,
    buses: DataBuses<LO, HI>,
    delay: D,
    timing: Timing,
    state: State,
    strobes: Strobes,
    polls: u32,
}

impl<RST, CNV, CS, RD, BSY, LO, HI, D> Ad7616<RST, CNV, CS, RD, BSY, LO, HI, D>
where
    RST: OutputPin,
    CNV: OutputPin,
    CS: OutputPin,
    RD: OutputPin,
    BSY: InputPin,
    LO: DataBus,
    HI: DataBus,
    D: DelayNs,
{
    /// Takes ownership of the lines. Fails if any control line has the wrong direction.
    ///
    /// No line is touched until [`reset`](Self::reset).
    pub fn new(
        lines: ControlLines<RST, CNV, CS, RD, BSY>,
        buses: DataBuses<LO, HI>,
        delay: D,
        timing: Timing,
    ) -> Result<Self, Error> {
        lines.reset.expect_direction(Direction::Output)?;
        lines.convst.expect_direction(Direction::Output)?;
        lines.chip_select.expect_direction(Direction::Output)?;
        lines.read_strobe.expect_direction(Direction::Output)?;
        lines.busy.expect_direction(Direction::Input)?;

        Ok(Ad7616 {
            lines,
            buses,
            delay,
            timing,
            state: State::Idle,
            strobes: Strobes::empty(),
            polls: 0,
        })
    }

    /// Current protocol state.
    #[inline]
    pub fn state(&self) -> State {
        self.state
    }

    /// Lines currently held active.
    #[inline]
    pub fn strobes(&self) -> Strobes {
        self.strobes
    }

    /// Timing in use.
    #[inline]
    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    /// Replaces the timing. Takes effect at the next wait.
    pub fn set_timing(&mut self, timing: Timing) {
        self.timing = timing;
    }

    /// Number of BUSY samples that read high during the current or last conversion.
    #[inline]
    pub fn busy_polls(&self) -> u32 {
        self.polls
    }

    /// Parks CS and RD high and CONVST low, then runs the reset pulse on RESET:
    /// high, low, high, each followed by its interval.
    pub fn reset(&mut self) -> Result<(), Error> {
        self.advance(State::Resetting)?;
        debug!("ad7616: reset");
        self.guarded(|s| {
            s.drive(Strobes::CHIP_SELECT, false)?;
            s.drive(Strobes::READ_STROBE, false)?;
            s.drive(Strobes::CONVST, false)?;

            let t = s.timing;
            s.drive(Strobes::RESET, false)?;
            s.delay.delay_us(t.reset_idle_us);
            s.drive(Strobes::RESET, true)?;
            s.delay.delay_us(t.reset_pulse_us);
            s.drive(Strobes::RESET, false)?;
            s.delay.delay_us(t.reset_recovery_us);

            s.advance(State::AwaitingConversion)
        })
    }

    /// Reads both buses without triggering a conversion or strobing RD.
    ///
    /// The result reflects whatever the bus floats to and is only useful as a wiring check.
    /// Allowed between acquisitions.
    pub fn probe_bus(&mut self) -> Result<BusProbe, Error> {
        if !matches!(self.state, State::AwaitingConversion | State::SampleReady) {
            return Err(Error::IllegalTransition {
                from: self.state,
                to: State::AwaitingConversion,
            });
        }
        self.delay.delay_us(self.timing.probe_settle_us);
        let low_byte = read_bus(&mut self.buses.low, LineId::DataLow)?;
        let high_byte = read_bus(&mut self.buses.high, LineId::DataHigh)?;
        trace!("ad7616: probe {=u8:x} {=u8:x}", low_byte, high_byte);
        Ok(BusProbe {
            low_byte,
            high_byte,
        })
    }

    /// Raises CONVST to start a conversion and waits the CONVST settle interval.
    pub fn trigger(&mut self) -> Result<(), Error> {
        self.advance(State::Converting)?;
        self.polls = 0;
        self.guarded(|s| {
            s.drive(Strobes::CONVST, true)?;
            s.delay.delay_us(s.timing.convst_settle_us);
            Ok(())
        })
    }

    /// Samples BUSY once.
    ///
    /// While BUSY is high this waits one poll interval and returns `WouldBlock`. Once it reads
    /// low, CONVST is dropped and the sequencer moves to [`State::Reading`]. If BUSY is still
    /// high after [`Timing::max_busy_polls`] samples the cycle is aborted with
    /// [`Error::Timeout`].
    pub fn poll_busy(&mut self) -> nb::Result<(), Error> {
        if self.state != State::Converting {
            return Err(nb::Error::Other(Error::IllegalTransition {
                from: self.state,
                to: State::Reading,
            }));
        }

        let busy = match self.lines.busy.read() {
            Ok(level) => level,
            Err(e) => return Err(nb::Error::Other(self.abort_with(e))),
        };

        if busy == Level::High {
            self.polls += 1;
            if self.polls >= self.timing.max_busy_polls {
                warn!("ad7616: BUSY stuck high after {=u32} polls", self.polls);
                let polls = self.polls;
                return Err(nb::Error::Other(self.abort_with(Error::Timeout { polls })));
            }
            self.delay.delay_us(self.timing.busy_poll_us);
            return Err(nb::Error::WouldBlock);
        }

        trace!("ad7616: conversion done after {=u32} polls", self.polls);
        self.guarded(|s| {
            s.drive(Strobes::CONVST, false)?;
            s.advance(State::Reading)
        })
        .map_err(nb::Error::Other)
    }

    /// Runs the read strobes and captures the result.
    ///
    /// CS falls, then RD falls; both buses are sampled while the two are low. RD is released,
    /// then CS.
    pub fn read_sample(&mut self) -> Result<Sample, Error> {
        if self.state != State::Reading {
            return Err(Error::IllegalTransition {
                from: self.state,
                to: State::SampleReady,
            });
        }
        self.guarded(|s| {
            let t = s.timing;
            s.drive(Strobes::CHIP_SELECT, true)?;
            s.delay.delay_us(t.cs_settle_us);
            s.drive(Strobes::READ_STROBE, true)?;
            s.delay.delay_us(t.rd_pulse_us);

            let sample = ReadWindow::open(s.strobes, &mut s.buses)
                .ok_or(Error::IllegalTransition {
                    from: State::Reading,
                    to: State::SampleReady,
                })?
                .capture()?;

            s.drive(Strobes::READ_STROBE, false)?;
            s.delay.delay_us(t.rd_release_us);
            s.drive(Strobes::CHIP_SELECT, false)?;

            s.advance(State::SampleReady)?;
            debug!("ad7616: sample {=u16:x}", sample.raw());
            Ok(sample)
        })
    }

    /// Triggers a conversion, blocks until BUSY clears and reads the result.
    pub fn trigger_and_read(&mut self) -> Result<Sample, Error> {
        self.trigger()?;
        nb::block!(self.poll_busy())?;
        self.read_sample()
    }

    /// Drops CONVST, releases RD and CS (and RESET if a reset pulse was cut short) and returns
    /// to the last stable state.
    ///
    /// Every line is attempted even if an earlier one fails; the first failure is returned.
    pub fn abort(&mut self) -> Result<(), Error> {
        let convst = self.drive(Strobes::CONVST, false);
        let rd = self.drive(Strobes::READ_STROBE, false);
        let cs = self.drive(Strobes::CHIP_SELECT, false);
        let reset = if self.strobes.contains(Strobes::RESET) {
            self.drive(Strobes::RESET, false)
        } else {
            Ok(())
        };

        let target = self.state.abort_target();
        if target != self.state {
            self.advance(target)?;
        }
        convst.and(rd).and(cs).and(reset)
    }

    /// Returns the lines, buses and delay.
    pub fn release(self) -> (ControlLines<RST, CNV, CS, RD, BSY>, DataBuses<LO, HI>, D) {
        (self.lines, self.buses, self.delay)
    }

    fn advance(&mut self, to: State) -> Result<(), Error> {
        self.state = self.state.transition(to)?;
        Ok(())
    }

    fn drive(&mut self, strobe: Strobes, active: bool) -> Result<(), Error> {
        let level = strobe.level(active);
        if strobe == Strobes::RESET {
            self.lines.reset.set(level)?;
        } else if strobe == Strobes::CONVST {
            self.lines.convst.set(level)?;
        } else if strobe == Strobes::CHIP_SELECT {
            self.lines.chip_select.set(level)?;
        } else {
            self.lines.read_strobe.set(level)?;
        }
        self.strobes.set(strobe, active);
        Ok(())
    }

    fn guarded<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T, Error>) -> Result<T, Error> {
        f(self).map_err(|e| self.abort_with(e))
    }

    fn abort_with(&mut self, err: Error) -> Error {
        warn!("ad7616: aborting in {}", self.state);
        // Keep the first error; a failed release is secondary.
        let _ = self.abort();
        err
    }
}
