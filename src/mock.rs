//! Simulated AD7616 for host tests.
//!
//! All pins, buses and the delay handed out by one [`SimAdc`] share a single transcript, so a
//! test can assert on the exact interleaving of edges, samples and waits.

#![allow(dead_code)]

use crate::bus::DataBus;
use crate::line::{Level, LineId};
use core::convert::Infallible;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, ErrorKind, ErrorType, InputPin, OutputPin};
use std::cell::RefCell;
use std::rc::Rc;
use std::vec::Vec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Set(LineId, Level),
    Read(LineId, Level),
    Bus(LineId, u8),
    Delay(u32),
}

#[derive(Debug, Clone, Copy)]
enum BusyScript {
    ClearAfter(u32),
    Never,
}

struct Device {
    events: Vec<Event>,
    reset: bool,
    convst: bool,
    cs: bool,
    rd: bool,
    busy: BusyScript,
    busy_high_reads: u32,
    data: (u8, u8),
    idle_bus: (u8, u8),
    failing: Option<LineId>,
}

#[derive(Clone)]
pub struct SimAdc(Rc<RefCell<Device>>);

impl SimAdc {
    pub fn new() -> Self {
        SimAdc(Rc::new(RefCell::new(Device {
            events: Vec::new(),
            reset: false,
            convst: false,
            cs: false,
            rd: false,
            busy: BusyScript::ClearAfter(0),
            busy_high_reads: 0,
            data: (0, 0),
            idle_bus: (0xFF, 0xFF),
            failing: None,
        })))
    }

    pub fn with_data(self, low: u8, high: u8) -> Self {
        self.0.borrow_mut().data = (low, high);
        self
    }

    pub fn with_idle_bus(self, low: u8, high: u8) -> Self {
        self.0.borrow_mut().idle_bus = (low, high);
        self
    }

    pub fn busy_clears_after(self, polls: u32) -> Self {
        self.0.borrow_mut().busy = BusyScript::ClearAfter(polls);
        self
    }

    pub fn busy_never_clears(self) -> Self {
        self.0.borrow_mut().busy = BusyScript::Never;
        self
    }

    pub fn fail_pin(&self, line: LineId) {
        self.0.borrow_mut().failing = Some(line);
    }

    pub fn pin(&self, line: LineId) -> SimPin {
        SimPin {
            line,
            dev: self.0.clone(),
        }
    }

    pub fn bus(&self, line: LineId) -> SimBus {
        SimBus {
            line,
            dev: self.0.clone(),
        }
    }

    pub fn delay(&self) -> SimDelay {
        SimDelay(self.0.clone())
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().events.clone()
    }

    pub fn clear_events(&self) {
        self.0.borrow_mut().events.clear();
    }

    pub fn convst_high(&self) -> bool {
        self.0.borrow().convst
    }

    pub fn reset_high(&self) -> bool {
        self.0.borrow().reset
    }

    pub fn cs_high(&self) -> bool {
        self.0.borrow().cs
    }

    pub fn rd_high(&self) -> bool {
        self.0.borrow().rd
    }

    pub fn count(&self, f: impl Fn(&Event) -> bool) -> usize {
        self.0.borrow().events.iter().filter(|e| f(e)).count()
    }
}

#[derive(Debug)]
pub struct SimPinError;

impl digital::Error for SimPinError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

pub struct SimPin {
    line: LineId,
    dev: Rc<RefCell<Device>>,
}

impl SimPin {
    fn drive(&mut self, high: bool) -> Result<(), SimPinError> {
        let mut dev = self.dev.borrow_mut();
        if dev.failing == Some(self.line) {
            return Err(SimPinError);
        }
        match self.line {
            LineId::Reset => dev.reset = high,
            LineId::Convst => dev.convst = high,
            LineId::ChipSelect => dev.cs = high,
            LineId::ReadStrobe => dev.rd = high,
            _ => {}
        }
        dev.events.push(Event::Set(self.line, Level::from(high)));
        Ok(())
    }
}

impl ErrorType for SimPin {
    type Error = SimPinError;
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.drive(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.drive(true)
    }
}

impl InputPin for SimPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        let mut dev = self.dev.borrow_mut();
        if dev.failing == Some(self.line) {
            return Err(SimPinError);
        }
        let high = match self.line {
            LineId::Busy => {
                let busy = match dev.busy {
                    BusyScript::Never => true,
                    BusyScript::ClearAfter(k) => dev.busy_high_reads < k,
                };
                if busy {
                    dev.busy_high_reads += 1;
                }
                busy
            }
            LineId::Reset => dev.reset,
            LineId::Convst => dev.convst,
            LineId::ChipSelect => dev.cs,
            LineId::ReadStrobe => dev.rd,
            _ => false,
        };
        dev.events.push(Event::Read(self.line, Level::from(high)));
        Ok(high)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|h| !h)
    }
}

pub struct SimBus {
    line: LineId,
    dev: Rc<RefCell<Device>>,
}

impl ErrorType for SimBus {
    type Error = SimPinError;
}

impl DataBus for SimBus {
    fn read_byte(&mut self) -> Result<u8, Self::Error> {
        let mut dev = self.dev.borrow_mut();
        if dev.failing == Some(self.line) {
            return Err(SimPinError);
        }
        let (low, high) = if !dev.cs && !dev.rd {
            dev.data
        } else {
            dev.idle_bus
        };
        let byte = if self.line == LineId::DataHigh { high } else { low };
        dev.events.push(Event::Bus(self.line, byte));
        Ok(byte)
    }
}

pub struct SimDelay(Rc<RefCell<Device>>);

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.borrow_mut().events.push(Event::Delay(ns.div_ceil(1000)));
    }

    fn delay_us(&mut self, us: u32) {
        self.0.borrow_mut().events.push(Event::Delay(us));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.0.borrow_mut().events.push(Event::Delay(ms * 1000));
    }
}

/// Input pin stuck at one level.
pub struct FixedPin(pub bool);

impl ErrorType for FixedPin {
    type Error = Infallible;
}

impl InputPin for FixedPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.0)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.0)
    }
}

/// Byte sink for report output.
#[derive(Default)]
pub struct Sink(pub Vec<u8>);

impl Sink {
    pub fn text(&self) -> &str {
        core::str::from_utf8(&self.0).unwrap()
    }
}

impl embedded_io::ErrorType for Sink {
    type Error = Infallible;
}

impl embedded_io::Write for Sink {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.0.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
