//! Protocol timing
//!
//! Every wait between two signal transitions has its own named interval so that a device
//! revision or a slower board can be accommodated by changing one number. All intervals are in
//! microseconds and are issued through [`DelayNs::delay_us`](embedded_hal::delay::DelayNs).
//!
//! Default: values derived from the AD7616 datasheet, rounded up to whole microseconds.

/// Timing configuration for the acquisition sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timing {
    /// Hold RESET high before the reset pulse.
    pub reset_idle_us: u32,
    /// Width of the RESET low pulse. A full reset needs at least 1.2 us.
    pub reset_pulse_us: u32,
    /// Wait after RESET returns high before the device accepts a conversion (t_DEVICE_SETUP).
    pub reset_recovery_us: u32,
    /// Wait before the pre-conversion bus probe.
    pub probe_settle_us: u32,
    /// Wait after CONVST rises before BUSY is first sampled.
    pub convst_settle_us: u32,
    /// Wait between two BUSY samples.
    pub busy_poll_us: u32,
    /// Wait after CS falls before RD falls.
    pub cs_settle_us: u32,
    /// Wait after RD falls before the buses are sampled.
    pub rd_pulse_us: u32,
    /// Wait after RD rises before CS is released.
    pub rd_release_us: u32,
    /// Maximum number of BUSY samples that may read high before the conversion is declared
    /// stuck. Never zero.
    pub max_busy_polls: u32,
}

impl Default for Timing {
    fn default() -> Self {
        Timing {
            reset_idle_us: 1,
            reset_pulse_us: 2,
            reset_recovery_us: 15_000,
            probe_settle_us: 1,
            convst_settle_us: 1,
            busy_poll_us: 1,
            cs_settle_us: 1,
            rd_pulse_us: 1,
            rd_release_us: 1,
            // Worst-case conversion is a few microseconds; this is comfortably above it.
            max_busy_polls: 10_000,
        }
    }
}

impl Timing {
    /// Uses the same interval for every wait.
    pub const fn uniform(us: u32, max_busy_polls: u32) -> Self {
        Timing {
            reset_idle_us: us,
            reset_pulse_us: us,
            reset_recovery_us: us,
            probe_settle_us: us,
            convst_settle_us: us,
            busy_poll_us: us,
            cs_settle_us: us,
            rd_pulse_us: us,
            rd_release_us: us,
            max_busy_polls: clamp_polls(max_busy_polls),
        }
    }

    /// Second-scale waits for bring-up with a logic probe or LEDs on the lines: two seconds
    /// around the reset pulse and one second everywhere else.
    pub const fn legacy() -> Self {
        const SECOND: u32 = 1_000_000;
        Timing {
            reset_idle_us: 2 * SECOND,
            reset_pulse_us: 2 * SECOND,
            reset_recovery_us: 2 * SECOND,
            probe_settle_us: SECOND,
            convst_settle_us: SECOND,
            busy_poll_us: SECOND,
            cs_settle_us: SECOND,
            rd_pulse_us: SECOND,
            rd_release_us: SECOND,
            max_busy_polls: 60,
        }
    }

    /// Sets the three reset intervals.
    pub const fn with_reset(mut self, idle_us: u32, pulse_us: u32, recovery_us: u32) -> Self {
        self.reset_idle_us = idle_us;
        self.reset_pulse_us = pulse_us;
        self.reset_recovery_us = recovery_us;
        self
    }

    /// Sets the wait before the pre-conversion probe.
    pub const fn with_probe_settle(mut self, us: u32) -> Self {
        self.probe_settle_us = us;
        self
    }

    /// Sets the CONVST settle interval.
    pub const fn with_convst_settle(mut self, us: u32) -> Self {
        self.convst_settle_us = us;
        self
    }

    /// Sets the BUSY poll interval and bound.
    pub const fn with_busy_poll(mut self, us: u32, max_polls: u32) -> Self {
        self.busy_poll_us = us;
        self.max_busy_polls = clamp_polls(max_polls);
        self
    }

    /// Sets the read strobe intervals.
    pub const fn with_read(mut self, cs_settle_us: u32, rd_pulse_us: u32, rd_release_us: u32) -> Self {
        self.cs_settle_us = cs_settle_us;
        self.rd_pulse_us = rd_pulse_us;
        self.rd_release_us = rd_release_us;
        self
    }

    /// Upper bound, in microseconds, on the time spent polling BUSY before a timeout.
    pub fn busy_timeout_us(&self) -> u64 {
        self.convst_settle_us as u64 + self.max_busy_polls as u64 * self.busy_poll_us as u64
    }
}

const fn clamp_polls(polls: u32) -> u32 {
    if polls == 0 {
        1
    } else {
        polls
    }
}
