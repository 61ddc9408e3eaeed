//! Acquired data
//!
//! A [`Sample`] is one 16-bit conversion result, captured as two bytes. It can only be built by
//! the sequencer while CS and RD are both asserted, so a sample taken outside the read window
//! cannot exist. Bus contents read without the strobes (the pre-conversion probe) come back as a
//! [`BusProbe`] instead, which is a diagnostic and never a measurement.

/// Joins two bus bytes into the 16-bit result: `(high << 8) | low`.
#[inline]
pub const fn combine(low: u8, high: u8) -> u16 {
    ((high as u16) << 8) | low as u16
}

/// Splits a 16-bit result into `(low, high)`.
#[inline]
pub const fn decompose(word: u16) -> (u8, u8) {
    (word as u8, (word >> 8) as u8)
}

/// One conversion result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sample {
    low_byte: u8,
    high_byte: u8,
}

impl Sample {
    pub(crate) fn new(low_byte: u8, high_byte: u8) -> Self {
        Sample {
            low_byte,
            high_byte,
        }
    }

    /// Bits 0-7, from DATA_LOW.
    #[inline]
    pub fn low_byte(&self) -> u8 {
        self.low_byte
    }

    /// Bits 8-15, from DATA_HIGH.
    #[inline]
    pub fn high_byte(&self) -> u8 {
        self.high_byte
    }

    /// The raw 16-bit code.
    #[inline]
    pub fn raw(&self) -> u16 {
        combine(self.low_byte, self.high_byte)
    }

    /// The result as a signed code. The AD7616 outputs twos complement.
    #[inline]
    pub fn code(&self) -> i16 {
        self.raw() as i16
    }

    /// Product of the two bytes, as printed by early bring-up firmware. Only meaningful for
    /// comparing against logs from that firmware.
    #[inline]
    pub fn legacy_product(&self) -> u16 {
        self.low_byte as u16 * self.high_byte as u16
    }

    /// Converts the code to microvolts for a bipolar input range of `+/- range_mv`.
    pub fn to_microvolts(&self, range_mv: u16) -> i32 {
        (self.code() as i64 * range_mv as i64 * 1000 / 32768) as i32
    }
}

/// Bus contents read without a conversion or read strobe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusProbe {
    /// DATA_LOW as read
    pub low_byte: u8,
    /// DATA_HIGH as read
    pub high_byte: u8,
}

impl BusProbe {
    /// Both bytes joined the same way as a [`Sample`].
    #[inline]
    pub fn raw(&self) -> u16 {
        combine(self.low_byte, self.high_byte)
    }

    /// Product of the two bytes. See [`Sample::legacy_product`].
    #[inline]
    pub fn legacy_product(&self) -> u16 {
        self.low_byte as u16 * self.high_byte as u16
    }
}
