//! Register-level view of the AVR ADC peripheral.

use core::ptr::{read_volatile, write_volatile};

/// ADCSRA: ADC enable.
pub const ADEN: u8 = 1 << 7;
/// ADCSRA: start conversion. Reads as set while a conversion is in progress.
pub const ADSC: u8 = 1 << 6;
/// ADCSRA: prescaler select bits, all set for a /128 clock divider.
pub const PRESCALER_DIV128: u8 = 0b111;
/// ADMUX: AVCC with external capacitor at AREF.
pub const REFS0: u8 = 1 << 6;
/// ADMUX: low channel-select bits MUX2:0.
pub const MUX_MASK: u8 = 0b111;
/// ADCSRB: extended channel-select bit for channels 8-15.
pub const MUX5: u8 = 1 << 3;

/// The ADC registers touched by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Register {
    Adcl,
    Adch,
    Adcsra,
    Adcsrb,
    Admux,
    Didr2,
    Didr0,
}

impl Register {
    /// Data-space address on ATmega328P / ATmega2560.
    pub const fn address(self) -> usize {
        match self {
            Register::Adcl => 0x78,
            Register::Adch => 0x79,
            Register::Adcsra => 0x7A,
            Register::Adcsrb => 0x7B,
            Register::Admux => 0x7C,
            Register::Didr2 => 0x7D,
            Register::Didr0 => 0x7E,
        }
    }
}

/// Byte-wide access to the ADC register block.
///
/// Methods take `&self`: registers are shared hardware state, not owned
/// memory, so implementations use volatile access or interior mutability.
pub trait RegisterFile {
    /// Reads one register.
    fn read(&self, register: Register) -> u8;

    /// Writes one register.
    fn write(&self, register: Register, value: u8);

    /// Read-modify-write of one register.
    fn modify<F>(&self, register: Register, f: F)
    where
        F: FnOnce(u8) -> u8,
    {
        let value = self.read(register);
        self.write(register, f(value));
    }

    /// Reads the 10-bit conversion result.
    ///
    /// ADCL must be read before ADCH; reading ADCL locks the result until
    /// ADCH has been read.
    fn read_result(&self) -> u16 {
        let low = u16::from(self.read(Register::Adcl));
        let high = u16::from(self.read(Register::Adch));

        ((high << 8) | low) & 0x03FF
    }
}

/// The memory-mapped ADC of an ATmega microcontroller.
///
/// Only obtainable through [`AdcController::take`](crate::AdcController::take).
#[derive(Debug)]
pub struct Atmega {
    _private: (),
}

impl Atmega {
    pub(crate) const fn new() -> Self {
        Self { _private: () }
    }
}

impl RegisterFile for Atmega {
    fn read(&self, register: Register) -> u8 {
        // SAFETY: `Register::address` only yields ADC I/O registers, and an
        // `Atmega` exists at most once per program.
        unsafe { read_volatile(register.address() as *const u8) }
    }

    fn write(&self, register: Register, value: u8) {
        // SAFETY: see `read`.
        unsafe { write_volatile(register.address() as *mut u8, value) }
    }
}
