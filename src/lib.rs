//! Analog inputs for the built-in 10-bit ADC of AVR microcontrollers.
//!
//! The converter is shared by every input: an [`AdcController`] owns the
//! registers and each [`AnalogInput`] borrows it. The first input that is
//! constructed enables the converter with a /128 clock prescaler and AVCC
//! as the voltage reference.
//!
//! An input can be read three ways:
//!
//! - [`AnalogInput::read`]: the raw code, `0..=1023`
//! - [`AnalogInput::read_eng`]: the code scaled into engineering units
//! - [`AnalogInput::read_sector`]: which of N equal bands the code is in
//!
//! # Examples
//!
//! ```no_run
//! use analog_input::{AdcController, AnalogInput};
//!
//! let adc = AdcController::take().unwrap();
//!
//! let pot: AnalogInput<_, 0> = AnalogInput::new(&adc);
//! let thermistor: AnalogInput<_, 1> = AnalogInput::with_range(&adc, -40.0, 125.0);
//! let selector: AnalogInput<_, 9> = AnalogInput::with_sectors(&adc, 5);
//!
//! let raw = pot.read();
//! let celsius = thermistor.read_eng();
//! let position = selector.read_sector();
//! ```
//!
//! # Features
//!
//! - `mux5` (default): program the extended MUX5 bit for channels 8-15, as
//!   found on the ATmega2560. Without it only MUX2:0 are written.
//! - `defmt`: log initialization and timeouts, and derive `defmt::Format`.
#![cfg_attr(not(test), no_std)]

mod analog_input;
mod calibration;
mod controller;
#[cfg(test)]
mod mock;
pub mod regs;

use core::fmt;

pub use analog_input::AnalogInput;
pub use calibration::{Calibration, DEFAULT_SECTORS, MAX_CODE};
pub use controller::{AdcController, Avr, Pin};

/// Errors from the bounded conversion methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The converter was still busy after the allowed number of polls.
    Timeout,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Timeout => f.write_str("ADC conversion timed out"),
        }
    }
}
