use crate::regs::{Atmega, Register, RegisterFile, ADEN, ADSC, MUX_MASK, PRESCALER_DIV128, REFS0};
#[cfg(feature = "mux5")]
use crate::regs::MUX5;
use crate::Error;
use core::cell::Cell;
use core::convert::Infallible;
use critical_section::Mutex;
use embedded_hal::adc::{Channel, OneShot};

/// Marker type for the AVR ADC, used as the `ADC` parameter of
/// [`Channel`] and [`OneShot`].
#[derive(Debug, Clone, Copy)]
pub struct Avr;

/// A bare analog channel, for use with [`OneShot`] without calibration.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pin<const CHAN: u8>;

impl<const CHAN: u8> Channel<Avr> for Pin<CHAN> {
    type ID = u8;

    fn channel() -> u8 {
        CHAN
    }
}

/// The ADC peripheral, shared by every [`AnalogInput`](crate::AnalogInput).
///
/// The converter always runs with a /128 clock prescaler and AVCC as the
/// voltage reference. Configuration happens once, the first time
/// [`ensure_initialized`](AdcController::ensure_initialized) is called.
///
/// The multiplexer and start/status registers are shared mutable state with
/// no locking. The controller is `!Sync`; to read channels from both an
/// interrupt handler and the main loop, wrap it in a
/// `critical_section::Mutex` and serialize all reads through it.
#[derive(Debug)]
pub struct AdcController<R> {
    regs: R,
    enabled: Cell<bool>,
}

impl AdcController<Atmega> {
    /// Returns the memory-mapped controller the first time it is called,
    /// `None` afterwards.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use analog_input::{AdcController, AnalogInput};
    ///
    /// let adc = AdcController::take().unwrap();
    /// let pot: AnalogInput<_, 0> = AnalogInput::new(&adc);
    ///
    /// let raw = pot.read();
    /// ```
    pub fn take() -> Option<Self> {
        static TAKEN: Mutex<Cell<bool>> = Mutex::new(Cell::new(false));

        critical_section::with(|cs| {
            if TAKEN.borrow(cs).replace(true) {
                None
            } else {
                Some(Self::new(Atmega::new()))
            }
        })
    }
}

impl<R: RegisterFile> AdcController<R> {
    /// Wraps a register file. The peripheral is left untouched until the
    /// first [`ensure_initialized`](AdcController::ensure_initialized).
    pub const fn new(regs: R) -> Self {
        Self {
            regs,
            enabled: Cell::new(false),
        }
    }

    /// Destroys the controller and returns the register file.
    pub fn free(self) -> R {
        self.regs
    }

    /// Returns the underlying register file.
    pub fn registers(&self) -> &R {
        &self.regs
    }

    /// Whether the converter has been enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    /// Enables the converter with a /128 prescaler and the AVCC reference.
    /// Every call after the first is a no-op.
    pub fn ensure_initialized(&self) {
        if self.enabled.get() {
            return;
        }

        self.regs.modify(Register::Adcsra, |r| r | ADEN | PRESCALER_DIV128);
        self.regs.modify(Register::Admux, |r| r | REFS0);
        self.enabled.set(true);

        #[cfg(feature = "defmt")]
        defmt::trace!("ADC enabled: prescaler /128, reference AVCC");
    }

    /// Disconnects the digital input buffer of `channel`'s pin.
    pub fn disable_digital_input(&self, channel: u8) {
        let register = if channel < 8 {
            Register::Didr0
        } else {
            Register::Didr2
        };

        self.regs.modify(register, |r| r | 1 << (channel & MUX_MASK));
    }

    /// Routes `channel` to the converter and starts a conversion.
    pub fn start(&self, channel: u8) {
        self.regs.modify(Register::Admux, |r| (r & !MUX_MASK) | (channel & MUX_MASK));

        #[cfg(feature = "mux5")]
        self.regs.modify(Register::Adcsrb, |r| {
            if channel > 7 {
                r | MUX5
            } else {
                r & !MUX5
            }
        });

        self.regs.modify(Register::Adcsra, |r| r | ADSC);
    }

    /// Returns the result of the conversion started by
    /// [`start`](AdcController::start), or `WouldBlock` while it is still
    /// running.
    pub fn poll(&self) -> nb::Result<u16, Infallible> {
        if self.regs.read(Register::Adcsra) & ADSC != 0 {
            Err(nb::Error::WouldBlock)
        } else {
            Ok(self.regs.read_result())
        }
    }

    /// Performs one conversion on `channel` and returns the 10-bit code.
    ///
    /// Spins on the busy flag with no timeout: if the converter never
    /// finishes, neither does this call.
    pub fn convert(&self, channel: u8) -> u16 {
        self.start(channel);

        match nb::block!(self.poll()) {
            Ok(raw) => raw,
            Err(never) => match never {},
        }
    }

    /// Like [`convert`](AdcController::convert), but gives up after polling
    /// the busy flag `max_polls` times.
    ///
    /// A conversion that timed out keeps running in hardware; the next
    /// conversion is only reliable once it has finished.
    pub fn try_convert(&self, channel: u8, max_polls: u32) -> Result<u16, Error> {
        self.start(channel);

        for _ in 0..max_polls {
            match self.poll() {
                Ok(raw) => return Ok(raw),
                Err(nb::Error::WouldBlock) => {}
                Err(nb::Error::Other(never)) => match never {},
            }
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("ADC channel {} timed out after {} polls", channel, max_polls);

        Err(Error::Timeout)
    }
}

impl<R, PIN> OneShot<Avr, u16, PIN> for AdcController<R>
where
    R: RegisterFile,
    PIN: Channel<Avr, ID = u8>,
{
    type Error = Infallible;

    fn read(&mut self, _pin: &mut PIN) -> nb::Result<u16, Self::Error> {
        self.ensure_initialized();

        Ok(self.convert(PIN::channel()))
    }
}
