use crate::{calibration::Calibration, controller::AdcController, regs::RegisterFile, Error};

/// An analog input on ADC channel `CHAN` (0-15).
///
/// Three ways to construct it, depending on how the input is read:
///
/// - [`new`](AnalogInput::new): [`read`](AnalogInput::read) the raw code,
///   or convert with `u16::from(&input)`.
/// - [`with_range`](AnalogInput::with_range):
///   [`read_eng`](AnalogInput::read_eng) returns engineering units.
/// - [`with_sectors`](AnalogInput::with_sectors):
///   [`read_sector`](AnalogInput::read_sector) returns which band of the
///   raw range the input is in.
///
/// Every constructor enables the shared [`AdcController`] if it is not
/// running yet and disables the digital input buffer on the channel's pin.
///
/// `CHAN` above 15 is rejected at compile time:
///
/// ```compile_fail
/// use analog_input::{AdcController, AnalogInput};
///
/// let adc = AdcController::take().unwrap();
/// let input: AnalogInput<_, 16> = AnalogInput::new(&adc);
/// ```
#[derive(Debug)]
pub struct AnalogInput<'a, R, const CHAN: u8> {
    adc: &'a AdcController<R>,
    calibration: Calibration,
}

impl<'a, R: RegisterFile, const CHAN: u8> AnalogInput<'a, R, CHAN> {
    const CHANNEL_IN_RANGE: () = assert!(CHAN < 16, "ADC channel must be in 0..=15");

    /// Returns an input with a 0.0 to 100.0 (%) engineering range and 16
    /// sectors.
    pub fn new(adc: &'a AdcController<R>) -> Self {
        Self::with_calibration(adc, Calibration::new())
    }

    /// Returns an input whose [`read_sector`](AnalogInput::read_sector)
    /// splits the raw range into `sectors` bands.
    ///
    /// Band width is `1023 / (sectors - 1)` codes, rounded down. When
    /// `sectors - 1` does not divide 1023 the top codes spill into extra
    /// sectors: the largest sector is `1023 / sector_divisor`, which can
    /// exceed `sectors - 1`.
    ///
    /// `sectors` must be at least 2 or this function will panic when
    /// running in debug mode.
    pub fn with_sectors(adc: &'a AdcController<R>, sectors: u8) -> Self {
        Self::with_calibration(adc, Calibration::with_sectors(sectors))
    }

    /// Returns an input whose [`read_eng`](AnalogInput::read_eng) yields
    /// `zero` at 0 V and `span` at the reference voltage.
    pub fn with_range(adc: &'a AdcController<R>, zero: f32, span: f32) -> Self {
        Self::with_calibration(adc, Calibration::with_range(zero, span))
    }

    /// Returns an input using a prebuilt `calibration`.
    pub fn with_calibration(adc: &'a AdcController<R>, calibration: Calibration) -> Self {
        let () = Self::CHANNEL_IN_RANGE;

        adc.ensure_initialized();
        adc.disable_digital_input(CHAN);

        Self { adc, calibration }
    }

    /// Returns the constants computed at construction.
    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Samples the input and returns the raw code, `0..=1023`.
    ///
    /// Blocks for one conversion. Reads on different inputs must not
    /// interleave (for example from an interrupt handler).
    pub fn read(&self) -> u16 {
        self.adc.convert(CHAN)
    }

    /// Samples the input and returns it scaled into engineering units.
    pub fn read_eng(&self) -> f32 {
        self.calibration.eng(self.read())
    }

    /// Samples the input and returns its sector number.
    pub fn read_sector(&self) -> u16 {
        self.calibration.sector(self.read())
    }

    /// Like [`read`](AnalogInput::read), but returns
    /// [`Error::Timeout`] if the conversion has not finished after
    /// `max_polls` checks of the busy flag.
    pub fn try_read(&self, max_polls: u32) -> Result<u16, Error> {
        self.adc.try_convert(CHAN, max_polls)
    }
}

impl<R: RegisterFile, const CHAN: u8> From<&AnalogInput<'_, R, CHAN>> for u16 {
    fn from(input: &AnalogInput<'_, R, CHAN>) -> u16 {
        input.read()
    }
}
