use embedded_hal::adc::{Channel, OneShot};

type Error<Adc, ADC, Pin> = nb::Error<<Adc as OneShot<ADC, u16, Pin>>::Error>;

/// Largest code the 10-bit converter produces.
pub const MAX_CODE: u16 = 1023;

/// Sector count used when none is given.
pub const DEFAULT_SECTORS: u8 = 16;

const PERCENT_SCALE: f32 = 100.0 / MAX_CODE as f32;

/// Constants turning a raw code into engineering units or a sector number.
///
/// Engineering units follow the straight line through `(0, zero)` and
/// `(1023, span)`. Sectors split the raw range `0..=1023` into equal bands.
///
/// # Examples
///
/// ```
/// use analog_input::Calibration;
///
/// let calibration = Calibration::with_range(-40.0, 125.0);
///
/// assert_eq!(calibration.eng(0), -40.0);
/// assert!((calibration.eng(1023) - 125.0).abs() < 1e-3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Calibration {
    scale: f32,
    offset: f32,
    sector_divisor: u16,
}

impl Calibration {
    /// 0.0 to 100.0 (%) engineering range and 16 sectors.
    pub fn new() -> Self {
        Self {
            scale: PERCENT_SCALE,
            offset: 0.0,
            sector_divisor: MAX_CODE / u16::from(DEFAULT_SECTORS - 1),
        }
    }

    /// Splits the input range into bands `1023 / (sectors - 1)` codes wide.
    ///
    /// The divisor is rounded down, so unless `sectors - 1` divides 1023
    /// the top codes land in sectors past `sectors - 1`. The largest sector
    /// returned is `1023 / sector_divisor`: 102 for 100 sectors, 255 for
    /// 255 sectors.
    ///
    /// `sectors` must be at least 2 or this function will panic when
    /// running in debug mode.
    pub fn with_sectors(sectors: u8) -> Self {
        debug_assert!(sectors >= 2, "An analog input needs at least 2 sectors");

        Self {
            scale: PERCENT_SCALE,
            offset: 0.0,
            sector_divisor: MAX_CODE / u16::from(sectors.wrapping_sub(1)),
        }
    }

    /// Maps 0 V to `zero` and the reference voltage to `span`. `span` may
    /// be below `zero` for inverted sensors.
    pub fn with_range(zero: f32, span: f32) -> Self {
        Self {
            scale: (span - zero) / MAX_CODE as f32,
            offset: zero,
            sector_divisor: MAX_CODE / u16::from(DEFAULT_SECTORS - 1),
        }
    }

    /// Engineering units per raw code.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Engineering value at raw code 0.
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Width of one sector in raw codes.
    pub fn sector_divisor(&self) -> u16 {
        self.sector_divisor
    }

    /// Converts a raw code into engineering units.
    pub fn eng(&self, raw: u16) -> f32 {
        f32::from(raw) * self.scale + self.offset
    }

    /// Converts a raw code into its sector number.
    pub fn sector(&self, raw: u16) -> u16 {
        raw / self.sector_divisor
    }

    /// Samples `pin` with any [`OneShot`] ADC and returns the value in
    /// engineering units.
    ///
    /// # Examples
    ///
    /// ```
    /// use analog_input::Calibration;
    /// # use embedded_hal_mock::adc::{Mock, MockChan0, Transaction};
    /// #
    /// # let expectations: [Transaction<u16>; 1] = [Transaction::read(0, 1023)];
    /// # let mut adc = Mock::new(&expectations);
    /// # let mut pin = MockChan0 {};
    ///
    /// let calibration = Calibration::with_range(0.0, 5.0);
    ///
    /// let volts = calibration.read_eng(&mut adc, &mut pin).unwrap();
    /// assert!((volts - 5.0).abs() < 1e-3);
    /// ```
    pub fn read_eng<Adc, ADC, Pin>(
        &self,
        adc: &mut Adc,
        pin: &mut Pin,
    ) -> Result<f32, Error<Adc, ADC, Pin>>
    where
        Pin: Channel<ADC>,
        Adc: OneShot<ADC, u16, Pin>,
    {
        let raw = adc.read(pin)?;

        Ok(self.eng(raw))
    }

    /// Samples `pin` with any [`OneShot`] ADC and returns its sector.
    pub fn read_sector<Adc, ADC, Pin>(
        &self,
        adc: &mut Adc,
        pin: &mut Pin,
    ) -> Result<u16, Error<Adc, ADC, Pin>>
    where
        Pin: Channel<ADC>,
        Adc: OneShot<ADC, u16, Pin>,
    {
        let raw = adc.read(pin)?;

        Ok(self.sector(raw))
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self::new()
    }
}
