//! Blocking driver for the AS5600 magnetic position sensor

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{I2c, SevenBitAddress};

use crate::{
    error::Error,
    magnet::MagnetStatus,
    register::{ConfRegister, OutputMode, Register, StatusRegister},
};

/// Fixed 7-bit I2C address of the AS5600
pub const DEVICE_ADDRESS: u8 = 0x36;

/// Maximum angle value (12-bit: 0-4095, representing 0-360°)
pub const ANGLE_MAX: u16 = 0x0FFF + 1;

/// BURN command to permanently write ZPOS/MPOS (at most 3 times per part)
#[allow(dead_code)]
pub(crate) const BURN_ANGLE: u8 = 0x80;
/// BURN command to permanently write MANG/CONF (once per part)
#[allow(dead_code)]
pub(crate) const BURN_SETTING: u8 = 0x40;

/// ZPOS/MPOS burn cycles available over the part's lifetime
pub(crate) const BURN_ANGLE_LIMIT: u8 = 3;

/// MANG values below this raw count map to less than 18°, the minimum
/// range the part accepts for a settings burn (0.087°/LSB)
pub(crate) const MIN_ANGLE_RAW: u32 = 18_000 / 87;

/// AS5600 driver instance (blocking)
///
/// The sensor holds no driver-side state: every accessor re-reads the
/// physical register. The delay is used to let register writes settle
/// before the next transfer
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct As5600<I2C, D> {
    i2c: I2C,
    delay: D,
}

impl<I2C, D, E> As5600<I2C, D>
where
    I2C: I2c<SevenBitAddress, Error = E>,
    D: DelayNs,
{
    /// Create a new AS5600 driver instance
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self { i2c, delay }
    }

    /// Release the I2C bus and delay, consuming the driver
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    /// The fixed 7-bit I2C address the driver talks to
    #[must_use]
    pub const fn address(&self) -> u8 {
        DEVICE_ADDRESS
    }

    /// Read a single-byte register
    fn read_u8(&mut self, register: Register) -> Result<u8, Error<E>> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(DEVICE_ADDRESS, &[register.into()], &mut buf)
            .map_err(Error::Communication)?;

        #[cfg(feature = "defmt")]
        defmt::trace!("Register 0x{:02X} value: 0x{:02X}", u8::from(register), buf[0]);

        Ok(buf[0])
    }

    /// Read a double-byte register, MSB register first
    fn read_u16(&mut self, register: Register) -> Result<u16, Error<E>> {
        let mut buf = [0u8; 2];
        self.i2c
            .write_read(DEVICE_ADDRESS, &[register.into()], &mut buf)
            .map_err(Error::Communication)?;

        let value = u16::from_be_bytes(buf);

        #[cfg(feature = "defmt")]
        defmt::trace!("Register 0x{:02X} value: 0x{:04X}", u8::from(register), value);

        Ok(value)
    }

    /// Write a single-byte register
    #[allow(dead_code)]
    fn write_u8(&mut self, register: Register, value: u8) -> Result<(), Error<E>> {
        #[cfg(feature = "defmt")]
        defmt::debug!("Writing 0x{:02X} to register 0x{:02X}", value, u8::from(register));

        self.i2c
            .write(DEVICE_ADDRESS, &[register.into(), value])
            .map_err(Error::Communication)?;

        self.delay.delay_ms(1);
        Ok(())
    }

    /// Write a double-byte register, MSB then LSB
    fn write_u16(&mut self, register: Register, value: u16) -> Result<(), Error<E>> {
        #[cfg(feature = "defmt")]
        defmt::debug!("Writing 0x{:04X} to register 0x{:02X}", value, u8::from(register));

        let [msb, lsb] = value.to_be_bytes();
        self.i2c
            .write(DEVICE_ADDRESS, &[register.into(), msb, lsb])
            .map_err(Error::Communication)?;

        self.delay.delay_ms(1);
        Ok(())
    }

    fn modify_conf(
        &mut self,
        f: impl FnOnce(&mut ConfRegister),
    ) -> Result<(), Error<E>> {
        let mut conf = ConfRegister(self.read_u16(Register::Conf)?);
        f(&mut conf);
        self.write_u16(Register::Conf, conf.0)
    }

    /// Get the raw STATUS register (MD/ML/MH flags)
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn status(&mut self) -> Result<StatusRegister, Error<E>> {
        self.read_u8(Register::Status).map(StatusRegister)
    }

    /// Check whether a magnet is detected (STATUS MD bit)
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn magnet_detected(&mut self) -> Result<bool, Error<E>> {
        self.status().map(|s| s.md())
    }

    /// Decode magnet presence and field strength from the STATUS register
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn magnet_status(&mut self) -> Result<MagnetStatus, Error<E>> {
        self.status().map(MagnetStatus::from)
    }

    /// Get the automatic gain control value
    ///
    /// In 5V operation the AGC range is 0-255; values near either end
    /// indicate the magnet is too close or too far
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn agc(&mut self) -> Result<u8, Error<E>> {
        self.read_u8(Register::Agc)
    }

    /// Get the CORDIC magnitude value
    ///
    /// Useful for checking magnet presence and strength
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn magnitude(&mut self) -> Result<u16, Error<E>> {
        self.read_u16(Register::Magnitude)
    }

    /// Get the 12-bit raw angle
    ///
    /// Start, end and max angle settings do not apply. Value ranges from
    /// 0 to 4095; use [`ANGLE_MAX`] for conversion calculations
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn raw_angle(&mut self) -> Result<u16, Error<E>> {
        self.read_u16(Register::RawAngle)
    }

    /// Get the 12-bit scaled angle
    ///
    /// Start, end and max angle settings are applied by the sensor
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn angle(&mut self) -> Result<u16, Error<E>> {
        self.read_u16(Register::Angle)
    }

    /// Get the raw angular position in degrees (0-359)
    ///
    /// Converts the 12-bit raw angle using integer arithmetic with
    /// saturation. The result is rounded down
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn angle_degrees(&mut self) -> Result<u16, Error<E>> {
        let angle = self.raw_angle()?;
        let degrees = (u32::from(angle).saturating_mul(360)) / u32::from(ANGLE_MAX);
        #[allow(clippy::cast_possible_truncation)]
        Ok(degrees as u16)
    }

    /// Get the zero (start) position register
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn zero_position(&mut self) -> Result<u16, Error<E>> {
        self.read_u16(Register::ZPos)
    }

    /// Set the zero (start) position register
    ///
    /// With `None` the current raw angle of the magnet is written instead.
    /// Returns the register content read back after the write
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn set_zero_position(&mut self, position: Option<u16>) -> Result<u16, Error<E>> {
        let value = match position {
            Some(position) => position,
            None => self.raw_angle()?,
        };
        self.write_u16(Register::ZPos, value)?;
        self.read_u16(Register::ZPos)
    }

    /// Get the end (stop) position register
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn end_position(&mut self) -> Result<u16, Error<E>> {
        self.read_u16(Register::MPos)
    }

    /// Set the end (stop) position register
    ///
    /// With `None` the current raw angle of the magnet is written instead.
    /// Returns the register content read back after the write
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn set_end_position(&mut self, position: Option<u16>) -> Result<u16, Error<E>> {
        let value = match position {
            Some(position) => position,
            None => self.raw_angle()?,
        };
        self.write_u16(Register::MPos, value)?;
        self.read_u16(Register::MPos)
    }

    /// Get the maximum angle register
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn max_angle(&mut self) -> Result<u16, Error<E>> {
        self.read_u16(Register::MAng)
    }

    /// Set the maximum angle register
    ///
    /// With `None` the current raw angle of the magnet is written instead.
    /// Setting this register zeroes out the end position register on the
    /// sensor. Returns the register content read back after the write
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn set_max_angle(&mut self, angle: Option<u16>) -> Result<u16, Error<E>> {
        let value = match angle {
            Some(angle) => angle,
            None => self.raw_angle()?,
        };
        self.write_u16(Register::MAng, value)?;
        self.read_u16(Register::MAng)
    }

    /// Get the CONF register
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn conf(&mut self) -> Result<ConfRegister, Error<E>> {
        self.read_u16(Register::Conf).map(ConfRegister)
    }

    /// Set the CONF register
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn set_conf(&mut self, conf: ConfRegister) -> Result<(), Error<E>> {
        self.write_u16(Register::Conf, conf.0)
    }

    /// Select the output stage of the OUT pin (CONF OUTS field),
    /// leaving the rest of CONF untouched
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn set_output_mode(&mut self, mode: OutputMode) -> Result<(), Error<E>> {
        self.modify_conf(|conf| conf.set_outs(mode.bits()))
    }

    /// Get the ZMCO register: how many times ZPOS/MPOS have been
    /// permanently burned into the part
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub fn burn_count(&mut self) -> Result<u8, Error<E>> {
        self.read_u8(Register::Zmco)
    }

    /// Burn the start and end positions into OTP memory
    ///
    /// THIS CAN ONLY BE DONE 3 TIMES per part. Preconditions are checked
    /// in order: a magnet must be detected, a burn cycle must be left,
    /// and at least one of ZPOS/MPOS must be non-zero
    ///
    /// The permanent write itself is disabled in this build: once the
    /// preconditions pass the operation returns `Ok(())` without touching
    /// the BURN register
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails or a precondition is
    /// not met ([`Error::MagnetNotDetected`], [`Error::BurnLimitReached`],
    /// [`Error::PositionsNotSet`])
    pub fn burn_angle(&mut self) -> Result<(), Error<E>> {
        let zero_position = self.zero_position()?;
        let end_position = self.end_position()?;

        if !self.magnet_detected()? {
            return Err(Error::MagnetNotDetected);
        }
        if self.burn_count()? >= BURN_ANGLE_LIMIT {
            return Err(Error::BurnLimitReached);
        }
        if zero_position == 0 && end_position == 0 {
            return Err(Error::PositionsNotSet);
        }

        #[cfg(feature = "defmt")]
        defmt::warn!("ZPOS/MPOS burn requested, but the OTP write is disabled in this build");

        // The one-time write consumes one of the part's three burn cycles
        // and cannot be undone. Left disabled; do not enable without
        // explicit confirmation that a cycle can be spent.
        // self.write_u8(Register::Burn, BURN_ANGLE)?;

        Ok(())
    }

    /// Burn the maximum angle and configuration into OTP memory
    ///
    /// THIS CAN ONLY BE DONE 1 TIME, and only while ZMCO is still zero.
    /// The maximum angle must be at or above 18°
    ///
    /// The permanent write itself is disabled in this build: once the
    /// preconditions pass the operation returns `Ok(())` without touching
    /// the BURN register
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails or a precondition is
    /// not met ([`Error::BurnLimitReached`], [`Error::MaxAngleTooSmall`])
    pub fn burn_settings(&mut self) -> Result<(), Error<E>> {
        let max_angle = self.max_angle()?;

        if self.burn_count()? != 0 {
            return Err(Error::BurnLimitReached);
        }
        if u32::from(max_angle) <= MIN_ANGLE_RAW {
            return Err(Error::MaxAngleTooSmall);
        }

        #[cfg(feature = "defmt")]
        defmt::warn!("MANG/CONF burn requested, but the OTP write is disabled in this build");

        // One-time write, same caveat as in burn_angle.
        // self.write_u8(Register::Burn, BURN_SETTING)?;

        Ok(())
    }
}
