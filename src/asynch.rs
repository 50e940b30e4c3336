//! Asynchronous driver for the AS5600 magnetic position sensor
//!
//! Same operations as the blocking [`crate::As5600`], awaited over
//! [`embedded_hal_async`] traits.

use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::{I2c, SevenBitAddress};

use crate::{
    driver::{BURN_ANGLE_LIMIT, DEVICE_ADDRESS, MIN_ANGLE_RAW},
    error::Error,
    magnet::MagnetStatus,
    register::{ConfRegister, OutputMode, Register, StatusRegister},
};

/// AS5600 driver instance (asynchronous)
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

    async fn read_u8(&mut self, register: Register) -> Result<u8, Error<E>> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(DEVICE_ADDRESS, &[register.into()], &mut buf)
            .await
            .map_err(Error::Communication)?;
        Ok(buf[0])
    }

    async fn read_u16(&mut self, register: Register) -> Result<u16, Error<E>> {
        let mut buf = [0u8; 2];
        self.i2c
            .write_read(DEVICE_ADDRESS, &[register.into()], &mut buf)
            .await
            .map_err(Error::Communication)?;
        Ok(u16::from_be_bytes(buf))
    }

    async fn write_u16(&mut self, register: Register, value: u16) -> Result<(), Error<E>> {
        let [msb, lsb] = value.to_be_bytes();
        self.i2c
            .write(DEVICE_ADDRESS, &[register.into(), msb, lsb])
            .await
            .map_err(Error::Communication)?;
        self.delay.delay_ms(1).await;
        Ok(())
    }

    /// Get the raw STATUS register (MD/ML/MH flags)
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub async fn status(&mut self) -> Result<StatusRegister, Error<E>> {
        self.read_u8(Register::Status).await.map(StatusRegister)
    }

    /// Check whether a magnet is detected (STATUS MD bit)
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub async fn magnet_detected(&mut self) -> Result<bool, Error<E>> {
        self.status().await.map(|s| s.md())
    }

    /// Decode magnet presence and field strength from the STATUS register
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub async fn magnet_status(&mut self) -> Result<MagnetStatus, Error<E>> {
        self.status().await.map(MagnetStatus::from)
    }

    /// Get the automatic gain control value
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub async fn agc(&mut self) -> Result<u8, Error<E>> {
        self.read_u8(Register::Agc).await
    }

    /// Get the CORDIC magnitude value
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub async fn magnitude(&mut self) -> Result<u16, Error<E>> {
        self.read_u16(Register::Magnitude).await
    }

    /// Get the 12-bit raw angle (0-4095)
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub async fn raw_angle(&mut self) -> Result<u16, Error<E>> {
        self.read_u16(Register::RawAngle).await
    }

    /// Get the 12-bit scaled angle
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub async fn angle(&mut self) -> Result<u16, Error<E>> {
        self.read_u16(Register::Angle).await
    }

    /// Get the raw angular position in degrees (0-359)
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub async fn angle_degrees(&mut self) -> Result<u16, Error<E>> {
        let angle = self.raw_angle().await?;
        let degrees =
            (u32::from(angle).saturating_mul(360)) / u32::from(crate::driver::ANGLE_MAX);
        #[allow(clippy::cast_possible_truncation)]
        Ok(degrees as u16)
    }

    /// Get the zero (start) position register
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub async fn zero_position(&mut self) -> Result<u16, Error<E>> {
        self.read_u16(Register::ZPos).await
    }

    /// Set the zero (start) position register; `None` uses the current
    /// raw angle. Returns the register content read back after the write
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub async fn set_zero_position(&mut self, position: Option<u16>) -> Result<u16, Error<E>> {
        let value = match position {
            Some(position) => position,
            None => self.raw_angle().await?,
        };
        self.write_u16(Register::ZPos, value).await?;
        self.read_u16(Register::ZPos).await
    }

    /// Get the end (stop) position register
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub async fn end_position(&mut self) -> Result<u16, Error<E>> {
        self.read_u16(Register::MPos).await
    }

    /// Set the end (stop) position register; `None` uses the current
    /// raw angle. Returns the register content read back after the write
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub async fn set_end_position(&mut self, position: Option<u16>) -> Result<u16, Error<E>> {
        let value = match position {
            Some(position) => position,
            None => self.raw_angle().await?,
        };
        self.write_u16(Register::MPos, value).await?;
        self.read_u16(Register::MPos).await
    }

    /// Get the maximum angle register
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub async fn max_angle(&mut self) -> Result<u16, Error<E>> {
        self.read_u16(Register::MAng).await
    }

    /// Set the maximum angle register; `None` uses the current raw angle.
    /// Returns the register content read back after the write
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub async fn set_max_angle(&mut self, angle: Option<u16>) -> Result<u16, Error<E>> {
        let value = match angle {
            Some(angle) => angle,
            None => self.raw_angle().await?,
        };
        self.write_u16(Register::MAng, value).await?;
        self.read_u16(Register::MAng).await
    }

    /// Get the CONF register
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub async fn conf(&mut self) -> Result<ConfRegister, Error<E>> {
        self.read_u16(Register::Conf).await.map(ConfRegister)
    }

    /// Set the CONF register
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub async fn set_conf(&mut self, conf: ConfRegister) -> Result<(), Error<E>> {
        self.write_u16(Register::Conf, conf.0).await
    }

    /// Select the output stage of the OUT pin (CONF OUTS field),
    /// leaving the rest of CONF untouched
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub async fn set_output_mode(&mut self, mode: OutputMode) -> Result<(), Error<E>> {
        let mut conf = ConfRegister(self.read_u16(Register::Conf).await?);
        conf.set_outs(mode.bits());
        self.write_u16(Register::Conf, conf.0).await
    }

    /// Get the ZMCO register (number of completed ZPOS/MPOS burns)
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails
    pub async fn burn_count(&mut self) -> Result<u8, Error<E>> {
        self.read_u8(Register::Zmco).await
    }

    /// Burn the start and end positions into OTP memory
    ///
    /// Same preconditions and the same disabled permanent write as the
    /// blocking [`crate::As5600::burn_angle`]
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails or a precondition is
    /// not met
    pub async fn burn_angle(&mut self) -> Result<(), Error<E>> {
        let zero_position = self.zero_position().await?;
        let end_position = self.end_position().await?;

        if !self.magnet_detected().await? {
            return Err(Error::MagnetNotDetected);
        }
        if self.burn_count().await? >= BURN_ANGLE_LIMIT {
            return Err(Error::BurnLimitReached);
        }
        if zero_position == 0 && end_position == 0 {
            return Err(Error::PositionsNotSet);
        }

        #[cfg(feature = "defmt")]
        defmt::warn!("ZPOS/MPOS burn requested, but the OTP write is disabled in this build");

        // See the blocking driver; the one-time write stays disabled.
        // self.write_u8(Register::Burn, BURN_ANGLE).await?;

        Ok(())
    }

    /// Burn the maximum angle and configuration into OTP memory
    ///
    /// Same preconditions and the same disabled permanent write as the
    /// blocking [`crate::As5600::burn_settings`]
    ///
    /// # Errors
    ///
    /// Returns an error if I2C communication fails or a precondition is
    /// not met
    pub async fn burn_settings(&mut self) -> Result<(), Error<E>> {
        let max_angle = self.max_angle().await?;

        if self.burn_count().await? != 0 {
            return Err(Error::BurnLimitReached);
        }
        if u32::from(max_angle) <= MIN_ANGLE_RAW {
            return Err(Error::MaxAngleTooSmall);
        }

        #[cfg(feature = "defmt")]
        defmt::warn!("MANG/CONF burn requested, but the OTP write is disabled in this build");

        // See the blocking driver; the one-time write stays disabled.
        // self.write_u8(Register::Burn, BURN_SETTING).await?;

        Ok(())
    }
}
