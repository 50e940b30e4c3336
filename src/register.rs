//! Register addresses for the AS5600 sensor.

/// Register addresses for the AS5600.
///
/// Double-byte registers are addressed by their MSB register; the LSB lives
/// at the next address (e.g. `ZPos` = 0x01 MSB, 0x02 LSB).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
#[repr(u8)]
pub enum Register {
    /// ZMCO: number of times ZPOS/MPOS have been permanently burned (max 3)
    Zmco = 0x00,
    /// Zero (start) position, MSB at 0x01, LSB at 0x02
    ZPos = 0x01,
    /// Maximum (stop) position, MSB at 0x03, LSB at 0x04
    MPos = 0x03,
    /// Maximum angle, MSB at 0x05, LSB at 0x06
    MAng = 0x05,
    /// Configuration, MSB at 0x07, LSB at 0x08
    Conf = 0x07,
    /// Magnet status (MD/ML/MH bits)
    Status = 0x0B,
    /// Raw angle, unaffected by ZPOS/MPOS/MANG, MSB at 0x0C, LSB at 0x0D
    RawAngle = 0x0C,
    /// Scaled angle mapped through ZPOS/MPOS/MANG, MSB at 0x0E, LSB at 0x0F
    Angle = 0x0E,
    /// Automatic gain control value
    Agc = 0x1A,
    /// CORDIC magnitude, MSB at 0x1B, LSB at 0x1C
    Magnitude = 0x1B,
    /// Permanent burning of ZPOS/MPOS/MANG/CONF into OTP memory
    Burn = 0xFF,
}

impl From<Register> for u8 {
    fn from(reg: Register) -> u8 {
        reg as u8
    }
}

bitfield::bitfield! {
    /// STATUS
    ///
    /// Magnet detection flags. Bit layout: `0 0 MD ML MH 0 0 0`
    pub struct StatusRegister(u8);
    impl Debug;
    u8;
    /// Magnet detected
    pub md, _: 5;
    /// AGC maximum overflow: magnet too weak
    pub ml, _: 4;
    /// AGC minimum overflow: magnet too strong
    pub mh, _: 3;
}

bitfield::bitfield! {
    /// CONF
    ///
    /// 14-bit configuration word, read and written MSB-first
    /// (0x07 holds bits 13:8, 0x08 holds bits 7:0)
    pub struct ConfRegister(u16);
    impl Debug;
    u8;
    /// Watchdog: automatic low-power entry when the angle stays static
    pub wd, set_wd: 13;
    /// Fast filter threshold
    pub fth, set_fth: 12, 10;
    /// Slow filter step response
    pub sf, set_sf: 9, 8;
    /// PWM frequency
    pub pwmf, set_pwmf: 7, 6;
    /// Output stage: `00` analog full range, `01` analog reduced range,
    /// `10` digital PWM
    pub outs, set_outs: 5, 4;
    /// Hysteresis on the output
    pub hyst, set_hyst: 3, 2;
    /// Power mode
    pub pm, set_pm: 1, 0;
}

/// Output stage selection for the OUT pin (CONF OUTS field).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputMode {
    /// Analog output, full range 0-100% of GND to VDD
    AnalogFull,
    /// Analog output, reduced range 10-90% of GND to VDD
    AnalogReduced,
    /// Digital PWM output
    DigitalPwm,
}

impl OutputMode {
    /// OUTS field encoding for this mode
    #[must_use]
    pub const fn bits(self) -> u8 {
        match self {
            OutputMode::AnalogFull => 0b00,
            OutputMode::AnalogReduced => 0b01,
            OutputMode::DigitalPwm => 0b10,
        }
    }
}
