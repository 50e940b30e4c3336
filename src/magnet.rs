//! Magnet presence and field strength decoding.

use crate::register::StatusRegister;

/// Magnet placement reported by the STATUS register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MagnetStatus {
    /// No magnet detected (MD clear)
    NotDetected,
    /// Magnet detected but too weak: AGC at maximum (MD + ML)
    TooWeak,
    /// Magnet detected with field strength in range (MD only)
    JustRight,
    /// Magnet detected but too strong: AGC at minimum (MD + MH)
    TooStrong,
}

impl MagnetStatus {
    /// Whether a magnet is present at all, regardless of field strength
    #[must_use]
    pub const fn detected(self) -> bool {
        !matches!(self, MagnetStatus::NotDetected)
    }

    /// Whether the field strength is within the recommended range
    #[must_use]
    pub const fn field_ok(self) -> bool {
        matches!(self, MagnetStatus::JustRight)
    }
}

impl From<StatusRegister> for MagnetStatus {
    fn from(status: StatusRegister) -> Self {
        if !status.md() {
            MagnetStatus::NotDetected
        } else if status.ml() {
            MagnetStatus::TooWeak
        } else if status.mh() {
            MagnetStatus::TooStrong
        } else {
            MagnetStatus::JustRight
        }
    }
}
