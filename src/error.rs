/// Error type for AS5600 operations
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Communication error with the sensor
    Communication(E),
    /// Burn refused: no magnet detected
    MagnetNotDetected,
    /// Burn refused: no burn cycles left (ZMCO limit)
    BurnLimitReached,
    /// Burn refused: neither start nor end position is set
    PositionsNotSet,
    /// Burn refused: maximum angle below the 18 degree minimum
    MaxAngleTooSmall,
}
