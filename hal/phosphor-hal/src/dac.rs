//! Dual-channel DAC abstraction
//!
//! The pulse-sequencing backend positions the beam one sample at a time,
//! so all it needs from the converter is "put this code on this axis".

/// DAC output channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DacChannel {
    /// Horizontal deflection
    X,
    /// Vertical deflection
    Y,
}

/// Two-channel 12-bit DAC
pub trait DualDac {
    /// Error type for DAC writes
    type Error;

    /// Write a 12-bit code to one channel
    ///
    /// Codes above 4095 are truncated to 12 bits by the implementation.
    fn write(&mut self, channel: DacChannel, code: u16) -> Result<(), Self::Error>;

    /// Write both channels, X first
    fn write_xy(&mut self, x: u16, y: u16) -> Result<(), Self::Error> {
        self.write(DacChannel::X, x)?;
        self.write(DacChannel::Y, y)
    }
}
