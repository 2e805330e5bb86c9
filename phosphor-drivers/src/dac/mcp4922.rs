//! MCP4922 dual 12-bit SPI DAC
//!
//! # Command frame
//!
//! Each write is one 16-bit frame, MSB first, latched when CS rises
//! (LDAC tied low):
//!
//! | bit | meaning                          |
//! |-----|----------------------------------|
//! | 15  | channel (0 = A, 1 = B)           |
//! | 14  | VREF buffered                    |
//! | 13  | gain (1 = 1x, 0 = 2x)            |
//! | 12  | active (0 = channel shut down)   |
//! | 11-0| data                             |
//!
//! Channel A drives X and channel B drives Y. These frames are the same
//! routed half-words the point buffer stores, so the streaming backend
//! can shift buffer words straight out.

use embedded_hal::spi::SpiBus;
use phosphor_core::buffer::{DATA_MASK, X_ROUTE, Y_ROUTE};
use phosphor_hal::{DacChannel, DualDac, OutputPin};

/// DAC errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DacError {
    /// SPI bus reported a failure
    Spi,
}

/// Command frame for `code` on `channel`
pub fn command(channel: DacChannel, code: u16) -> u16 {
    let route = match channel {
        DacChannel::X => X_ROUTE,
        DacChannel::Y => Y_ROUTE,
    };
    route | (code & DATA_MASK)
}

/// MCP4922 on an SPI bus with a dedicated chip select
pub struct Mcp4922<SPI, CS> {
    spi: SPI,
    cs: CS,
}

impl<SPI: SpiBus, CS: OutputPin> Mcp4922<SPI, CS> {
    pub fn new(spi: SPI, mut cs: CS) -> Self {
        cs.set_high();
        Self { spi, cs }
    }

    fn send(&mut self, frame: u16) -> Result<(), DacError> {
        self.cs.set_low();
        let result = self
            .spi
            .write(&frame.to_be_bytes())
            .and_then(|_| self.spi.flush())
            .map_err(|_| DacError::Spi);
        // Rising CS latches the frame
        self.cs.set_high();
        result
    }
}

impl<SPI: SpiBus, CS: OutputPin> DualDac for Mcp4922<SPI, CS> {
    type Error = DacError;

    fn write(&mut self, channel: DacChannel, code: u16) -> Result<(), DacError> {
        self.send(command(channel, code))
    }
}
