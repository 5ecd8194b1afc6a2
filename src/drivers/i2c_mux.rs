//! 8-port I2C multiplexer (TCA9548A-style).
//!
//! Every angle sensor shares one fixed bus address, so each leg's sensor
//! sits behind its own downstream port. Selecting a port writes a one-hot
//! control byte to the multiplexer; the sensor transaction that follows
//! goes to that port only.
//!
//! The multiplexer does not own the bus. The caller passes the bus into
//! each call, which keeps a single owner for the shared resource.

use embedded_hal::i2c::I2c;

use crate::error::SensorError;
use crate::pins::{MULTIPLEXER_ADDRESS, MULTIPLEXER_PORTS};

#[derive(Debug, Clone, Copy)]
pub struct I2cMultiplexer {
    address: u8,
}

impl Default for I2cMultiplexer {
    fn default() -> Self {
        Self::new(MULTIPLEXER_ADDRESS)
    }
}

impl I2cMultiplexer {
    pub fn new(address: u8) -> Self {
        Self { address }
    }

    /// Route the bus to `port`. Ports beyond the last one are ignored and
    /// generate no bus traffic; returns whether a port was selected.
    pub fn select<I2C: I2c>(&self, bus: &mut I2C, port: u8) -> Result<bool, SensorError> {
        if port >= MULTIPLEXER_PORTS {
            return Ok(false);
        }
        bus.write(self.address, &[1 << port])
            .map_err(|_| SensorError::BusFault)?;
        Ok(true)
    }

    /// Disconnect every downstream port.
    pub fn deselect_all<I2C: I2c>(&self, bus: &mut I2C) -> Result<(), SensorError> {
        bus.write(self.address, &[0])
            .map_err(|_| SensorError::BusFault)
    }

    pub fn address(&self) -> u8 {
        self.address
    }
}
