//! AS5600 magnetic angle sensors behind the I2C multiplexer.
//!
//! Every leg's lead screw carries a diametric magnet read by an AS5600.
//! The sensors share one address, so [`As5600Bus`] owns the bus, routes it
//! through the [`I2cMultiplexer`] per read, and returns the 12-bit raw
//! angle.
//!
//! ## Bounded reads
//!
//! A read is retried until it succeeds or the deadline elapses on the
//! injected [`Clock`]. The control loop is never held longer than
//! `deadline_ms` (plus one bus transaction). On expiry the read fails with
//! [`SensorError::Timeout`]; the last good value per port stays available
//! through [`As5600Bus::last_good`] so callers can substitute it.

use embedded_hal::i2c::I2c;
use log::{debug, warn};

use crate::app::ports::{AnglePort, Clock};
use crate::drivers::i2c_mux::I2cMultiplexer;
use crate::error::SensorError;
use crate::pins::MULTIPLEXER_PORTS;

/// 7-bit I2C address of the AS5600.
pub const AS5600_ADDRESS: u8 = 0x36;

/// Raw angle, 12 bits, big-endian high byte first.
const REG_RAW_ANGLE: u8 = 0x0C;
/// Magnet status: MD / ML / MH flags.
const REG_STATUS: u8 = 0x0B;

const STATUS_MAGNET_DETECTED: u8 = 0x20;
const STATUS_MAGNET_WEAK: u8 = 0x10;
const STATUS_MAGNET_STRONG: u8 = 0x08;

const ANGLE_MASK: u16 = 0x0FFF;

/// Field strength reported by the sensor's status register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MagnetStrength {
    /// No magnet detected.
    None,
    /// Magnet too far away.
    Weak,
    /// Within the recommended air gap.
    Perfect,
    /// Magnet too close.
    Strong,
}

impl MagnetStrength {
    fn from_status(status: u8) -> Self {
        if status & STATUS_MAGNET_DETECTED == 0 {
            Self::None
        } else if status & STATUS_MAGNET_WEAK != 0 {
            Self::Weak
        } else if status & STATUS_MAGNET_STRONG != 0 {
            Self::Strong
        } else {
            Self::Perfect
        }
    }
}

/// Owner of the shared sensor bus.
pub struct As5600Bus<I2C, C> {
    bus: I2C,
    mux: I2cMultiplexer,
    clock: C,
    deadline_ms: u32,
    last_good: [Option<u16>; MULTIPLEXER_PORTS as usize],
    is_setup: bool,
}

impl<I2C, C> As5600Bus<I2C, C>
where
    I2C: I2c,
    C: Clock,
{
    pub fn new(bus: I2C, mux: I2cMultiplexer, clock: C, deadline_ms: u32) -> Self {
        Self {
            bus,
            mux,
            clock,
            deadline_ms,
            last_good: [None; MULTIPLEXER_PORTS as usize],
            is_setup: false,
        }
    }

    /// Put the multiplexer in a known state. Safe to call repeatedly.
    pub fn setup(&mut self) -> Result<(), SensorError> {
        if self.is_setup {
            return Ok(());
        }
        self.mux.deselect_all(&mut self.bus)?;
        self.is_setup = true;
        debug!("AS5600 bus ready (mux 0x{:02x})", self.mux.address());
        Ok(())
    }

    /// Raw angle on `port`, retried until the deadline.
    pub fn raw_angle(&mut self, port: u8) -> Result<u16, SensorError> {
        if port >= MULTIPLEXER_PORTS {
            return Err(SensorError::NotConnected);
        }

        let start = self.clock.now_ms();
        loop {
            match self.try_raw_angle(port) {
                Ok(angle) => {
                    self.last_good[port as usize] = Some(angle);
                    return Ok(angle);
                }
                Err(e) => {
                    if self.clock.now_ms().wrapping_sub(start) >= self.deadline_ms {
                        warn!("AS5600 port {port}: no reply within {} ms ({e})", self.deadline_ms);
                        return Err(SensorError::Timeout);
                    }
                }
            }
        }
    }

    /// Last angle successfully read on `port`, if any.
    pub fn last_good(&self, port: u8) -> Option<u16> {
        self.last_good.get(port as usize).copied().flatten()
    }

    pub fn magnet_strength(&mut self, port: u8) -> Result<MagnetStrength, SensorError> {
        if port >= MULTIPLEXER_PORTS {
            return Err(SensorError::NotConnected);
        }
        let mut status = [0u8; 1];
        self.read_register(port, REG_STATUS, &mut status)?;
        Ok(MagnetStrength::from_status(status[0]))
    }

    pub fn magnet_detected(&mut self, port: u8) -> Result<bool, SensorError> {
        Ok(self.magnet_strength(port)? != MagnetStrength::None)
    }

    pub fn release(self) -> I2C {
        self.bus
    }

    // ── Internal ──────────────────────────────────────────────────

    fn try_raw_angle(&mut self, port: u8) -> Result<u16, SensorError> {
        let mut buf = [0u8; 2];
        self.read_register(port, REG_RAW_ANGLE, &mut buf)?;
        Ok(u16::from_be_bytes(buf) & ANGLE_MASK)
    }

    fn read_register(&mut self, port: u8, reg: u8, buf: &mut [u8]) -> Result<(), SensorError> {
        self.mux.select(&mut self.bus, port)?;
        self.bus
            .write_read(AS5600_ADDRESS, &[reg], buf)
            .map_err(|_| SensorError::BusFault)
    }
}

impl<I2C, C> AnglePort for As5600Bus<I2C, C>
where
    I2C: I2c,
    C: Clock,
{
    fn read_angle(&mut self, port: u8) -> Result<u16, SensorError> {
        self.raw_angle(port)
    }
}
