//! Remote sensing unit and the measurement handoff.
//!
//! In a split installation each leg's sensors are read by a separate unit
//! that forwards [`LegMeasurement`]s to the controller. This module holds
//! the sensing side and the compact binary form of a measurement. How the
//! bytes travel is up to the host.

use log::debug;

use crate::app::ports::{AnglePort, SwitchPort};
use crate::config::LegConfig;
use crate::error::{Error, Result};
use crate::sensors::{LegMeasurement, LegSensors};

/// Worst-case encoded size of a [`LegMeasurement`].
pub const MEASUREMENT_MAX_SIZE: usize = 12;

/// Sensing side of a split leg.
pub struct RemoteSensor {
    sensors: LegSensors,
    is_setup: bool,
}

impl RemoteSensor {
    pub fn new(leg: &LegConfig, debounce_ms: u32, now_ms: u32) -> Self {
        Self {
            sensors: LegSensors::new(leg, debounce_ms, now_ms),
            is_setup: false,
        }
    }

    /// Seed from a first reading. Repeated calls do nothing.
    pub fn setup<H: SwitchPort + AnglePort>(&mut self, hw: &mut H, now_ms: u32) {
        if self.is_setup {
            return;
        }
        self.sensors.seed(hw, now_ms);
        self.is_setup = true;
        debug!("remote sensor seeded");
    }

    /// Poll once and produce the measurement to forward.
    pub fn sample<H: SwitchPort + AnglePort>(&mut self, hw: &mut H, now_ms: u32) -> LegMeasurement {
        self.sensors.read(hw, now_ms)
    }

    pub fn is_setup(&self) -> bool {
        self.is_setup
    }

    pub fn stale_reads(&self) -> u32 {
        self.sensors.stale_reads()
    }
}

impl LegMeasurement {
    /// Serialise into `buf`, returning the used prefix.
    pub fn encode<'a>(&self, buf: &'a mut [u8]) -> Result<&'a mut [u8]> {
        postcard::to_slice(self, buf).map_err(|_| Error::Measurement("buffer too small"))
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        postcard::from_bytes(bytes).map_err(|_| Error::Measurement("malformed measurement"))
    }
}
