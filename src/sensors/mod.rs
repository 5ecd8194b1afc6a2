//! Sensor subsystem: leg position tracking and the per-leg sensing hub.
//!
//! [`LegSensors`] owns everything one leg senses: the angle tracker and the
//! two debounced limit switches. Each poll it produces a [`LegMeasurement`]
//! that the leg actuator consumes. In a split installation the same
//! measurement is produced on a remote sensing unit and handed over (see
//! [`crate::remote`]).

pub mod encoder;
pub mod position;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::app::ports::{AnglePort, SwitchPort};
use crate::config::LegConfig;
use crate::drivers::debounce::DebouncedInput;
use position::PositionTracker;

/// One poll's worth of leg sensing: tracked height and debounced switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LegMeasurement {
    /// Cumulative tracked height in sensor counts (no calibration offset).
    pub height: i64,
    pub upper_limit: bool,
    pub lower_limit: bool,
}

/// Sensing hub for one leg.
#[derive(Debug, Clone)]
pub struct LegSensors {
    encoder_port: u8,
    upper_pin: u8,
    lower_pin: u8,
    active_low: bool,

    tracker: PositionTracker,
    upper: DebouncedInput,
    lower: DebouncedInput,

    /// Tracker has a reference angle from a real reading.
    seeded: bool,
    /// Angle substituted when the sensor read fails.
    last_angle: u16,
    /// Consecutive polls that fell back on `last_angle`.
    stale_reads: u32,
}

impl LegSensors {
    pub fn new(leg: &LegConfig, debounce_ms: u32, now_ms: u32) -> Self {
        Self {
            encoder_port: leg.encoder_port,
            upper_pin: leg.upper_switch_pin,
            lower_pin: leg.lower_switch_pin,
            active_low: leg.switches_active_low,
            tracker: PositionTracker::new(),
            upper: DebouncedInput::new(debounce_ms, false, now_ms),
            lower: DebouncedInput::new(debounce_ms, false, now_ms),
            seeded: false,
            last_angle: 0,
            stale_reads: 0,
        }
    }

    /// Seed the tracker and both debouncers from a first reading so the
    /// first poll registers neither a jump nor a settle delay.
    pub fn seed<H: SwitchPort + AnglePort>(&mut self, hw: &mut H, now_ms: u32) {
        match hw.read_angle(self.encoder_port) {
            Ok(angle) => self.seed_angle(angle),
            Err(e) => warn!(
                "encoder port {}: seed read failed ({e}), seeding on first good read",
                self.encoder_port
            ),
        }
        if let Ok(level) = hw.read_switch(self.upper_pin) {
            self.upper.seed(self.pressed(level), now_ms);
        }
        if let Ok(level) = hw.read_switch(self.lower_pin) {
            self.lower.seed(self.pressed(level), now_ms);
        }
    }

    /// Poll every sensor once.
    ///
    /// A failed angle read reuses the last good angle (zero motion this
    /// poll); a failed switch read leaves that debouncer untouched. If the
    /// tracker was never seeded, the first good angle seeds it instead of
    /// counting as motion.
    pub fn read<H: SwitchPort + AnglePort>(&mut self, hw: &mut H, now_ms: u32) -> LegMeasurement {
        let angle = match hw.read_angle(self.encoder_port) {
            Ok(angle) => {
                if !self.seeded {
                    self.seed_angle(angle);
                }
                if self.stale_reads > 0 {
                    info!(
                        "encoder port {}: recovered after {} stale reads",
                        self.encoder_port, self.stale_reads
                    );
                }
                self.stale_reads = 0;
                self.last_angle = angle;
                angle
            }
            Err(e) => {
                if self.stale_reads == 0 {
                    warn!("encoder port {}: {e}, holding last angle", self.encoder_port);
                }
                self.stale_reads = self.stale_reads.saturating_add(1);
                self.last_angle
            }
        };
        let height = self.tracker.update(angle);

        let upper_limit = match hw.read_switch(self.upper_pin) {
            Ok(level) => self.upper.update(self.pressed(level), now_ms),
            Err(_) => self.upper.stable(),
        };
        let lower_limit = match hw.read_switch(self.lower_pin) {
            Ok(level) => self.lower.update(self.pressed(level), now_ms),
            Err(_) => self.lower.stable(),
        };

        LegMeasurement {
            height,
            upper_limit,
            lower_limit,
        }
    }

    pub fn stale_reads(&self) -> u32 {
        self.stale_reads
    }

    pub fn tracker(&self) -> &PositionTracker {
        &self.tracker
    }

    fn seed_angle(&mut self, angle: u16) {
        self.tracker.seed(angle);
        self.last_angle = angle;
        self.seeded = true;
    }

    fn pressed(&self, level: bool) -> bool {
        level != self.active_low
    }
}
