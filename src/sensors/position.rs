//! Multi-turn position tracking from a single-turn angle sensor.
//!
//! The sensor reports an absolute angle within one rotation only. Each
//! sample, the tracker assumes the lead screw took the shorter arc from the
//! previous angle and accumulates that signed delta into an unbounded
//! height. This is correct as long as true motion between two samples stays
//! under half a rotation; faster motion silently tracks the wrong way.
//! `SystemConfig::validate` enforces the bound for the virtual axis.

/// Counts per sensor rotation (12-bit magnetic encoder).
pub const ROTATION_UNITS: u16 = 1 << 12;

const UNITS: i64 = ROTATION_UNITS as i64;

/// Unwraps consecutive angle samples into a cumulative height.
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionTracker {
    cumulative_height: i64,
    previous_angle: u16,
}

impl PositionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take `raw_angle` as the reference for the next sample without
    /// moving the height. Call once with the first reading at power-up.
    pub fn seed(&mut self, raw_angle: u16) {
        self.previous_angle = raw_angle % ROTATION_UNITS;
    }

    /// Overwrite the cumulative height, keeping the angle reference.
    pub fn rebase(&mut self, height: i64) {
        self.cumulative_height = height;
    }

    /// Feed one raw sample in `[0, ROTATION_UNITS)`; returns the new height.
    pub fn update(&mut self, raw_angle: u16) -> i64 {
        let current = i64::from(raw_angle % ROTATION_UNITS);
        let previous = i64::from(self.previous_angle);

        let increase = (current - previous + UNITS) % UNITS;
        let decrease = (previous - current + UNITS) % UNITS;
        if increase > decrease {
            self.cumulative_height -= decrease;
        } else {
            self.cumulative_height += increase;
        }

        self.previous_angle = current as u16;
        self.cumulative_height
    }

    pub fn height(&self) -> i64 {
        self.cumulative_height
    }

    pub fn previous_angle(&self) -> u16 {
        self.previous_angle
    }
}
