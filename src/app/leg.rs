//! Leg actuator: one motor, its sensing, its PID loop, and its limits.
//!
//! A leg never decides where to go. The [`LiftSystem`](super::system::LiftSystem)
//! hands it a target height each control pass and picks the primitive
//! (`move_to`, `smooth_stop`, `hard_stop`); the leg closes the loop on its
//! own effective height and refuses any command that would drive further
//! into a pressed limit switch.

use log::{debug, warn};

use crate::config::{LegConfig, SystemConfig};
use crate::control::{PidController, PidMode};
use crate::sensors::{LegMeasurement, LegSensors};

use super::ports::{AnglePort, MotorPort, SwitchPort};
use super::state::{LegState, LegStatus};

pub struct Leg {
    index: u8,
    config: LegConfig,
    error_threshold: i64,
    settle_timeout_ms: u32,

    state: LegState,
    status: LegStatus,

    sensors: LegSensors,
    pid: PidController,

    /// Cumulative tracked height from the latest measurement.
    height: i64,
    /// Calibration correction; effective height = `height - height_offset`.
    height_offset: i64,
    upper_pressed: bool,
    lower_pressed: bool,

    /// When the current smooth stop began.
    stopping_since: Option<u32>,
}

impl Leg {
    pub fn new(index: u8, config: LegConfig, system: &SystemConfig, now_ms: u32) -> Self {
        Self {
            index,
            config,
            error_threshold: system.error_threshold,
            settle_timeout_ms: system.settle_timeout_ms,
            state: LegState::Stopped,
            status: LegStatus::Fine,
            sensors: LegSensors::new(&config, system.debounce_ms, now_ms),
            pid: PidController::new(&system.pid, now_ms),
            height: 0,
            height_offset: 0,
            upper_pressed: false,
            lower_pressed: false,
            stopping_since: None,
        }
    }

    // ── Sensing ───────────────────────────────────────────────────

    /// Seed sensing from the first reading at power-up.
    pub fn setup<H: SwitchPort + AnglePort>(&mut self, hw: &mut H, now_ms: u32) {
        self.sensors.seed(hw, now_ms);
        self.height = self.sensors.tracker().height();
    }

    /// Poll this leg's own sensors.
    pub fn sample<H: SwitchPort + AnglePort>(&mut self, hw: &mut H, now_ms: u32) {
        let m = self.sensors.read(hw, now_ms);
        self.apply_measurement(&m);
    }

    /// Adopt a measurement, whether sampled locally or handed over.
    pub fn apply_measurement(&mut self, m: &LegMeasurement) {
        self.height = m.height;
        self.upper_pressed = m.upper_limit;
        self.lower_pressed = m.lower_limit;
    }

    /// Re-derive the limit status from the debounced switches.
    pub fn update_status(&mut self) -> LegStatus {
        self.status = LegStatus::from_switches(self.upper_pressed, self.lower_pressed);
        self.status
    }

    // ── Motion primitives ─────────────────────────────────────────

    /// Freeze the loop and cut the motor.
    pub fn hard_stop<M: MotorPort>(&mut self, motor: &mut M) {
        self.pid.set_mode(PidMode::Off);
        self.set_speed(0, motor);
    }

    /// Close the loop on `target` for one pass.
    pub fn move_to<M: MotorPort>(&mut self, target: i64, motor: &mut M, now_ms: u32) {
        self.stopping_since = None;
        self.drive_towards(target, motor, now_ms);
    }

    /// Settle on `target`, then stop. Gives up after the settle timeout.
    pub fn smooth_stop<M: MotorPort>(&mut self, target: i64, motor: &mut M, now_ms: u32) {
        if self.state == LegState::Stopped {
            return;
        }
        if (self.effective_height() - target).abs() < self.error_threshold {
            self.hard_stop(motor);
            return;
        }

        let since = *self.stopping_since.get_or_insert(now_ms);
        if now_ms.wrapping_sub(since) >= self.settle_timeout_ms {
            warn!(
                "leg {}: settle timeout, {} counts off target",
                self.index,
                self.effective_height() - target
            );
            self.hard_stop(motor);
            return;
        }

        self.drive_towards(target, motor, now_ms);
        if self.state != LegState::Stopped {
            self.state = LegState::Stopping;
        }
    }

    /// Command the motor. Positive raises the leg.
    ///
    /// Refuses to drive up while the upper switch is pressed, down while
    /// the lower one is, and either way while both are.
    pub fn set_speed<M: MotorPort>(&mut self, speed: i32, motor: &mut M) {
        let blocked = match self.status {
            LegStatus::UpperLimited => speed > 0,
            LegStatus::LowerLimited => speed < 0,
            LegStatus::Malfunction => speed != 0,
            LegStatus::Fine => false,
        };
        let speed = if blocked {
            debug!("leg {}: {:?} blocks speed {speed}", self.index, self.status);
            0
        } else {
            speed
        };

        let command = if self.config.inverted { speed.saturating_neg() } else { speed };
        if let Err(e) = motor.set_motor(self.config.motor_channel, command) {
            warn!("leg {}: motor channel {}: {e}", self.index, self.config.motor_channel);
        }

        self.state = match speed.signum() {
            0 => LegState::Stopped,
            1 => LegState::MovingUp,
            _ => LegState::MovingDown,
        };
        if self.state == LegState::Stopped {
            self.stopping_since = None;
        }
    }

    /// Take the current tracked height as zero.
    pub fn update_offset(&mut self) {
        self.height_offset = self.height;
        debug!("leg {}: zeroed at tracked height {}", self.index, self.height);
    }

    fn drive_towards<M: MotorPort>(&mut self, target: i64, motor: &mut M, now_ms: u32) {
        self.pid.set_mode(PidMode::On);
        let current = self.effective_height();
        let speed = self.pid.control(target, current, now_ms);
        debug!("leg {}: target={target} current={current} speed={speed}", self.index);
        self.set_speed(speed, motor);
    }

    // ── Observers ─────────────────────────────────────────────────

    pub fn index(&self) -> u8 {
        self.index
    }

    pub fn config(&self) -> &LegConfig {
        &self.config
    }

    pub fn state(&self) -> LegState {
        self.state
    }

    pub fn status(&self) -> LegStatus {
        self.status
    }

    /// Tracked height, before the calibration offset.
    pub fn height(&self) -> i64 {
        self.height
    }

    pub fn height_offset(&self) -> i64 {
        self.height_offset
    }

    pub fn effective_height(&self) -> i64 {
        self.height - self.height_offset
    }

    pub fn pid_mode(&self) -> PidMode {
        self.pid.mode()
    }

    pub fn stale_reads(&self) -> u32 {
        self.sensors.stale_reads()
    }
}
