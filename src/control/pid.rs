//! Sampled PID position controller for the leg motors.
//!
//! - Recomputes at most once per `sample_interval_ms`; between samples the
//!   last command is held, independent of how often the loop polls.
//! - The integral accumulator is clamped to the output range (anti-windup).
//! - The derivative acts on the measurement, not the error, so a step in
//!   the setpoint does not kick the output.
//! - `Off` freezes the controller on its last output. Switching back `On`
//!   zeroes the integral and re-primes the sampler.

use crate::config::PidConfig;

/// Whether the controller is computing or frozen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PidMode {
    On,
    Off,
}

/// PID controller
#[derive(Debug, Clone)]
pub struct PidController {
    kp: f32,
    ki: f32,
    kd: f32,
    sample_interval_ms: u32,
    output_min: i32,
    output_max: i32,

    mode: PidMode,
    integral: f32,
    previous_input: i64,
    previous_output: i32,
    last_sample_ms: u32,
    /// Next `control` computes immediately with no derivative.
    primed: bool,
}

impl PidController {
    /// Build a controller from validated gains. Starts `Off`.
    pub fn new(config: &PidConfig, now_ms: u32) -> Self {
        debug_assert!(config.output_min < config.output_max);
        debug_assert!(config.sample_interval_ms > 0);
        Self {
            kp: config.kp,
            ki: config.ki,
            kd: config.kd,
            sample_interval_ms: config.sample_interval_ms,
            output_min: config.output_min,
            output_max: config.output_max,
            mode: PidMode::Off,
            integral: 0.0,
            previous_input: 0,
            previous_output: 0,
            last_sample_ms: now_ms,
            primed: true,
        }
    }

    /// Switch mode. `Off -> On` restarts the integral from zero.
    pub fn set_mode(&mut self, mode: PidMode) {
        if mode == PidMode::On && self.mode == PidMode::Off {
            self.integral = 0.0;
            self.primed = true;
        }
        self.mode = mode;
    }

    /// Compute the actuator command for `input` tracking `setpoint`.
    pub fn control(&mut self, setpoint: i64, input: i64, now_ms: u32) -> i32 {
        if self.mode == PidMode::Off {
            return self.previous_output;
        }
        if !self.primed && now_ms.wrapping_sub(self.last_sample_ms) < self.sample_interval_ms {
            return self.previous_output;
        }

        let min = self.output_min as f32;
        let max = self.output_max as f32;

        let error = (setpoint - input) as f32;
        self.integral = (self.integral + self.ki * error).clamp(min, max);

        let derivative = if self.primed {
            0.0
        } else {
            (input - self.previous_input) as f32
        };

        let output = (self.kp * error + self.integral - self.kd * derivative).clamp(min, max);
        let output = output as i32;

        self.primed = false;
        self.last_sample_ms = now_ms;
        self.previous_input = input;
        self.previous_output = output;
        output
    }

    pub fn mode(&self) -> PidMode {
        self.mode
    }

    pub fn integral(&self) -> f32 {
        self.integral
    }

    pub fn previous_output(&self) -> i32 {
        self.previous_output
    }
}
