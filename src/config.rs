//! System configuration parameters
//!
//! All tunable parameters for the lift controller. Consumed once at
//! construction; the control core never re-reads them behind the host's
//! back. Hosts typically ship a JSON document and call [`load_json`].

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::pins;

/// Upper bound on legs: one per multiplexer port.
pub const MAX_LEGS: usize = pins::MULTIPLEXER_PORTS as usize;

const _: () = assert!(pins::LEGS.len() <= MAX_LEGS);

/// What the system does while in `Stopping`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StopPolicy {
    /// Cut every motor immediately.
    #[default]
    Hard,
    /// Let each leg's loop settle on the shared height, bounded by
    /// `settle_timeout_ms`.
    Smooth,
}

/// Where leg measurements come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SensingMode {
    /// The system polls each leg's sensors itself on every tick.
    #[default]
    Local,
    /// A remote sensing unit pushes measurements in via
    /// [`LiftSystem::apply_measurement`](crate::app::system::LiftSystem::apply_measurement).
    Remote,
}

/// PID gains, cadence, and output range shared by every leg.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PidConfig {
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
    /// Minimum time between two recomputes.
    pub sample_interval_ms: u32,
    /// Most negative command (full speed down).
    pub output_min: i32,
    /// Most positive command (full speed up).
    pub output_max: i32,
}

impl Default for PidConfig {
    fn default() -> Self {
        Self {
            kp: 2.0,
            ki: 0.2,
            kd: 0.2,
            sample_interval_ms: 50,
            // 10-bit PWM resolution, symmetric around zero
            output_min: -1023,
            output_max: 1023,
        }
    }
}

/// Wiring of one leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegConfig {
    /// Motor channel passed to [`MotorPort`](crate::app::ports::MotorPort).
    pub motor_channel: u8,
    /// Flip the sign of every motor command (motor wired in reverse).
    pub inverted: bool,
    /// Multiplexer port of this leg's angle sensor.
    pub encoder_port: u8,
    pub upper_switch_pin: u8,
    pub lower_switch_pin: u8,
    /// Limit switches read low when pressed.
    pub switches_active_low: bool,
}

impl From<pins::LegPins> for LegConfig {
    fn from(p: pins::LegPins) -> Self {
        Self {
            motor_channel: p.motor_channel,
            inverted: false,
            encoder_port: p.encoder_port,
            upper_switch_pin: p.upper_limit_gpio,
            lower_switch_pin: p.lower_limit_gpio,
            switches_active_low: true,
        }
    }
}

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Control ---
    pub pid: PidConfig,
    /// Distance (sensor counts) under which a leg counts as on target.
    pub error_threshold: i64,
    /// Budget for a smooth stop before the leg is cut regardless of error.
    pub settle_timeout_ms: u32,
    pub stop_policy: StopPolicy,

    // --- Virtual axis ---
    /// Shared setpoint velocity in sensor rotations per millisecond.
    pub rotations_per_ms: f32,
    /// Longest expected gap between two polls. Together with
    /// `rotations_per_ms` this bounds motion per sample below half a turn.
    pub max_poll_interval_ms: u32,

    // --- Inputs ---
    /// Settle time for the limit switches.
    pub debounce_ms: u32,
    /// Settle time for the panel buttons.
    pub input_delay_ms: u32,
    /// Bus-read deadline for one angle sample.
    pub sensor_deadline_ms: u32,
    pub sensing: SensingMode,

    // --- Calibration ---
    /// Give up calibrating after this long. `None` waits forever.
    pub calibration_timeout_ms: Option<u32>,

    // --- Telemetry ---
    pub telemetry_interval_ms: u32,

    pub legs: heapless::Vec<LegConfig, MAX_LEGS>,
}

impl Default for SystemConfig {
    fn default() -> Self {
        let mut legs = heapless::Vec::new();
        for p in pins::LEGS {
            legs.push(LegConfig::from(p)).ok();
        }

        Self {
            pid: PidConfig::default(),
            error_threshold: 10,
            settle_timeout_ms: 2000,
            stop_policy: StopPolicy::Hard,

            rotations_per_ms: 0.001, // one rotation per second
            max_poll_interval_ms: 100,

            debounce_ms: 25,
            input_delay_ms: 50,
            sensor_deadline_ms: 10,
            sensing: SensingMode::Local,

            calibration_timeout_ms: None,

            telemetry_interval_ms: 1000,

            legs,
        }
    }
}

impl SystemConfig {
    /// Check every construction-time precondition.
    pub fn validate(&self) -> Result<(), Error> {
        let pid = &self.pid;
        if pid.output_min >= 0 || pid.output_max <= 0 {
            return Err(Error::Config("pid output range must straddle zero"));
        }
        if pid.sample_interval_ms == 0 {
            return Err(Error::Config("pid sample interval must be non-zero"));
        }
        let gains_ok = [pid.kp, pid.ki, pid.kd]
            .iter()
            .all(|g| g.is_finite() && *g >= 0.0);
        if !gains_ok {
            return Err(Error::Config("pid gains must be finite and non-negative"));
        }
        if self.error_threshold <= 0 {
            return Err(Error::Config("error threshold must be positive"));
        }
        if !(self.rotations_per_ms.is_finite() && self.rotations_per_ms > 0.0) {
            return Err(Error::Config("rotations_per_ms must be positive"));
        }
        if self.rotations_per_ms * self.max_poll_interval_ms as f32 >= 0.5 {
            return Err(Error::Config(
                "virtual axis moves half a rotation or more per poll",
            ));
        }

        if self.legs.is_empty() {
            return Err(Error::Config("at least one leg is required"));
        }
        for (i, leg) in self.legs.iter().enumerate() {
            if leg.encoder_port >= pins::MULTIPLEXER_PORTS {
                return Err(Error::Config("encoder port beyond multiplexer range"));
            }
            for other in &self.legs[i + 1..] {
                if other.encoder_port == leg.encoder_port {
                    return Err(Error::Config("encoder port shared by two legs"));
                }
                if other.motor_channel == leg.motor_channel {
                    return Err(Error::Config("motor channel shared by two legs"));
                }
            }
        }
        Ok(())
    }

    /// Counts the virtual axis advances per millisecond.
    pub fn counts_per_ms(&self) -> f32 {
        crate::sensors::position::ROTATION_UNITS as f32 * self.rotations_per_ms
    }
}

/// Parse and validate a JSON configuration document. Missing fields take
/// their defaults.
pub fn load_json(text: &str) -> anyhow::Result<SystemConfig> {
    let config: SystemConfig =
        serde_json::from_str(text).context("parsing lift configuration")?;
    if let Err(e) = config.validate() {
        bail!("invalid lift configuration: {e}");
    }
    Ok(config)
}
