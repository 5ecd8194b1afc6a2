//! Port traits: the hexagonal boundary between the control core and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Leg / LiftSystem (domain)
//! ```
//!
//! Driven adapters (switches, angle sensors, motors, panel, clock, event
//! sinks) implement these traits. The [`LiftSystem`](super::system::LiftSystem)
//! consumes them via generics passed into each call, so the domain core
//! never touches hardware directly and never owns it.
//!
//! Port errors are typed. The core absorbs them where they happen; none of
//! them crosses a `tick` or `control` call.

use crate::error::{ActuatorError, SensorError};

use super::events::LiftEvent;

// ───────────────────────────────────────────────────────────────
// Sensor ports (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Raw digital inputs (limit switches).
pub trait SwitchPort {
    /// Raw electrical level of `pin`; `true` = high.
    fn read_switch(&mut self, pin: u8) -> Result<bool, SensorError>;
}

/// Single-turn angle sensors, one per multiplexer port.
pub trait AnglePort {
    /// Raw angle in `[0, ROTATION_UNITS)`. Implementations bound the bus
    /// wait by a deadline and return [`SensorError::Timeout`] on expiry.
    fn read_angle(&mut self, port: u8) -> Result<u16, SensorError>;
}

/// The operator's up / down buttons.
pub trait PanelPort {
    /// `(up_pressed, down_pressed)`, already mapped from electrical level.
    fn read_command_buttons(&mut self) -> Result<(bool, bool), SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

pub trait MotorPort {
    /// Drive `channel` at a signed speed within the PID output range.
    /// Positive raises the leg, zero stops it.
    fn set_motor(&mut self, channel: u8, speed: i32) -> Result<(), ActuatorError>;
}

// ───────────────────────────────────────────────────────────────
// Time port
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond counter. Wraps at `u32::MAX`; every consumer
/// computes elapsed time with `wrapping_sub`.
pub trait Clock {
    fn now_ms(&self) -> u32;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The core emits structured [`LiftEvent`]s through this port. Adapters
/// decide where they go (serial log, radio link, test recorder).
pub trait EventSink {
    fn emit(&mut self, event: &LiftEvent);
}

// ───────────────────────────────────────────────────────────────
// Aggregate
// ───────────────────────────────────────────────────────────────

/// Everything a locally sensed lift polls or drives in one tick.
pub trait LiftHardware: SwitchPort + AnglePort + MotorPort + PanelPort {}

impl<T: SwitchPort + AnglePort + MotorPort + PanelPort> LiftHardware for T {}
