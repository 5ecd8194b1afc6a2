//! Unified error types for the lift controller.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! host's error handling uniform. All variants are `Copy` so they can be
//! passed through the control loop without allocation.
//!
//! The control core itself never propagates these across a `tick` or
//! `control` call: port failures are absorbed where they happen (stale
//! sensor substitution, logged motor failures). They surface only from
//! construction, configuration, and the measurement handoff.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A sensor could not be read or returned unusable data.
    Sensor(SensorError),
    /// A motor command could not be written.
    Actuator(ActuatorError),
    /// Configuration is invalid. The string names the offending field.
    Config(&'static str),
    /// A leg index outside the configured set was addressed.
    UnknownLeg(u8),
    /// A remote measurement could not be encoded or decoded.
    Measurement(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::UnknownLeg(idx) => write!(f, "unknown leg index {idx}"),
            Self::Measurement(msg) => write!(f, "measurement: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The bus did not deliver a reply before the read deadline.
    Timeout,
    /// The bus reported a transfer error.
    BusFault,
    /// GPIO read returned an error.
    GpioReadFailed,
    /// Port or pin is not wired to any device.
    NotConnected,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "read deadline expired"),
            Self::BusFault => write!(f, "bus transfer failed"),
            Self::GpioReadFailed => write!(f, "GPIO read failed"),
            Self::NotConnected => write!(f, "not connected"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// PWM duty-cycle write failed.
    PwmWriteFailed,
    /// Direction GPIO write failed.
    GpioWriteFailed,
    /// No motor is attached to the addressed channel.
    NoSuchChannel,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PwmWriteFailed => write!(f, "PWM write failed"),
            Self::GpioWriteFailed => write!(f, "GPIO write failed"),
            Self::NoSuchChannel => write!(f, "no motor on channel"),
        }
    }
}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
