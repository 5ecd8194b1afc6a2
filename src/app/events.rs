//! Outbound lift events.
//!
//! The [`LiftSystem`](super::system::LiftSystem) emits these through the
//! [`EventSink`](super::ports::EventSink) port. Adapters on the other side
//! decide what to do with them: log to serial, forward to a host, record
//! in a test.

use serde::Serialize;

use crate::config::MAX_LEGS;

use super::state::{LegState, LegStatus, SystemState, SystemStatus};

/// Structured events emitted by the control core.
#[derive(Debug, Clone, PartialEq)]
pub enum LiftEvent {
    /// `setup` completed (carries the initial state).
    Started(SystemState),

    /// The system state machine moved.
    StateChanged { from: SystemState, to: SystemState },

    /// The aggregate limit status changed.
    StatusChanged { from: SystemStatus, to: SystemStatus },

    /// Every leg reached its lower limit and was zeroed.
    CalibrationComplete,

    /// Calibration ran past its configured budget and was abandoned.
    CalibrationTimedOut,

    /// Periodic telemetry snapshot.
    Telemetry(LiftTelemetry),
}

/// Per-leg slice of a telemetry snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LegTelemetry {
    pub state: LegState,
    pub status: LegStatus,
    pub effective_height: i64,
    pub height_offset: i64,
    pub stale_reads: u32,
}

/// A point-in-time telemetry snapshot suitable for logging or transmission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiftTelemetry {
    pub state: SystemState,
    pub status: SystemStatus,
    pub virtual_height: f32,
    pub legs: heapless::Vec<LegTelemetry, MAX_LEGS>,
}
