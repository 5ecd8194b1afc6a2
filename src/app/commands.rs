//! Inbound commands to the lift.
//!
//! These represent actions requested by the outside world (host link,
//! remote sensing unit, service console) that the
//! [`LiftSystem`](super::system::LiftSystem) interprets and acts upon.

use crate::config::StopPolicy;
use crate::sensors::LegMeasurement;

/// Commands that external adapters can send into the control core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LiftCommand {
    /// Stop every leg now, regardless of the panel.
    EmergencyStop,

    /// Switch how `Stopping` behaves.
    SetStopPolicy(StopPolicy),

    /// Hand over a measurement produced by a remote sensing unit.
    Measurement { leg: u8, measurement: LegMeasurement },
}
