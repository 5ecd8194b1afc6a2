//! Motion states and limit statuses shared by legs and the system.

use serde::{Deserialize, Serialize};

/// What a leg, or the lift as a whole, is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LegState {
    #[default]
    Stopped,
    Stopping,
    MovingUp,
    MovingDown,
    Calibrating,
}

impl LegState {
    pub fn is_motion(self) -> bool {
        matches!(self, Self::MovingUp | Self::MovingDown | Self::Calibrating)
    }
}

/// Limit-switch condition of a leg. Variants are declared from least to
/// most severe, so `max()` over legs yields the aggregate status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum LegStatus {
    #[default]
    Fine,
    UpperLimited,
    LowerLimited,
    /// Both switches pressed at once.
    Malfunction,
}

impl LegStatus {
    pub fn from_switches(upper: bool, lower: bool) -> Self {
        match (upper, lower) {
            (true, true) => Self::Malfunction,
            (true, false) => Self::UpperLimited,
            (false, true) => Self::LowerLimited,
            (false, false) => Self::Fine,
        }
    }
}

/// Aggregate state of the lift.
pub type SystemState = LegState;

/// Most severe [`LegStatus`] across all legs.
pub type SystemStatus = LegStatus;
