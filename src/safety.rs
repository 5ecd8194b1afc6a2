//! Safety supervisor and the motion interlock.
//!
//! The supervisor runs **every tick after the legs refresh their limit
//! status** and keeps a latched malfunction bitmask, one bit per leg. It
//! returns the aggregate status that feeds the interlock.
//!
//! ## Fault lifecycle
//!
//! 1. A leg reports both limit switches pressed.
//! 2. The supervisor sets that leg's bit and logs the fault.
//! 3. The aggregate status becomes `Malfunction`; the interlock refuses
//!    `MovingUp` and `MovingDown` while it lasts.
//! 4. Each tick the supervisor re-evaluates. Once the contradictory input
//!    disappears the bit clears and the fault is logged as cleared.
//!
//! Limit statuses are not faults: they block one direction only.

use log::{error, info};

use crate::app::state::{LegState, LegStatus, SystemState, SystemStatus};

/// Tracks per-leg malfunctions and derives the aggregate status.
#[derive(Debug, Default)]
pub struct SafetySupervisor {
    /// Latched malfunction bitmask, bit `i` = leg `i`.
    faults: u8,
    aggregate: SystemStatus,
}

impl SafetySupervisor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate every leg's status (in leg order); returns the most severe.
    pub fn evaluate<I>(&mut self, statuses: I) -> SystemStatus
    where
        I: IntoIterator<Item = LegStatus>,
    {
        let mut aggregate = LegStatus::Fine;
        for (i, status) in statuses.into_iter().enumerate().take(u8::BITS as usize) {
            self.eval_fault(i as u8, status == LegStatus::Malfunction);
            aggregate = aggregate.max(status);
        }
        self.aggregate = aggregate;
        aggregate
    }

    /// Aggregate status from the last evaluation.
    pub fn aggregate(&self) -> SystemStatus {
        self.aggregate
    }

    /// Current fault bitmask.
    pub fn faults(&self) -> u8 {
        self.faults
    }

    /// True if **any** leg is in malfunction.
    pub fn has_faults(&self) -> bool {
        self.faults != 0
    }

    pub fn has_fault(&self, leg: u8) -> bool {
        leg < 8 && self.faults & (1 << leg) != 0
    }

    // ── Internal ──────────────────────────────────────────────────

    fn eval_fault(&mut self, leg: u8, condition: bool) {
        let mask = 1 << leg;
        if condition {
            if self.faults & mask == 0 {
                error!("SAFETY FAULT SET: leg {leg} both limit switches pressed");
            }
            self.faults |= mask;
        } else {
            if self.faults & mask != 0 {
                info!("SAFETY FAULT CLEARED: leg {leg}");
            }
            self.faults &= !mask;
        }
    }
}

/// Filter a requested system state through the limit interlock.
///
/// Motion toward a limit that some leg already reports (or any motion
/// under malfunction) resolves to `Stopped`. `Stopping` from `Stopped`
/// stays `Stopped`.
pub fn interlock(requested: SystemState, current: SystemState, aggregate: SystemStatus) -> SystemState {
    use LegState as S;
    use LegStatus as St;

    match requested {
        S::Stopped => S::Stopped,
        S::Stopping if current == S::Stopped => S::Stopped,
        S::Stopping => S::Stopping,
        S::MovingUp if matches!(aggregate, St::Malfunction | St::UpperLimited) => S::Stopped,
        S::MovingUp => S::MovingUp,
        S::MovingDown if matches!(aggregate, St::Malfunction | St::LowerLimited) => S::Stopped,
        S::MovingDown => S::MovingDown,
        S::Calibrating => S::Calibrating,
    }
}
