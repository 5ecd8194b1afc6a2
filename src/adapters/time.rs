//! Host time adapter.
//!
//! Provides the millisecond [`Clock`] from `std::time::Instant`, for host
//! builds, simulation, and bench rigs. Embedded targets implement
//! [`Clock`] over their own timer.

use std::time::Instant;

use crate::app::ports::Clock;

/// Milliseconds since construction, wrapping at `u32::MAX`.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    start: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Microseconds since construction.
    pub fn uptime_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u32 {
        // Truncation wraps the counter
        self.start.elapsed().as_millis() as u32
    }
}
