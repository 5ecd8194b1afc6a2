//! Time-based debounce for switches and buttons.
//!
//! Every poll feeds one raw sample. A change in the raw sample restarts the
//! settle timer; once the raw level has held for longer than the settle
//! interval it becomes the stable level. Noise faster than the interval
//! never reaches the stable output.
//!
//! All timing is wall-clock and non-blocking: the caller polls with the
//! current millisecond counter and the filter never waits.

/// Debounced boolean input.
#[derive(Debug, Clone, Copy)]
pub struct DebouncedInput {
    interval_ms: u32,
    stable: bool,
    previous_raw: bool,
    last_change_ms: u32,
}

impl DebouncedInput {
    /// Start settled on `initial` as of `now_ms`.
    pub fn new(interval_ms: u32, initial: bool, now_ms: u32) -> Self {
        Self {
            interval_ms,
            stable: initial,
            previous_raw: initial,
            last_change_ms: now_ms,
        }
    }

    /// Re-seed from a fresh reading, as at power-up.
    pub fn seed(&mut self, level: bool, now_ms: u32) {
        self.stable = level;
        self.previous_raw = level;
        self.last_change_ms = now_ms;
    }

    /// Feed one raw sample; returns the stable level.
    pub fn update(&mut self, raw: bool, now_ms: u32) -> bool {
        if raw != self.previous_raw {
            self.last_change_ms = now_ms;
        }
        if now_ms.wrapping_sub(self.last_change_ms) > self.interval_ms {
            self.stable = raw;
        }
        self.previous_raw = raw;
        self.stable
    }

    pub fn stable(&self) -> bool {
        self.stable
    }
}
