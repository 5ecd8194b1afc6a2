//! Closed-loop control primitives.

pub mod pid;

pub use pid::{PidController, PidMode};
