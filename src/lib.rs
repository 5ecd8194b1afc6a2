//! Elevate lift controller library.
//!
//! Closed-loop control for a multi-leg lift: each leg tracks its height
//! from a single-turn angle sensor, closes a PID loop on a shared virtual
//! axis, and refuses to drive into its limit switches. The
//! [`LiftSystem`](app::system::LiftSystem) coordinates the legs and runs
//! calibration. Hardware sits behind the port traits in [`app::ports`].

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod control;
pub mod drivers;
pub mod error;
pub mod pins;
pub mod remote;
pub mod safety;
pub mod sensors;
