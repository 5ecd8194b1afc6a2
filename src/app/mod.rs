//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the motion rules for the lift: per-leg actuation,
//! system coordination around the virtual axis, and calibration. All
//! interaction with hardware happens through **port traits** defined in
//! [`ports`], keeping this layer fully testable without real peripherals.

pub mod commands;
pub mod events;
pub mod leg;
pub mod panel;
pub mod ports;
pub mod state;
pub mod system;
