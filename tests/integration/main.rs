//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against mock adapters. All tests run on the host with no real hardware
//! required.

mod hardware_adapter_tests;
mod rig;
mod system_tests;
