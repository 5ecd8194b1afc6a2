//! Hardware drivers for the lift's peripherals.
//!
//! Each driver wraps `embedded-hal` traits so it runs on any HAL and can
//! be exercised on the host with test doubles.
//!
//! | Driver     | Peripheral                         |
//! |------------|------------------------------------|
//! | `debounce` | limit switches, panel buttons      |
//! | `motor`    | H-bridge (PWM + direction pin)     |
//! | `i2c_mux`  | 8-port I2C multiplexer             |

pub mod debounce;
pub mod i2c_mux;
pub mod motor;
