//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements   | Connects to                          |
//! |------------|--------------|--------------------------------------|
//! | `hardware` | SwitchPort   | limit-switch GPIO inputs             |
//! |            | AnglePort    | AS5600 sensors behind the I2C mux    |
//! |            | MotorPort    | H-bridge PWM + direction pins        |
//! |            | PanelPort    | up / down button GPIO inputs         |
//! | `log_sink` | EventSink    | `log` facade                         |
//! | `time`     | Clock        | host monotonic clock                 |

pub mod hardware;
pub mod log_sink;
pub mod time;
