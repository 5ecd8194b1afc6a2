//! Pin, channel, and bus-port assignments for the four-leg frame.
//!
//! Single source of truth for [`SystemConfig::default`](crate::config::SystemConfig).
//! A host wiring a different board builds its own `LegConfig`s instead of
//! editing the control code.

// ---------------------------------------------------------------------------
// Shared I2C bus (angle sensors behind a multiplexer)
// ---------------------------------------------------------------------------

/// 7-bit address of the I2C multiplexer.
pub const MULTIPLEXER_ADDRESS: u8 = 0x70;

/// Number of downstream ports on the multiplexer.
pub const MULTIPLEXER_PORTS: u8 = 8;

// ---------------------------------------------------------------------------
// Legs
// ---------------------------------------------------------------------------

/// Wiring of one leg: motor channel, encoder mux port, and the two
/// end-of-travel switches (active low, external pull-up).
#[derive(Debug, Clone, Copy)]
pub struct LegPins {
    pub motor_channel: u8,
    pub encoder_port: u8,
    pub upper_limit_gpio: u8,
    pub lower_limit_gpio: u8,
}

pub const LEG_0: LegPins = LegPins {
    motor_channel: 0,
    encoder_port: 0,
    upper_limit_gpio: 21,
    lower_limit_gpio: 5,
};

pub const LEG_1: LegPins = LegPins {
    motor_channel: 1,
    encoder_port: 4,
    upper_limit_gpio: 40,
    lower_limit_gpio: 38,
};

pub const LEG_2: LegPins = LegPins {
    motor_channel: 2,
    encoder_port: 3,
    upper_limit_gpio: 36,
    lower_limit_gpio: 41,
};

pub const LEG_3: LegPins = LegPins {
    motor_channel: 3,
    encoder_port: 2,
    upper_limit_gpio: 34,
    lower_limit_gpio: 33,
};

/// All legs in the default frame, in control order.
pub const LEGS: [LegPins; 4] = [LEG_0, LEG_1, LEG_2, LEG_3];
