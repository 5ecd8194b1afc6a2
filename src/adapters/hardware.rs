//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the angle-sensor bus, every leg's motor driver, the limit-switch
//! inputs, and the panel buttons, exposing them through [`SwitchPort`],
//! [`AnglePort`], [`MotorPort`] and [`PanelPort`]. This is the only module
//! in the crate that touches actual hardware; everything it holds is an
//! `embedded-hal` device, so the same adapter runs on any HAL.

use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::i2c::I2c;
use embedded_hal::pwm::SetDutyCycle;

use crate::app::ports::{AnglePort, Clock, MotorPort, PanelPort, SwitchPort};
use crate::config::MAX_LEGS;
use crate::drivers::motor::HBridgeMotor;
use crate::error::{ActuatorError, Error, SensorError};
use crate::sensors::encoder::As5600Bus;

/// Two limit switches per leg.
const MAX_SWITCHES: usize = 2 * MAX_LEGS;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<I2C, C, PWM, DIR, IN> {
    encoders: As5600Bus<I2C, C>,
    motors: heapless::Vec<(u8, HBridgeMotor<PWM, DIR>), MAX_LEGS>,
    switches: heapless::Vec<(u8, IN), MAX_SWITCHES>,
    up_button: IN,
    down_button: IN,
    buttons_active_low: bool,
}

impl<I2C, C, PWM, DIR, IN> HardwareAdapter<I2C, C, PWM, DIR, IN>
where
    I2C: I2c,
    C: Clock,
    PWM: SetDutyCycle,
    DIR: OutputPin,
    IN: InputPin,
{
    /// Buttons are wired active low unless `buttons_active_low` is false.
    pub fn new(
        encoders: As5600Bus<I2C, C>,
        up_button: IN,
        down_button: IN,
        buttons_active_low: bool,
    ) -> Self {
        Self {
            encoders,
            motors: heapless::Vec::new(),
            switches: heapless::Vec::new(),
            up_button,
            down_button,
            buttons_active_low,
        }
    }

    /// Attach the motor driving `channel`.
    pub fn add_motor(&mut self, channel: u8, motor: HBridgeMotor<PWM, DIR>) -> Result<(), Error> {
        if self.motors.iter().any(|(c, _)| *c == channel) {
            return Err(Error::Config("motor channel attached twice"));
        }
        self.motors
            .push((channel, motor))
            .map_err(|_| Error::Config("too many motors"))
    }

    /// Attach the input read for switch `pin`.
    pub fn add_switch(&mut self, pin: u8, input: IN) -> Result<(), Error> {
        if self.switches.iter().any(|(p, _)| *p == pin) {
            return Err(Error::Config("switch pin attached twice"));
        }
        self.switches
            .push((pin, input))
            .map_err(|_| Error::Config("too many switches"))
    }

    /// Sensor bus, for setup and magnet diagnostics.
    pub fn encoders(&mut self) -> &mut As5600Bus<I2C, C> {
        &mut self.encoders
    }
}

// ── SwitchPort implementation ─────────────────────────────────

impl<I2C, C, PWM, DIR, IN> SwitchPort for HardwareAdapter<I2C, C, PWM, DIR, IN>
where
    IN: InputPin,
{
    fn read_switch(&mut self, pin: u8) -> Result<bool, SensorError> {
        let (_, input) = self
            .switches
            .iter_mut()
            .find(|(p, _)| *p == pin)
            .ok_or(SensorError::NotConnected)?;
        input.is_high().map_err(|_| SensorError::GpioReadFailed)
    }
}

// ── AnglePort implementation ──────────────────────────────────

impl<I2C, C, PWM, DIR, IN> AnglePort for HardwareAdapter<I2C, C, PWM, DIR, IN>
where
    I2C: I2c,
    C: Clock,
{
    fn read_angle(&mut self, port: u8) -> Result<u16, SensorError> {
        self.encoders.read_angle(port)
    }
}

// ── MotorPort implementation ──────────────────────────────────

impl<I2C, C, PWM, DIR, IN> MotorPort for HardwareAdapter<I2C, C, PWM, DIR, IN>
where
    PWM: SetDutyCycle,
    DIR: OutputPin,
{
    fn set_motor(&mut self, channel: u8, speed: i32) -> Result<(), ActuatorError> {
        let (_, motor) = self
            .motors
            .iter_mut()
            .find(|(c, _)| *c == channel)
            .ok_or(ActuatorError::NoSuchChannel)?;
        motor.drive(speed)
    }
}

// ── PanelPort implementation ──────────────────────────────────

impl<I2C, C, PWM, DIR, IN> PanelPort for HardwareAdapter<I2C, C, PWM, DIR, IN>
where
    IN: InputPin,
{
    fn read_command_buttons(&mut self) -> Result<(bool, bool), SensorError> {
        let active_low = self.buttons_active_low;
        let up = self
            .up_button
            .is_high()
            .map_err(|_| SensorError::GpioReadFailed)?;
        let down = self
            .down_button
            .is_high()
            .map_err(|_| SensorError::GpioReadFailed)?;
        Ok((up != active_low, down != active_low))
    }
}
