//! Lead-screw motor driver (H-bridge with PWM speed and direction pin).
//!
//! Variable-speed up/down control via a PWM duty output and a digital
//! direction pin, both behind `embedded-hal` traits so the same driver
//! runs on any HAL and against test doubles.
//!
//! ## Safety contract
//!
//! The motor must never drive further into a pressed limit switch. That is
//! enforced by the leg actuator before a command reaches this driver; this
//! driver is a dumb actuator.

use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;

use crate::error::ActuatorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorState {
    Stopped,
    Running { magnitude: u16, dir: Direction },
}

pub struct HBridgeMotor<PWM, DIR> {
    pwm: PWM,
    dir: DIR,
    /// Magnitude that maps to 100 % duty.
    full_scale: u16,
    state: MotorState,
}

impl<PWM, DIR> HBridgeMotor<PWM, DIR>
where
    PWM: SetDutyCycle,
    DIR: OutputPin,
{
    pub fn new(pwm: PWM, dir: DIR, full_scale: u16) -> Self {
        Self {
            pwm,
            dir,
            full_scale: full_scale.max(1),
            state: MotorState::Stopped,
        }
    }

    /// Drive at a signed speed: positive raises the leg, negative lowers it.
    pub fn drive(&mut self, speed: i32) -> Result<(), ActuatorError> {
        if speed == 0 {
            return self.stop();
        }

        let direction = if speed > 0 { Direction::Up } else { Direction::Down };
        let magnitude = speed.unsigned_abs().min(u32::from(self.full_scale)) as u16;

        self.set_direction_hw(direction)?;
        self.pwm
            .set_duty_cycle_fraction(magnitude, self.full_scale)
            .map_err(|_| ActuatorError::PwmWriteFailed)?;

        self.state = MotorState::Running {
            magnitude,
            dir: direction,
        };
        Ok(())
    }

    pub fn stop(&mut self) -> Result<(), ActuatorError> {
        self.state = MotorState::Stopped;
        self.pwm
            .set_duty_cycle_fully_off()
            .map_err(|_| ActuatorError::PwmWriteFailed)
    }

    fn set_direction_hw(&mut self, dir: Direction) -> Result<(), ActuatorError> {
        let result = match dir {
            Direction::Up => self.dir.set_high(),
            Direction::Down => self.dir.set_low(),
        };
        result.map_err(|_| ActuatorError::GpioWriteFailed)
    }

    pub fn state(&self) -> MotorState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        !matches!(self.state, MotorState::Stopped)
    }
}
