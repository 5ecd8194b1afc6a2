//! Closed-loop test rig: a [`LiftSystem`] polled against [`MockHardware`]
//! with simulated leg motion.

#![allow(dead_code)]

use elevate::app::system::LiftSystem;
use elevate::config::SystemConfig;

use crate::mock_hw::{MockHardware, RecordingSink};

/// Poll period of the simulated main loop.
pub const STEP_MS: u32 = 10;

/// Angle counts per unit of motor command per step. At full command a leg
/// outruns the virtual axis; the per-sample loop gain stays below one.
pub const PHYSICS_GAIN: f32 = 0.05;

pub struct Rig {
    pub config: SystemConfig,
    pub system: LiftSystem,
    pub hw: MockHardware,
    pub sink: RecordingSink,
    pub now: u32,
}

impl Rig {
    pub fn new(config: SystemConfig) -> Self {
        let system = LiftSystem::new(config.clone(), 0).expect("valid config");
        Self {
            config,
            system,
            hw: MockHardware::new(),
            sink: RecordingSink::new(),
            now: 0,
        }
    }

    pub fn with_legs(n: usize) -> Self {
        let mut config = SystemConfig::default();
        config.legs.truncate(n);
        Self::new(config)
    }

    pub fn setup(&mut self) {
        self.system.setup(&mut self.hw, &mut self.sink, self.now);
    }

    /// One main-loop iteration: sense, decide, act, move.
    pub fn step(&mut self) {
        self.now += STEP_MS;
        self.system.tick(&mut self.hw, &mut self.sink, self.now);
        self.system.control(&mut self.hw, &mut self.sink, self.now);
        self.hw.step_physics(&self.config, PHYSICS_GAIN);
    }

    /// Step until `ms` more milliseconds have elapsed.
    pub fn run(&mut self, ms: u32) {
        let until = self.now + ms;
        while self.now < until {
            self.step();
        }
    }

    /// Step until `done` holds or `limit_ms` elapses; returns whether it held.
    pub fn run_until(&mut self, limit_ms: u32, done: impl Fn(&Rig) -> bool) -> bool {
        let until = self.now + limit_ms;
        while self.now < until {
            self.step();
            if done(self) {
                return true;
            }
        }
        false
    }

    pub fn upper_pin(&self, leg: usize) -> u8 {
        self.config.legs[leg].upper_switch_pin
    }

    pub fn lower_pin(&self, leg: usize) -> u8 {
        self.config.legs[leg].lower_switch_pin
    }

    pub fn channel(&self, leg: usize) -> u8 {
        self.config.legs[leg].motor_channel
    }

    pub fn encoder_port(&self, leg: usize) -> u8 {
        self.config.legs[leg].encoder_port
    }
}
