//! Lift system: coordinates every leg around one virtual master axis.
//!
//! The system owns all legs plus the operator panel and is polled in two
//! phases each loop iteration:
//!
//! ```text
//!   tick(now)     sense legs ─▶ aggregate status ─▶ panel ─▶ interlock ─▶ state
//!   control(now)  state ─▶ advance virtual axis ─▶ every leg tracks it
//! ```
//!
//! Legs never integrate their own velocity. One shared setpoint advances
//! at a fixed rate and each leg's loop tracks it, so legs converge on the
//! same height even when their transients differ. Calibration drives every
//! leg down to its lower switch and zeroes it there.
//!
//! Hardware is injected at each call site, never owned, so the same system
//! runs against real peripherals and against test doubles.

use log::{debug, info, warn};

use crate::config::{MAX_LEGS, SensingMode, StopPolicy, SystemConfig};
use crate::error::{Error, Result};
use crate::safety::{SafetySupervisor, interlock};
use crate::sensors::LegMeasurement;

use super::commands::LiftCommand;
use super::events::{LegTelemetry, LiftEvent, LiftTelemetry};
use super::leg::Leg;
use super::panel::CommandPanel;
use super::ports::{EventSink, LiftHardware, MotorPort};
use super::state::{LegStatus, SystemState, SystemStatus};

pub struct LiftSystem {
    config: SystemConfig,
    legs: heapless::Vec<Leg, MAX_LEGS>,
    panel: CommandPanel,
    safety: SafetySupervisor,

    state: SystemState,
    status: SystemStatus,

    /// Shared setpoint, in sensor counts.
    virtual_height: f32,
    /// Time the virtual axis was last advanced.
    previous_tick_ms: u32,

    calibration_started_ms: u32,
    /// Set when a calibration finishes or is abandoned; further calibration
    /// requests are ignored until the panel asks for something else.
    calibration_latched: bool,

    last_telemetry_ms: u32,
    is_setup: bool,
}

impl LiftSystem {
    /// Build the system from a configuration, validating it first.
    pub fn new(config: SystemConfig, now_ms: u32) -> Result<Self> {
        config.validate()?;

        let mut legs = heapless::Vec::new();
        for (i, leg) in config.legs.iter().enumerate() {
            legs.push(Leg::new(i as u8, *leg, &config, now_ms))
                .map_err(|_| Error::Config("too many legs"))?;
        }

        Ok(Self {
            panel: CommandPanel::new(config.input_delay_ms, now_ms),
            legs,
            safety: SafetySupervisor::new(),
            state: SystemState::Stopped,
            status: SystemStatus::Fine,
            virtual_height: 0.0,
            previous_tick_ms: now_ms,
            calibration_started_ms: now_ms,
            calibration_latched: false,
            last_telemetry_ms: now_ms,
            is_setup: false,
            config,
        })
    }

    /// One-time initialisation: seed leg sensing and cut every motor.
    /// Repeated calls do nothing.
    pub fn setup<H, S>(&mut self, hw: &mut H, sink: &mut S, now_ms: u32)
    where
        H: LiftHardware,
        S: EventSink,
    {
        if self.is_setup {
            return;
        }

        for leg in &mut self.legs {
            if self.config.sensing == SensingMode::Local {
                leg.setup(hw, now_ms);
            }
            leg.hard_stop(hw);
        }

        self.previous_tick_ms = now_ms;
        self.last_telemetry_ms = now_ms;
        self.is_setup = true;

        info!(
            "lift ready: {} legs, sensing={:?}, stop_policy={:?}",
            self.legs.len(),
            self.config.sensing,
            self.config.stop_policy
        );
        sink.emit(&LiftEvent::Started(self.state));
    }

    // ── Phase 1: sense and decide ─────────────────────────────────

    /// Refresh leg statuses, then take the panel's request through the
    /// interlock. Emits telemetry when due.
    pub fn tick<H, S>(&mut self, hw: &mut H, sink: &mut S, now_ms: u32)
    where
        H: LiftHardware,
        S: EventSink,
    {
        self.update_module_status(hw, sink, now_ms);
        self.update_system_state(hw, sink, now_ms);

        if now_ms.wrapping_sub(self.last_telemetry_ms) >= self.config.telemetry_interval_ms {
            self.last_telemetry_ms = now_ms;
            sink.emit(&LiftEvent::Telemetry(self.telemetry()));
        }
    }

    fn update_module_status<H, S>(&mut self, hw: &mut H, sink: &mut S, now_ms: u32)
    where
        H: LiftHardware,
        S: EventSink,
    {
        for leg in &mut self.legs {
            if self.config.sensing == SensingMode::Local {
                leg.sample(hw, now_ms);
            }
            leg.update_status();
        }

        let status = self.safety.evaluate(self.legs.iter().map(Leg::status));
        if status != self.status {
            sink.emit(&LiftEvent::StatusChanged {
                from: self.status,
                to: status,
            });
            self.status = status;
        }
    }

    fn update_system_state<H, S>(&mut self, hw: &mut H, sink: &mut S, now_ms: u32)
    where
        H: LiftHardware,
        S: EventSink,
    {
        let requested = self.panel.request(hw, now_ms);
        if requested == SystemState::Calibrating && self.calibration_latched {
            return;
        }
        self.calibration_latched = false;
        self.transition(requested, sink, now_ms);
    }

    /// Filter `requested` through the interlock and adopt the result.
    ///
    /// The virtual axis clock restarts whenever the result is a motion
    /// state the system was not already in.
    pub fn set_state(&mut self, requested: SystemState, now_ms: u32) -> SystemState {
        let previous = self.state;
        let next = interlock(requested, previous, self.status);

        if next != previous && next.is_motion() {
            self.previous_tick_ms = now_ms;
        }
        if next == SystemState::Calibrating && previous != SystemState::Calibrating {
            self.calibration_started_ms = now_ms;
        }
        if next != requested {
            debug!("interlock: {requested:?} -> {next:?} (status {:?})", self.status);
        }

        self.state = next;
        next
    }

    fn transition<S: EventSink>(&mut self, requested: SystemState, sink: &mut S, now_ms: u32) {
        let from = self.state;
        let to = self.set_state(requested, now_ms);
        if from != to {
            sink.emit(&LiftEvent::StateChanged { from, to });
        }
    }

    // ── Phase 2: act ──────────────────────────────────────────────

    /// Drive every leg according to the current state.
    pub fn control<M, S>(&mut self, motor: &mut M, sink: &mut S, now_ms: u32)
    where
        M: MotorPort,
        S: EventSink,
    {
        match self.state {
            SystemState::Stopped => self.hard_stop_all(motor),
            SystemState::Stopping => match self.config.stop_policy {
                StopPolicy::Hard => self.hard_stop_all(motor),
                StopPolicy::Smooth => self.smooth_stop_all(motor, sink, now_ms),
            },
            SystemState::MovingUp => {
                self.advance_axis(1.0, now_ms);
                self.move_all(motor, now_ms);
            }
            SystemState::MovingDown => {
                self.advance_axis(-1.0, now_ms);
                self.move_all(motor, now_ms);
            }
            SystemState::Calibrating => self.calibrate(motor, sink, now_ms),
        }
    }

    fn advance_axis(&mut self, direction: f32, now_ms: u32) {
        let elapsed = now_ms.wrapping_sub(self.previous_tick_ms);
        self.previous_tick_ms = now_ms;
        self.virtual_height += direction * self.config.counts_per_ms() * elapsed as f32;
    }

    fn target(&self) -> i64 {
        self.virtual_height as i64
    }

    fn hard_stop_all<M: MotorPort>(&mut self, motor: &mut M) {
        for leg in &mut self.legs {
            leg.hard_stop(motor);
        }
    }

    fn move_all<M: MotorPort>(&mut self, motor: &mut M, now_ms: u32) {
        let target = self.target();
        debug!("virtual axis at {target}");
        for leg in &mut self.legs {
            leg.move_to(target, motor, now_ms);
        }
    }

    fn smooth_stop_all<M, S>(&mut self, motor: &mut M, sink: &mut S, now_ms: u32)
    where
        M: MotorPort,
        S: EventSink,
    {
        let target = self.target();
        for leg in &mut self.legs {
            leg.smooth_stop(target, motor, now_ms);
        }
        if self.legs.iter().all(|l| l.state() == SystemState::Stopped) {
            self.transition(SystemState::Stopped, sink, now_ms);
        }
    }

    fn calibrate<M, S>(&mut self, motor: &mut M, sink: &mut S, now_ms: u32)
    where
        M: MotorPort,
        S: EventSink,
    {
        if let Some(budget) = self.config.calibration_timeout_ms {
            if now_ms.wrapping_sub(self.calibration_started_ms) >= budget {
                warn!("calibration abandoned after {budget} ms");
                self.hard_stop_all(motor);
                self.calibration_latched = true;
                self.transition(SystemState::Stopped, sink, now_ms);
                sink.emit(&LiftEvent::CalibrationTimedOut);
                return;
            }
        }

        let pending = self
            .legs
            .iter()
            .any(|l| l.status() != LegStatus::LowerLimited);
        if pending {
            self.advance_axis(-1.0, now_ms);
        }

        let target = self.target();
        for leg in &mut self.legs {
            if leg.status() == LegStatus::LowerLimited {
                leg.hard_stop(motor);
                leg.update_offset();
            } else {
                leg.move_to(target, motor, now_ms);
            }
        }

        if !pending {
            self.virtual_height = 0.0;
            self.calibration_latched = true;
            self.transition(SystemState::Stopped, sink, now_ms);
            info!("calibration complete");
            sink.emit(&LiftEvent::CalibrationComplete);
        }
    }

    // ── Commands and remote sensing ───────────────────────────────

    pub fn handle_command<M, S>(
        &mut self,
        command: LiftCommand,
        motor: &mut M,
        sink: &mut S,
        now_ms: u32,
    ) -> Result<()>
    where
        M: MotorPort,
        S: EventSink,
    {
        match command {
            LiftCommand::EmergencyStop => {
                warn!("emergency stop");
                self.hard_stop_all(motor);
                self.transition(SystemState::Stopped, sink, now_ms);
            }
            LiftCommand::SetStopPolicy(policy) => {
                info!("stop policy: {:?} -> {policy:?}", self.config.stop_policy);
                self.config.stop_policy = policy;
            }
            LiftCommand::Measurement { leg, measurement } => {
                self.apply_measurement(leg, &measurement)?;
            }
        }
        Ok(())
    }

    /// Hand a measurement to one leg. Takes effect on the next `tick`.
    pub fn apply_measurement(&mut self, leg: u8, measurement: &LegMeasurement) -> Result<()> {
        let target = self
            .legs
            .get_mut(leg as usize)
            .ok_or(Error::UnknownLeg(leg))?;
        target.apply_measurement(measurement);
        Ok(())
    }

    // ── Observers ─────────────────────────────────────────────────

    pub fn state(&self) -> SystemState {
        self.state
    }

    pub fn status(&self) -> SystemStatus {
        self.status
    }

    pub fn virtual_height(&self) -> f32 {
        self.virtual_height
    }

    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    pub fn leg(&self, index: usize) -> Option<&Leg> {
        self.legs.get(index)
    }

    pub fn stop_policy(&self) -> StopPolicy {
        self.config.stop_policy
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    pub fn safety(&self) -> &SafetySupervisor {
        &self.safety
    }

    pub fn is_setup(&self) -> bool {
        self.is_setup
    }

    pub fn telemetry(&self) -> LiftTelemetry {
        let mut legs = heapless::Vec::new();
        for leg in &self.legs {
            legs.push(LegTelemetry {
                state: leg.state(),
                status: leg.status(),
                effective_height: leg.effective_height(),
                height_offset: leg.height_offset(),
                stale_reads: leg.stale_reads(),
            })
            .ok();
        }
        LiftTelemetry {
            state: self.state,
            status: self.status,
            virtual_height: self.virtual_height,
            legs,
        }
    }
}
