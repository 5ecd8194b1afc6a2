//! `HardwareAdapter` over `embedded-hal` doubles: port routing, pin
//! polarity, and a short closed-loop run of the full system on top.

use elevate::adapters::hardware::HardwareAdapter;
use elevate::adapters::log_sink::LogEventSink;
use elevate::app::ports::{AnglePort, MotorPort, PanelPort, SwitchPort};
use elevate::app::state::SystemState;
use elevate::app::system::LiftSystem;
use elevate::config::SystemConfig;
use elevate::drivers::i2c_mux::I2cMultiplexer;
use elevate::drivers::motor::HBridgeMotor;
use elevate::error::{ActuatorError, SensorError};
use elevate::sensors::encoder::As5600Bus;

use crate::mock_hw::{SharedClock, SharedI2c, SharedInput, SharedOutput, SharedPwm};

type Adapter = HardwareAdapter<SharedI2c, SharedClock, SharedPwm, SharedOutput, SharedInput>;

struct Bench {
    adapter: Adapter,
    bus: SharedI2c,
    clock: SharedClock,
    duties: Vec<SharedPwm>,
    directions: Vec<SharedOutput>,
    switches: Vec<(u8, SharedInput)>,
    up: SharedInput,
    down: SharedInput,
}

fn bench(config: &SystemConfig) -> Bench {
    let bus = SharedI2c::default();
    let clock = SharedClock::default();
    let encoders = As5600Bus::new(
        bus.clone(),
        I2cMultiplexer::default(),
        clock.clone(),
        config.sensor_deadline_ms,
    );
    let up = SharedInput::released();
    let down = SharedInput::released();
    let mut adapter = HardwareAdapter::new(encoders, up.clone(), down.clone(), true);

    let mut duties = Vec::new();
    let mut directions = Vec::new();
    let mut switches = Vec::new();
    for leg in &config.legs {
        let pwm = SharedPwm::default();
        let dir = SharedOutput::default();
        let motor = HBridgeMotor::new(pwm.clone(), dir.clone(), config.pid.output_max as u16);
        adapter.add_motor(leg.motor_channel, motor).unwrap();
        duties.push(pwm);
        directions.push(dir);

        for pin in [leg.upper_switch_pin, leg.lower_switch_pin] {
            let input = SharedInput::released();
            adapter.add_switch(pin, input.clone()).unwrap();
            switches.push((pin, input));
        }
    }

    Bench {
        adapter,
        bus,
        clock,
        duties,
        directions,
        switches,
        up,
        down,
    }
}

#[test]
fn motor_commands_route_by_channel() {
    let config = SystemConfig::default();
    let mut b = bench(&config);

    b.adapter.set_motor(2, 1023).unwrap();
    assert_eq!(b.duties[2].0.get(), 1023);
    assert!(b.directions[2].0.get());

    b.adapter.set_motor(2, -1023).unwrap();
    assert!(!b.directions[2].0.get());

    b.adapter.set_motor(2, 0).unwrap();
    assert_eq!(b.duties[2].0.get(), 0);
    assert_eq!(b.duties[0].0.get(), 0);

    assert_eq!(b.adapter.set_motor(9, 10), Err(ActuatorError::NoSuchChannel));
}

#[test]
fn duplicate_channel_is_rejected() {
    let config = SystemConfig::default();
    let mut b = bench(&config);
    let motor = HBridgeMotor::new(SharedPwm::default(), SharedOutput::default(), 1023);
    assert!(b.adapter.add_motor(0, motor).is_err());
}

#[test]
fn switches_report_raw_level() {
    let config = SystemConfig::default();
    let mut b = bench(&config);
    let (pin, input) = b.switches[3].clone();

    assert_eq!(b.adapter.read_switch(pin), Ok(true));
    input.0.set(false);
    assert_eq!(b.adapter.read_switch(pin), Ok(false));
    assert_eq!(b.adapter.read_switch(200), Err(SensorError::NotConnected));
}

#[test]
fn panel_buttons_are_active_low() {
    let config = SystemConfig::default();
    let mut b = bench(&config);
    assert_eq!(b.adapter.read_command_buttons(), Ok((false, false)));
    b.down.0.set(false);
    assert_eq!(b.adapter.read_command_buttons(), Ok((false, true)));
}

#[test]
fn angle_reads_go_through_the_mux() {
    let config = SystemConfig::default();
    let mut b = bench(&config);
    b.bus.angles.borrow_mut()[4] = 3210;

    assert_eq!(b.adapter.read_angle(4), Ok(3210));
    assert_eq!(b.bus.selected.get(), 1 << 4);
    assert_eq!(b.adapter.encoders().last_good(4), Some(3210));
}

#[test]
fn silent_bus_times_out() {
    let config = SystemConfig::default();
    let mut b = bench(&config);
    b.bus.silent.set(true);
    // The clock is frozen; a zero-length deadline is the only way out
    let mut encoders = As5600Bus::new(b.bus.clone(), I2cMultiplexer::default(), b.clock.clone(), 0);
    assert_eq!(encoders.raw_angle(0), Err(SensorError::Timeout));
}

#[test]
fn system_runs_on_the_adapter() {
    let config = SystemConfig::default();
    let mut b = bench(&config);
    let mut sink = LogEventSink::new();
    let mut system = LiftSystem::new(config.clone(), 0).unwrap();

    b.adapter.encoders().setup().unwrap();
    system.setup(&mut b.adapter, &mut sink, 0);
    assert!(b.duties.iter().all(|d| d.0.get() == 0));

    b.up.0.set(false);
    let mut now = 0;
    while now < 300 {
        now += 10;
        b.clock.advance(10);
        system.tick(&mut b.adapter, &mut sink, now);
        system.control(&mut b.adapter, &mut sink, now);
    }

    assert_eq!(system.state(), SystemState::MovingUp);
    // Legs have not moved, so every loop drives up
    for (duty, dir) in b.duties.iter().zip(&b.directions) {
        assert!(duty.0.get() > 0);
        assert!(dir.0.get());
    }
}
