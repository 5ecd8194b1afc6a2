//! Integration tests for the panel → interlock → virtual axis → legs
//! pipeline, run closed-loop against mock hardware.

use elevate::app::commands::LiftCommand;
use elevate::app::events::LiftEvent;
use elevate::app::state::{LegState, LegStatus, SystemState};
use elevate::config::{SensingMode, StopPolicy, SystemConfig};
use elevate::error::Error;
use elevate::sensors::LegMeasurement;

use crate::rig::Rig;

fn moving_rig() -> Rig {
    let mut rig = Rig::with_legs(4);
    rig.setup();
    rig.hw.hold(true, false);
    assert!(rig.run_until(200, |r| r.system.state() == SystemState::MovingUp));
    rig
}

// ── Lifecycle ─────────────────────────────────────────────────

#[test]
fn setup_runs_once() {
    let mut rig = Rig::with_legs(4);
    rig.setup();
    rig.setup();

    assert!(rig.system.is_setup());
    assert_eq!(rig.sink.count(|e| matches!(e, LiftEvent::Started(_))), 1);
    assert_eq!(rig.hw.motor_calls, vec![(0, 0), (1, 0), (2, 0), (3, 0)]);
}

#[test]
fn idle_panel_keeps_lift_stopped() {
    let mut rig = Rig::with_legs(4);
    rig.setup();
    rig.run(500);

    assert_eq!(rig.system.state(), SystemState::Stopped);
    assert_eq!(rig.system.status(), LegStatus::Fine);
    assert!(rig.hw.motor_calls.iter().all(|(_, speed)| *speed == 0));
}

#[test]
fn telemetry_follows_configured_interval() {
    let mut rig = Rig::with_legs(2);
    rig.setup();
    rig.run(2500);
    assert_eq!(rig.sink.count(|e| matches!(e, LiftEvent::Telemetry(_))), 2);
}

// ── Moving ────────────────────────────────────────────────────

#[test]
fn up_button_raises_axis_and_legs_follow() {
    let mut rig = moving_rig();
    let axis_start = rig.system.virtual_height();
    rig.run(1000);

    assert_eq!(rig.system.state(), SystemState::MovingUp);
    // One rotation per second
    let travelled = rig.system.virtual_height() - axis_start;
    assert!((travelled - 4096.0).abs() < 1.0, "axis travelled {travelled}");

    let target = rig.system.virtual_height() as i64;
    for leg in rig.system.legs() {
        assert!(leg.effective_height() > 0, "leg {} did not rise", leg.index());
        assert!(
            (leg.effective_height() - target).abs() < 1500,
            "leg {} lags the axis: {} vs {target}",
            leg.index(),
            leg.effective_height()
        );
    }
}

#[test]
fn down_button_lowers_axis() {
    let mut rig = Rig::with_legs(4);
    rig.setup();
    rig.hw.hold(false, true);
    assert!(rig.run_until(200, |r| r.system.state() == SystemState::MovingDown));
    rig.run(500);

    assert!(rig.system.virtual_height() < 0.0);
    for leg in rig.system.legs() {
        assert!(leg.effective_height() < 0);
    }
}

#[test]
fn inverted_leg_is_driven_with_flipped_sign() {
    let mut config = SystemConfig::default();
    config.legs[1].inverted = true;
    let mut rig = Rig::new(config);
    rig.setup();
    rig.hw.hold(true, false);
    assert!(rig.run_until(200, |r| r.system.state() == SystemState::MovingUp));
    rig.run(200);

    assert!(rig.hw.last_speed(rig.channel(0)).unwrap() > 0);
    assert!(rig.hw.last_speed(rig.channel(1)).unwrap() < 0);

    // The reversed wiring cancels out: the leg still rises with the axis
    rig.run(800);
    let target = rig.system.virtual_height() as i64;
    let inverted = rig.system.leg(1).unwrap();
    assert!(inverted.effective_height() > 0);
    assert!(
        (inverted.effective_height() - target).abs() < 1500,
        "inverted leg lags the axis: {} vs {target}",
        inverted.effective_height()
    );
}

// ── Stopping ──────────────────────────────────────────────────

#[test]
fn release_hard_stops_every_leg() {
    let mut rig = moving_rig();
    rig.run(500);
    rig.hw.hold(false, false);
    assert!(rig.run_until(200, |r| r.system.state() == SystemState::Stopping));
    rig.run(50);

    for leg in rig.system.legs() {
        assert_eq!(leg.state(), LegState::Stopped);
        assert_eq!(rig.hw.last_speed(leg.config().motor_channel), Some(0));
    }
}

#[test]
fn smooth_policy_settles_then_reports_stopped() {
    let config = SystemConfig {
        stop_policy: StopPolicy::Smooth,
        ..SystemConfig::default()
    };
    let mut rig = Rig::new(config);
    rig.setup();
    rig.hw.hold(true, false);
    rig.run(1000);
    rig.hw.hold(false, false);

    assert!(rig.run_until(200, |r| r.system.state() == SystemState::Stopping));
    assert!(rig.run_until(3000, |r| r.system.state() == SystemState::Stopped));
    assert_eq!(
        rig.sink.count(|e| *e
            == LiftEvent::StateChanged {
                from: SystemState::Stopping,
                to: SystemState::Stopped
            }),
        1
    );
    for leg in rig.system.legs() {
        assert_eq!(rig.hw.last_speed(leg.config().motor_channel), Some(0));
    }
}

#[test]
fn panel_read_failure_counts_as_release() {
    let mut rig = moving_rig();
    rig.hw.panel_fault = true;
    assert!(rig.run_until(200, |r| r.system.state() == SystemState::Stopping));
}

#[test]
fn emergency_stop_overrides_motion() {
    let mut rig = moving_rig();
    rig.run(300);
    rig.system
        .handle_command(LiftCommand::EmergencyStop, &mut rig.hw, &mut rig.sink, rig.now)
        .unwrap();

    assert_eq!(rig.system.state(), SystemState::Stopped);
    for leg in rig.system.legs() {
        assert_eq!(leg.state(), LegState::Stopped);
        assert_eq!(rig.hw.last_speed(leg.config().motor_channel), Some(0));
    }
}

// ── Limits and faults ─────────────────────────────────────────

#[test]
fn upper_limit_refuses_moving_up_but_allows_down() {
    let mut rig = Rig::with_legs(4);
    let pin = rig.upper_pin(1);
    rig.hw.press(pin);
    rig.setup();
    rig.hw.hold(true, false);
    rig.run(500);

    assert_eq!(rig.system.status(), LegStatus::UpperLimited);
    assert_eq!(rig.system.state(), SystemState::Stopped);
    assert_eq!(
        rig.sink.count(|e| matches!(
            e,
            LiftEvent::StateChanged {
                to: SystemState::MovingUp,
                ..
            }
        )),
        0
    );
    assert!(rig.sink.events.contains(&LiftEvent::StatusChanged {
        from: LegStatus::Fine,
        to: LegStatus::UpperLimited
    }));

    rig.hw.hold(false, true);
    assert!(rig.run_until(200, |r| r.system.state() == SystemState::MovingDown));
}

#[test]
fn malfunction_blocks_both_directions_until_cleared() {
    let mut rig = Rig::with_legs(4);
    let (upper, lower) = (rig.upper_pin(0), rig.lower_pin(0));
    rig.hw.press(upper);
    rig.hw.press(lower);
    rig.setup();

    rig.hw.hold(true, false);
    rig.run(300);
    assert_eq!(rig.system.status(), LegStatus::Malfunction);
    assert_eq!(rig.system.state(), SystemState::Stopped);
    assert!(rig.system.safety().has_fault(0));

    rig.hw.hold(false, true);
    rig.run(300);
    assert_eq!(rig.system.state(), SystemState::Stopped);

    // Contradictory input goes away: the fault clears by itself
    rig.hw.release(upper);
    rig.run(100);
    assert_eq!(rig.system.status(), LegStatus::LowerLimited);
    assert!(!rig.system.safety().has_faults());
    assert_eq!(rig.system.state(), SystemState::Stopped);

    rig.hw.hold(true, false);
    assert!(rig.run_until(200, |r| r.system.state() == SystemState::MovingUp));
}

#[test]
fn stale_encoder_holds_height_and_is_reported() {
    let mut rig = moving_rig();
    let port = rig.encoder_port(2);
    let before = rig.system.leg(2).unwrap().height();
    rig.hw.angle_faults.insert(port);
    rig.run(300);

    let leg = rig.system.leg(2).unwrap();
    assert_eq!(leg.height(), before);
    assert_eq!(leg.stale_reads(), 30);
    assert_eq!(rig.system.telemetry().legs[2].stale_reads, 30);
    assert_eq!(rig.system.state(), SystemState::MovingUp);

    rig.hw.angle_faults.clear();
    rig.step();
    assert_eq!(rig.system.leg(2).unwrap().stale_reads(), 0);
}

#[test]
fn encoder_missing_at_setup_does_not_jump_height() {
    let mut rig = Rig::with_legs(4);
    let port = rig.encoder_port(1);
    rig.hw.angles.insert(port, 3000);
    rig.hw.angle_faults.insert(port);
    rig.setup();
    rig.run(50);

    rig.hw.angle_faults.clear();
    rig.run(200);

    let leg = rig.system.leg(1).unwrap();
    assert_eq!(leg.height(), 0);
    assert_eq!(leg.stale_reads(), 0);
    assert_eq!(rig.system.state(), SystemState::Stopped);
}

// ── Remote sensing ────────────────────────────────────────────

#[test]
fn remote_sensing_uses_handed_over_measurements() {
    let config = SystemConfig {
        sensing: SensingMode::Remote,
        ..SystemConfig::default()
    };
    let mut rig = Rig::new(config);
    rig.setup();
    rig.run(100);
    assert_eq!(rig.hw.angle_reads, 0, "remote mode must not poll local sensors");

    let limited = LegMeasurement {
        height: -40,
        upper_limit: false,
        lower_limit: true,
    };
    rig.system
        .handle_command(
            LiftCommand::Measurement {
                leg: 3,
                measurement: limited,
            },
            &mut rig.hw,
            &mut rig.sink,
            rig.now,
        )
        .unwrap();
    rig.step();

    assert_eq!(rig.system.status(), LegStatus::LowerLimited);
    assert_eq!(rig.system.leg(3).unwrap().height(), -40);

    let err = rig
        .system
        .apply_measurement(9, &LegMeasurement::default())
        .unwrap_err();
    assert_eq!(err, Error::UnknownLeg(9));
}
