//! End-to-end sequencing scenarios at a 1000 ms tick.
//!
//! Compressors are constructed with their restart window armed, so
//! scenarios that need a compressor early first idle past the boot
//! window (no temperature sample keeps the goal at Off meanwhile).

use crate::mock_hw::{line, rig, tick_until};
use coachclimate::HardwareItem::{
    CoachHeatHigh, CoachHeatLow, Comp1, Comp2, FanHigh, FanLow, GasHeat, ReversingValve,
};
use coachclimate::{FanMode, HardwareMode, SystemMode};

#[test]
fn cool_startup_staged_sequence() {
    let (mut ctrl, clock, outputs) = rig(0);
    ctrl.set_system_mode(SystemMode::Cool);
    tick_until(&mut ctrl, &clock, 130_000);
    assert_eq!(ctrl.goal_mode(), HardwareMode::Off);

    ctrl.set_temperature(76);
    // Next goal recomputation lands at 150 s.
    tick_until(&mut ctrl, &clock, 150_000);
    assert_eq!(ctrl.goal_mode(), HardwareMode::HighCool);
    assert!(!ctrl.is_on(FanHigh));

    // Sequencing picks the new goal up on the following tick.
    tick_until(&mut ctrl, &clock, 151_000);
    assert!(ctrl.is_on(FanHigh));
    assert!(!ctrl.is_on(FanLow));
    assert!(!ctrl.is_on(Comp1));

    // Fan-to-compressor delay: Comp1 exactly 15 s behind the fan.
    tick_until(&mut ctrl, &clock, 165_000);
    assert!(!ctrl.is_on(Comp1));
    tick_until(&mut ctrl, &clock, 166_000);
    assert!(ctrl.is_on(Comp1));
    assert_eq!(
        ctrl.start_time_ms(Comp1) - ctrl.start_time_ms(FanHigh),
        15_000
    );
    assert!(!ctrl.is_on(Comp2));

    // Stagger: Comp2 exactly 15 s behind Comp1.
    tick_until(&mut ctrl, &clock, 180_000);
    assert!(!ctrl.is_on(Comp2));
    tick_until(&mut ctrl, &clock, 181_000);
    assert!(ctrl.is_on(Comp2));
    assert_eq!(ctrl.start_time_ms(Comp2) - ctrl.start_time_ms(Comp1), 15_000);

    // Heat sources and the valve never came on.
    assert!(!ctrl.is_on(GasHeat));
    assert!(!ctrl.is_on(CoachHeatLow));
    assert!(!ctrl.is_on(CoachHeatHigh));
    assert!(!ctrl.is_on(ReversingValve));
    assert!(!outputs.level(line(GasHeat)));
    assert!(!outputs.level(line(ReversingValve)));
}

#[test]
fn compressor_restart_window_enforced() {
    let (mut ctrl, clock, _outputs) = rig(0);
    ctrl.set_system_mode(SystemMode::Cool);
    ctrl.set_temperature(76);
    tick_until(&mut ctrl, &clock, 136_000);
    assert!(ctrl.is_on(Comp1));

    // Satisfied: the next recomputation (150 s) drops the goal to Off.
    ctrl.set_temperature(72);
    tick_until(&mut ctrl, &clock, 150_000);
    assert_eq!(ctrl.goal_mode(), HardwareMode::Off);
    tick_until(&mut ctrl, &clock, 151_000);
    assert!(!ctrl.is_on(Comp1));
    assert!(!ctrl.is_on(Comp2));
    let stopped_at = clock.now();

    // Demand returns immediately, but the restart window must hold even
    // though fans and goal would otherwise permit a start.
    ctrl.set_temperature(76);
    tick_until(&mut ctrl, &clock, 180_000);
    assert_eq!(ctrl.goal_mode(), HardwareMode::HighCool);

    tick_until(&mut ctrl, &clock, stopped_at + 120_000);
    assert!(!ctrl.is_on(Comp1));
    assert!(ctrl.is_polling(Comp1));
    tick_until(&mut ctrl, &clock, stopped_at + 121_000);
    assert!(ctrl.is_on(Comp1));
}

#[test]
fn heat_pump_engages_and_disengages_cleanly() {
    let (mut ctrl, clock, outputs) = rig(0);
    // No coach heat high and no furnace: HighHeat must use the heat pump.
    ctrl.set_available(CoachHeatHigh, false);
    ctrl.set_available(GasHeat, false);
    ctrl.set_system_mode(SystemMode::Heat);
    tick_until(&mut ctrl, &clock, 130_000);
    ctrl.set_temperature(68);

    tick_until(&mut ctrl, &clock, 150_000);
    assert_eq!(ctrl.goal_mode(), HardwareMode::HighHeat);

    // Valve settling begins on the next sequencing pass; compressors and
    // fans are held off across the whole window.
    tick_until(&mut ctrl, &clock, 151_000);
    assert!(ctrl.is_polling(ReversingValve));
    assert!(!ctrl.is_on(ReversingValve));
    while clock.now() < 211_000 {
        clock.advance(1_000);
        ctrl.tick();
        assert!(!ctrl.is_on(Comp1));
        assert!(!ctrl.is_on(Comp2));
        assert!(!ctrl.is_on(FanLow));
        assert!(!ctrl.is_on(FanHigh));
    }

    // Valve reaches the heat position; airflow starts the same tick.
    tick_until(&mut ctrl, &clock, 212_000);
    assert!(ctrl.is_on(ReversingValve));
    assert!(outputs.level(line(ReversingValve)));
    assert!(ctrl.is_on(FanHigh));

    tick_until(&mut ctrl, &clock, 227_000);
    assert!(ctrl.is_on(Comp1));
    tick_until(&mut ctrl, &clock, 242_000);
    assert!(ctrl.is_on(Comp2));

    // Lose the valve: compressors stop within one tick, the coil stays
    // energized through its settle-off and only then drops out.
    ctrl.set_available(ReversingValve, false);
    assert!(ctrl.is_on(ReversingValve));
    tick_until(&mut ctrl, &clock, 243_000);
    assert!(!ctrl.is_on(Comp1));
    assert!(!ctrl.is_on(Comp2));

    tick_until(&mut ctrl, &clock, 302_000);
    assert!(ctrl.is_on(ReversingValve));
    tick_until(&mut ctrl, &clock, 303_000);
    assert!(!ctrl.is_on(ReversingValve));
    assert!(!outputs.level(line(ReversingValve)));
}

#[test]
fn coach_heat_preferred_then_falls_back_to_heat_pump() {
    let (mut ctrl, clock, _outputs) = rig(0);
    ctrl.set_system_mode(SystemMode::Heat);
    ctrl.set_temperature(69);
    tick_until(&mut ctrl, &clock, 31_000);
    assert_eq!(ctrl.goal_mode(), HardwareMode::LowHeat);
    assert!(ctrl.is_on(CoachHeatLow));
    assert!(!ctrl.is_on(Comp1));
    assert!(!ctrl.is_on(Comp2));
    assert!(!ctrl.is_on(GasHeat));
    assert!(!ctrl.is_on(ReversingValve));

    // Coolant no longer hot: next tick falls through to the heat pump.
    ctrl.set_available(CoachHeatLow, false);
    assert!(!ctrl.is_on(CoachHeatLow));
    tick_until(&mut ctrl, &clock, 32_000);
    assert!(ctrl.is_polling(ReversingValve));
    assert!(!ctrl.is_on(CoachHeatLow));
}

#[test]
fn deadband_rejects_colliding_setpoints() {
    let (mut ctrl, _clock, _outputs) = rig(0);
    assert!(!ctrl.set_heat_setpoint(72));
    assert_eq!(ctrl.heat_setpoint(), 70);
    assert!(ctrl.set_cool_setpoint(74));
    assert_eq!(ctrl.cool_setpoint(), 74);
}

#[test]
fn max_heat_runs_every_usable_source() {
    let (mut ctrl, clock, _outputs) = rig(0);
    ctrl.set_system_mode(SystemMode::Heat);
    tick_until(&mut ctrl, &clock, 130_000);
    ctrl.set_temperature(64);

    tick_until(&mut ctrl, &clock, 150_000);
    assert_eq!(ctrl.goal_mode(), HardwareMode::MaxHeat);

    // First pass: static heat sources on, valve settling starts, airflow
    // waits for the valve.
    tick_until(&mut ctrl, &clock, 151_000);
    assert!(ctrl.is_on(CoachHeatHigh));
    assert!(!ctrl.is_on(CoachHeatLow));
    assert!(ctrl.is_on(GasHeat));
    assert!(ctrl.is_polling(ReversingValve));
    assert!(!ctrl.is_on(FanHigh));

    tick_until(&mut ctrl, &clock, 212_000);
    assert!(ctrl.is_on(ReversingValve));
    assert!(ctrl.is_on(FanHigh));
    tick_until(&mut ctrl, &clock, 227_000);
    assert!(ctrl.is_on(Comp1));
    tick_until(&mut ctrl, &clock, 242_000);
    assert!(ctrl.is_on(Comp2));

    // Steady state: everything on except the low stages.
    assert!(ctrl.is_on(CoachHeatHigh));
    assert!(ctrl.is_on(GasHeat));
    assert!(ctrl.is_on(ReversingValve));
    assert!(ctrl.is_on(FanHigh));
    assert!(!ctrl.is_on(FanLow));
    assert!(!ctrl.is_on(CoachHeatLow));
}

#[test]
fn fan_switchover_stops_outgoing_stage_first() {
    let (mut ctrl, clock, outputs) = rig(0);
    ctrl.set_fan_mode(FanMode::Low);
    tick_until(&mut ctrl, &clock, 1_000);
    assert!(ctrl.is_on(FanLow));

    outputs.clear_writes();
    ctrl.set_fan_mode(FanMode::High);
    tick_until(&mut ctrl, &clock, 2_000);
    assert!(!ctrl.is_on(FanLow));
    assert!(ctrl.is_on(FanHigh));

    let writes = outputs.writes();
    let low_off = writes
        .iter()
        .position(|w| *w == (line(FanLow), false))
        .expect("low stage must be dropped");
    let high_on = writes
        .iter()
        .position(|w| *w == (line(FanHigh), true))
        .expect("high stage must be energized");
    assert!(low_off < high_on, "outgoing stage must stop before the incoming one starts");
}
