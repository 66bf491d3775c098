//! The supervisor — owns the device bank and all high-level sequencing.
//!
//! ```text
//!                 setters (mode, fan, setpoints, temp, flags)
//!                                   │
//!                                   ▼
//!  Clock ──▶ ┌─────────────────────────────────────────────┐
//!            │                 Controller                  │
//!            │  availability · goal derivation · sequencing │ ──▶ OutputPort
//!            │        Device bank (8 actuator drivers)      │
//!            └─────────────────────────────────────────────┘
//! ```
//!
//! Each [`tick`](Controller::tick) runs four phases in a fixed order:
//!
//! 1. Service every driver with an armed deadline (restart / settle).
//! 2. Latch the user's fan mode.
//! 3. Enact the current goal hardware mode — start/stop devices in an
//!    order that honours the cross-device interlocks (fan before
//!    compressor, compressor stagger, valve settling).
//! 4. On a throttled schedule, re-derive the goal mode from the measured
//!    temperature and the setpoints.
//!
//! Phase 4 runs last, so a fresh goal is first enacted on the *next*
//! tick.  Nothing blocks: every delay is a deadline against the
//! monotonic clock, and a gate that fails this tick is simply retried on
//! the next one.

use log::{debug, info, warn};

use crate::availability::Availability;
use crate::config::TimingConfig;
use crate::drivers::{CompressorDriver, Device, RelayDriver, ValveDriver};
use crate::ports::{Clock, OutputId, OutputPort};
use crate::types::HardwareItem::{
    CoachHeatHigh, CoachHeatLow, Comp1, Comp2, FanHigh, FanLow, GasHeat, ReversingValve,
};
use crate::types::{FanMode, HardwareItem, HardwareMode, SystemMode};

/// Sentinel for "no temperature sample received yet".
pub const TEMP_UNSET: i16 = -128;

/// Output line for each hardware item, indexed by discriminant.
pub type OutputMap = [OutputId; HardwareItem::COUNT];

/// Which fan stage a sequencing path wants energized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FanStage {
    Low,
    High,
}

pub struct Controller<C: Clock, O: OutputPort> {
    clock: C,
    outputs: O,
    /// One driver per hardware item, indexed by discriminant.
    devices: [Device; HardwareItem::COUNT],
    availability: Availability,
    config: TimingConfig,

    system_mode: SystemMode,
    /// Fan mode as last requested by the user.
    user_fan_mode: FanMode,
    /// Fan mode the sequencer is currently honouring (latched each tick).
    fan_mode: FanMode,
    heat_setpoint: i16,
    cool_setpoint: i16,
    current_temp: i16,
    goal_mode: HardwareMode,
    /// Deadline for the next goal-mode recomputation.
    next_decide_at: u64,
}

impl<C: Clock, O: OutputPort> Controller<C, O> {
    pub fn new(clock: C, outputs: O, lines: OutputMap, config: TimingConfig) -> Self {
        let now = clock.now_ms();
        let line = |item: HardwareItem| lines[item as usize];
        let devices = [
            Device::Compressor(CompressorDriver::new(
                Comp1,
                line(Comp1),
                config.compressor_restart_delay_ms,
                now,
            )),
            Device::Compressor(CompressorDriver::new(
                Comp2,
                line(Comp2),
                config.compressor_restart_delay_ms,
                now,
            )),
            Device::Relay(RelayDriver::new(GasHeat, line(GasHeat))),
            Device::Valve(ValveDriver::new(
                ReversingValve,
                line(ReversingValve),
                config.valve_settle_ms,
            )),
            Device::Relay(RelayDriver::new(FanLow, line(FanLow))),
            Device::Relay(RelayDriver::new(FanHigh, line(FanHigh))),
            Device::Relay(RelayDriver::new(CoachHeatLow, line(CoachHeatLow))),
            Device::Relay(RelayDriver::new(CoachHeatHigh, line(CoachHeatHigh))),
        ];
        let next_decide_at = now + config.decide_period_ms;
        Self {
            clock,
            outputs,
            devices,
            availability: Availability::new(),
            config,
            system_mode: SystemMode::Off,
            user_fan_mode: FanMode::Auto,
            fan_mode: FanMode::Auto,
            heat_setpoint: 70,
            cool_setpoint: 73,
            current_temp: TEMP_UNSET,
            goal_mode: HardwareMode::Off,
            next_decide_at,
        }
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one control cycle.  Call at least once per second; correctness
    /// tolerates jitter because every delay is deadline-based.
    pub fn tick(&mut self) {
        let now = self.clock.now_ms();

        // Phase 1 — advance deadline-gated drivers.
        for device in self.devices.iter_mut() {
            if device.is_polling() {
                device.tick(now, &mut self.outputs);
            }
        }

        // Phase 2 — latch the user's fan mode.
        // TODO: dedicated Circulate handling (continuous low airflow while
        // the goal is Off); Circulate currently latches through as Low.
        if self.fan_mode != self.user_fan_mode {
            self.fan_mode = self.user_fan_mode;
            info!("fan mode latched: {}", self.fan_mode);
        }

        // Phase 3 — enact the current goal.
        match self.goal_mode {
            HardwareMode::Off => self.enact_off(now),
            HardwareMode::LowCool => self.enact_cool(now, false),
            HardwareMode::HighCool => self.enact_cool(now, true),
            HardwareMode::LowHeat => self.enact_low_heat(now),
            HardwareMode::HighHeat => self.enact_high_heat(now),
            HardwareMode::MaxHeat => self.enact_max_heat(now),
            // Reserved fan-only goals; never derived in this revision.
            HardwareMode::LowFan | HardwareMode::HighFan => {}
        }

        // Phase 4 — throttled goal derivation.
        self.derive_goal(now);
    }

    // ── Public setters ────────────────────────────────────────

    pub fn set_system_mode(&mut self, mode: SystemMode) {
        info!("system mode: {}", mode);
        self.system_mode = mode;
    }

    /// Takes effect on the next tick.
    pub fn set_fan_mode(&mut self, mode: FanMode) {
        info!("fan mode requested: {}", mode);
        self.user_fan_mode = mode;
    }

    /// Accepts iff the cooling setpoint stays at least 2 °F above the
    /// heating setpoint.  On rejection the prior value is retained.
    pub fn set_cool_setpoint(&mut self, temp: i16) -> bool {
        if temp - 2 >= self.heat_setpoint {
            self.cool_setpoint = temp;
            true
        } else {
            false
        }
    }

    /// Accepts iff the heating setpoint stays at least 2 °F below the
    /// cooling setpoint.  On rejection the prior value is retained.
    pub fn set_heat_setpoint(&mut self, temp: i16) -> bool {
        if temp + 2 <= self.cool_setpoint {
            self.heat_setpoint = temp;
            true
        } else {
            false
        }
    }

    /// Latest measured (or computed) coach temperature in °F.
    pub fn set_temperature(&mut self, temp: i16) {
        debug!("temperature sample: {} F", temp);
        self.current_temp = temp;
    }

    /// System-determined availability.  Dropping the flag immediately
    /// commands the device to stop (compressor/valve take their normal
    /// delay/stop path rather than having the output yanked).
    pub fn set_available(&mut self, item: HardwareItem, flag: bool) {
        if self.availability.set_available(item, flag) && !flag {
            info!("{} unavailable, stopping", item);
            let now = self.clock.now_ms();
            self.stop_item(now, item);
        }
    }

    /// User-permitted enablement; same stop-on-drop behaviour as
    /// [`set_available`](Self::set_available).
    pub fn set_enabled(&mut self, item: HardwareItem, flag: bool) {
        if self.availability.set_enabled(item, flag) && !flag {
            info!("{} disabled by user, stopping", item);
            let now = self.clock.now_ms();
            self.stop_item(now, item);
        }
    }

    // ── Read-only accessors ───────────────────────────────────

    pub fn system_mode(&self) -> SystemMode {
        self.system_mode
    }

    pub fn fan_mode(&self) -> FanMode {
        self.user_fan_mode
    }

    pub fn goal_mode(&self) -> HardwareMode {
        self.goal_mode
    }

    pub fn cool_setpoint(&self) -> i16 {
        self.cool_setpoint
    }

    pub fn heat_setpoint(&self) -> i16 {
        self.heat_setpoint
    }

    /// Latest temperature sample, or [`TEMP_UNSET`] before the first one.
    pub fn temperature(&self) -> i16 {
        self.current_temp
    }

    pub fn availability(&self) -> &Availability {
        &self.availability
    }

    pub fn is_on(&self, item: HardwareItem) -> bool {
        self.devices[item as usize].is_on()
    }

    /// True while the device has a restart/settle deadline armed.
    pub fn is_polling(&self, item: HardwareItem) -> bool {
        self.devices[item as usize].is_polling()
    }

    /// Timestamp of the device's last off→on transition.
    pub fn start_time_ms(&self, item: HardwareItem) -> u64 {
        self.devices[item as usize].start_time()
    }

    /// Accumulated energized time over completed runs, whole seconds.
    pub fn run_time_secs(&self, item: HardwareItem) -> u64 {
        self.devices[item as usize].run_time_secs()
    }

    pub fn reset_run_time(&mut self, item: HardwareItem) {
        self.devices[item as usize].reset_run_time();
    }

    // ── Sequencing: goal enactment ────────────────────────────

    fn enact_off(&mut self, now: u64) {
        self.stop_item(now, GasHeat);
        self.stop_item(now, CoachHeatHigh);
        self.stop_item(now, CoachHeatLow);
        self.stop_item(now, Comp2);
        self.stop_item(now, Comp1);
        // Valve still in the heat position: command it back once both
        // compressors are off, and retry from the top until it drops out.
        if self.is_on(ReversingValve) {
            if !self.is_on(Comp1) && !self.is_on(Comp2) {
                self.stop_item(now, ReversingValve);
            }
            return;
        }
        self.user_fan_selection(now);
    }

    /// LowCool (`two_stage = false`) and HighCool (`two_stage = true`).
    fn enact_cool(&mut self, now: u64, two_stage: bool) {
        self.stop_item(now, GasHeat);
        self.stop_item(now, CoachHeatHigh);
        self.stop_item(now, CoachHeatLow);
        if !two_stage {
            self.stop_item(now, Comp2);
        }
        // Leftover heat-pump position: compressors off, wait out the valve.
        if self.is_on(ReversingValve) {
            self.stop_item(now, Comp1);
            self.stop_item(now, Comp2);
            if !self.is_on(Comp1) && !self.is_on(Comp2) {
                self.stop_item(now, ReversingValve);
            }
            return;
        }
        if !self.any_fan_usable() {
            self.stop_item(now, Comp1);
            self.stop_item(now, Comp2);
            self.stop_item(now, FanLow);
            self.stop_item(now, FanHigh);
            return;
        }
        self.engage_fan(now, self.forced_fan_stage(two_stage));
        self.stage_compressors(now, two_stage, false);
    }

    /// LowHeat priority ladder: coach heat low → heat pump → off.
    fn enact_low_heat(&mut self, now: u64) {
        if self.usable(CoachHeatLow) {
            self.stop_item(now, Comp2);
            self.stop_item(now, Comp1);
            self.stop_item(now, ReversingValve);
            self.stop_item(now, GasHeat);
            self.stop_item(now, CoachHeatHigh);
            self.start_item(now, CoachHeatLow);
            self.user_fan_selection(now);
            return;
        }
        if self.usable(ReversingValve) {
            self.enact_heat_pump(now, false);
            return;
        }
        self.enact_off(now);
    }

    /// HighHeat priority ladder: coach heat high → heat pump → gas → off.
    fn enact_high_heat(&mut self, now: u64) {
        if self.usable(CoachHeatHigh) {
            self.stop_item(now, Comp2);
            self.stop_item(now, Comp1);
            self.stop_item(now, ReversingValve);
            self.stop_item(now, GasHeat);
            self.stop_item(now, CoachHeatLow);
            self.start_item(now, CoachHeatHigh);
            self.user_fan_selection(now);
            return;
        }
        if self.usable(ReversingValve) {
            self.enact_heat_pump(now, true);
            return;
        }
        if self.usable(GasHeat) {
            self.stop_item(now, Comp2);
            self.stop_item(now, Comp1);
            self.stop_item(now, ReversingValve);
            self.stop_item(now, CoachHeatLow);
            self.stop_item(now, CoachHeatHigh);
            self.start_item(now, GasHeat);
            self.user_fan_selection(now);
            return;
        }
        self.enact_off(now);
    }

    /// Heat-pump path shared by LowHeat (`two_stage = false`) and
    /// HighHeat (`two_stage = true`).  Caller has checked the valve is
    /// usable.
    fn enact_heat_pump(&mut self, now: u64, two_stage: bool) {
        self.stop_item(now, GasHeat);
        self.stop_item(now, CoachHeatHigh);
        self.stop_item(now, CoachHeatLow);
        if !two_stage {
            self.stop_item(now, Comp2);
        }
        if !self.is_on(ReversingValve) {
            // Compressors must be off before the valve moves.
            self.stop_item(now, Comp1);
            self.stop_item(now, Comp2);
            if !self.is_on(Comp1) && !self.is_on(Comp2) {
                self.start_item(now, ReversingValve);
            }
            if two_stage {
                // Two-stage path holds the fans back until the valve is in
                // position; single-stage lets them spin up over the settle.
                return;
            }
        }
        if !self.any_fan_usable() {
            self.stop_item(now, Comp1);
            self.stop_item(now, Comp2);
            self.stop_item(now, FanLow);
            self.stop_item(now, FanHigh);
            return;
        }
        self.engage_fan(now, self.forced_fan_stage(two_stage));
        self.stage_compressors(now, two_stage, true);
    }

    /// MaxHeat: every usable heat source in parallel.
    fn enact_max_heat(&mut self, now: u64) {
        // Compressors must not run while the refrigerant circuit is in the
        // cooling position.
        if !self.is_on(ReversingValve) {
            self.stop_item(now, Comp2);
            self.stop_item(now, Comp1);
        }
        // Coach heat: high stage preferred; low only if high is not
        // already on.
        if self.usable(CoachHeatHigh) {
            self.stop_item(now, CoachHeatLow);
            self.start_item(now, CoachHeatHigh);
        } else if self.usable(CoachHeatLow) && !self.is_on(CoachHeatHigh) {
            self.stop_item(now, CoachHeatHigh);
            self.start_item(now, CoachHeatLow);
        } else {
            self.stop_item(now, CoachHeatLow);
            self.stop_item(now, CoachHeatHigh);
        }

        if self.usable(GasHeat) {
            self.start_item(now, GasHeat);
        } else {
            self.stop_item(now, GasHeat);
        }

        if self.usable(ReversingValve) {
            if !self.is_on(ReversingValve) {
                self.stop_item(now, Comp2);
                self.stop_item(now, Comp1);
                if !self.is_on(Comp1) && !self.is_on(Comp2) {
                    self.start_item(now, ReversingValve);
                }
                return;
            }
        } else if self.is_on(ReversingValve) {
            self.stop_item(now, Comp2);
            self.stop_item(now, Comp1);
            self.stop_item(now, ReversingValve);
        }

        // Airflow and the refrigerant side: both fans unusable or valve
        // not yet in the heat position means no compressor operation.
        if !self.any_fan_usable() || !self.is_on(ReversingValve) {
            self.stop_item(now, Comp1);
            self.stop_item(now, Comp2);
            self.stop_item(now, FanLow);
            self.stop_item(now, FanHigh);
            return;
        }
        self.engage_fan(now, FanStage::High);
        self.stage_compressors(now, true, true);
    }

    // ── Sequencing: shared subroutines ────────────────────────

    /// Fan behaviour for goals that do not themselves require airflow:
    /// honour the user's fan mode, with `Auto` meaning fans off.
    fn user_fan_selection(&mut self, now: u64) {
        if !self.any_fan_usable() || self.fan_mode == FanMode::Auto {
            self.stop_item(now, FanLow);
            self.stop_item(now, FanHigh);
        } else if matches!(self.fan_mode, FanMode::Low | FanMode::Circulate) {
            self.engage_fan(now, FanStage::Low);
        } else {
            self.engage_fan(now, FanStage::High);
        }
    }

    /// Stage preference for goals that require airflow.  Two-stage goals
    /// force the high stage; single-stage goals prefer low but honour a
    /// user request for high.
    fn forced_fan_stage(&self, two_stage: bool) -> FanStage {
        if two_stage || self.fan_mode == FanMode::High {
            FanStage::High
        } else {
            FanStage::Low
        }
    }

    /// Energize the preferred stage, falling through to the other one when
    /// the preferred stage is unusable.  The outgoing stage is always
    /// stopped before the incoming one starts.  Caller guarantees at least
    /// one stage is usable.
    fn engage_fan(&mut self, now: u64, prefer: FanStage) {
        let (preferred, other) = match prefer {
            FanStage::Low => (FanLow, FanHigh),
            FanStage::High => (FanHigh, FanLow),
        };
        if self.usable(preferred) {
            if self.is_on(other) {
                self.stop_item(now, other);
            }
            self.start_item(now, preferred);
        } else {
            if self.is_on(preferred) {
                self.stop_item(now, preferred);
            }
            self.start_item(now, other);
        }
    }

    /// Gate and start the compressors.  Comp1 waits for a fan stage to
    /// have run `fan_to_comp_delay_ms`; Comp2 additionally waits for
    /// Comp1 to have run `comp_stagger_ms`.  Heat-pump callers also
    /// require the valve to report the heat position.
    fn stage_compressors(&mut self, now: u64, two_stage: bool, require_valve: bool) {
        // Never leave the second stage running without the first.
        if two_stage && !self.is_on(Comp1) && self.is_on(Comp2) {
            self.stop_item(now, Comp2);
        }
        if self.fan_warmup_pending(now) {
            return;
        }
        if !self.is_on(Comp1)
            && self.usable(Comp1)
            && self.any_fan_on()
            && (!require_valve || self.is_on(ReversingValve))
        {
            self.start_item(now, Comp1);
        }
        if !two_stage {
            return;
        }
        if !self.comp_stagger_elapsed(now) {
            return;
        }
        if !self.is_on(Comp2)
            && self.usable(Comp2)
            && self.any_fan_on()
            && (!require_valve || self.is_on(ReversingValve))
        {
            self.start_item(now, Comp2);
        }
    }

    /// True while any energized fan stage has been on for less than the
    /// fan-to-compressor delay.
    fn fan_warmup_pending(&self, now: u64) -> bool {
        let delay = self.config.fan_to_comp_delay_ms;
        [FanLow, FanHigh].into_iter().any(|stage| {
            let device = &self.devices[stage as usize];
            device.is_on() && now.saturating_sub(device.start_time()) < delay
        })
    }

    /// True once Comp1 has been on continuously for the stagger interval.
    fn comp_stagger_elapsed(&self, now: u64) -> bool {
        let comp1 = &self.devices[Comp1 as usize];
        comp1.is_on()
            && now.saturating_sub(comp1.start_time()) >= self.config.comp_stagger_ms
    }

    fn any_fan_usable(&self) -> bool {
        self.usable(FanLow) || self.usable(FanHigh)
    }

    fn any_fan_on(&self) -> bool {
        self.is_on(FanLow) || self.is_on(FanHigh)
    }

    fn usable(&self, item: HardwareItem) -> bool {
        self.availability.is_usable(item)
    }

    fn start_item(&mut self, now: u64, item: HardwareItem) {
        self.devices[item as usize].start(now, &mut self.outputs);
    }

    fn stop_item(&mut self, now: u64, item: HardwareItem) {
        self.devices[item as usize].stop(now, &mut self.outputs);
    }

    // ── Goal derivation ───────────────────────────────────────

    fn derive_goal(&mut self, now: u64) {
        if now < self.next_decide_at {
            return;
        }
        self.next_decide_at = now + self.config.decide_period_ms;
        if self.current_temp == TEMP_UNSET {
            warn!("goal derivation skipped: no temperature sample yet");
            return;
        }
        let (t, c, h) = (self.current_temp, self.cool_setpoint, self.heat_setpoint);
        let goal = match self.system_mode {
            SystemMode::Off => HardwareMode::Off,
            SystemMode::Cool => cool_goal(t, c),
            SystemMode::Heat => heat_goal(t, h),
            SystemMode::Auto => {
                if t > c {
                    cool_goal(t, c)
                } else if t < h {
                    heat_goal(t, h)
                } else {
                    HardwareMode::Off
                }
            }
        };
        if goal != self.goal_mode {
            info!("hardware goal: {} -> {}", self.goal_mode, goal);
            self.goal_mode = goal;
        }
    }
}

/// Cooling band: one degree of low cool above the setpoint, high cool
/// beyond that.
fn cool_goal(t: i16, cool_setpoint: i16) -> HardwareMode {
    if t > cool_setpoint + 1 {
        HardwareMode::HighCool
    } else if t > cool_setpoint {
        HardwareMode::LowCool
    } else {
        HardwareMode::Off
    }
}

/// Heating bands: one degree of low heat below the setpoint, high heat
/// down to four degrees under, max heat past that.
fn heat_goal(t: i16, heat_setpoint: i16) -> HardwareMode {
    if t < heat_setpoint - 4 {
        HardwareMode::MaxHeat
    } else if t < heat_setpoint - 1 {
        HardwareMode::HighHeat
    } else if t < heat_setpoint {
        HardwareMode::LowHeat
    } else {
        HardwareMode::Off
    }
}
