//! Mock hardware adapters for integration tests.
//!
//! The clock is a shared settable cell; the output port records every
//! write so tests can assert on both current levels and ordering,
//! without touching real GPIO.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use coachclimate::{
    Clock, Controller, HardwareItem, OutputId, OutputMap, OutputPort, TimingConfig,
};

// ── MockClock ─────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockClock(Rc<Cell<u64>>);

impl MockClock {
    pub fn new(start_ms: u64) -> Self {
        Self(Rc::new(Cell::new(start_ms)))
    }

    pub fn advance(&self, ms: u64) {
        self.0.set(self.0.get() + ms);
    }

    pub fn now(&self) -> u64 {
        self.0.get()
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u64 {
        self.0.get()
    }
}

// ── MockOutputs ───────────────────────────────────────────────

#[derive(Default)]
struct OutputState {
    levels: HashMap<OutputId, bool>,
    writes: Vec<(OutputId, bool)>,
}

#[derive(Clone, Default)]
pub struct MockOutputs(Rc<RefCell<OutputState>>);

impl OutputPort for MockOutputs {
    fn set_output(&mut self, line: OutputId, energized: bool) {
        let mut state = self.0.borrow_mut();
        state.levels.insert(line, energized);
        state.writes.push((line, energized));
    }
}

#[allow(dead_code)]
impl MockOutputs {
    /// Current electrical level of a line (false if never written).
    pub fn level(&self, line: OutputId) -> bool {
        self.0.borrow().levels.get(&line).copied().unwrap_or(false)
    }

    /// Full write history, oldest first.
    pub fn writes(&self) -> Vec<(OutputId, bool)> {
        self.0.borrow().writes.clone()
    }

    pub fn clear_writes(&self) {
        self.0.borrow_mut().writes.clear();
    }
}

// ── Test rig ──────────────────────────────────────────────────

pub const LINES: OutputMap = [10, 11, 12, 13, 14, 15, 16, 17];

pub fn line(item: HardwareItem) -> OutputId {
    LINES[item as usize]
}

pub fn rig(start_ms: u64) -> (Controller<MockClock, MockOutputs>, MockClock, MockOutputs) {
    let clock = MockClock::new(start_ms);
    let outputs = MockOutputs::default();
    let controller = Controller::new(
        clock.clone(),
        outputs.clone(),
        LINES,
        TimingConfig::default(),
    );
    (controller, clock, outputs)
}

/// Advance in 1 s ticks until the clock reads `until_ms`.
pub fn tick_until(
    controller: &mut Controller<MockClock, MockOutputs>,
    clock: &MockClock,
    until_ms: u64,
) {
    while clock.now() < until_ms {
        clock.advance(1_000);
        controller.tick();
    }
}
