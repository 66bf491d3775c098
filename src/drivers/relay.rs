//! Simple on/off actuator driver.
//!
//! Covers the fan stages, the gas furnace and both coach-heat stages:
//! anything that can be energized and de-energized freely.  Start and stop
//! are idempotent; repeated starts do not re-latch the start timestamp.

use log::debug;

use crate::ports::{OutputId, OutputPort};
use crate::types::HardwareItem;

pub struct RelayDriver {
    item: HardwareItem,
    line: OutputId,
    on: bool,
    start_time: u64,
    run_time_ms: u64,
}

impl RelayDriver {
    pub fn new(item: HardwareItem, line: OutputId) -> Self {
        Self {
            item,
            line,
            on: false,
            start_time: 0,
            run_time_ms: 0,
        }
    }

    pub fn start(&mut self, now: u64, out: &mut dyn OutputPort) {
        if self.on {
            return;
        }
        out.set_output(self.line, true);
        self.on = true;
        self.start_time = now;
        debug!("{} starting", self.item);
    }

    pub fn stop(&mut self, now: u64, out: &mut dyn OutputPort) {
        if !self.on {
            return;
        }
        out.set_output(self.line, false);
        self.on = false;
        self.run_time_ms += now.saturating_sub(self.start_time);
        debug!("{} stopping, total run {} s", self.item, self.run_time_ms / 1000);
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Timestamp of the last off→on transition.
    pub fn start_time(&self) -> u64 {
        self.start_time
    }

    /// Accumulated energized time over completed runs.
    pub fn run_time_ms(&self) -> u64 {
        self.run_time_ms
    }

    pub fn reset_run_time(&mut self) {
        self.run_time_ms = 0;
    }
}
