//! Reversing-valve driver — settling delay on both transitions.
//!
//! ```text
//!            start                settle elapsed
//!   Stop ───────────▶ DelayOn ───────────────────▶ Run
//!    ▲                   │  ▲                       │
//!    │ settle elapsed    │  │ start          stop   │
//!   DelayOff ◀───────────┘  └────────── DelayOff ◀──┘
//!         (stop)
//! ```
//!
//! Moving the valve re-routes the refrigerant circuit; the circuit needs
//! time to equalize before or after a position change, and a compressor
//! driven against an unsettled circuit is damaged.  The same elapsed-settle
//! guard completes both `DelayOn` and `DelayOff` — the window restarts
//! whenever a transition is requested.
//!
//! Note the output level: during `DelayOff` the coil stays energized (and
//! `is_on` reports true) until the settle elapses; only then does the
//! valve actually drop out.

use log::debug;

use crate::ports::{OutputId, OutputPort};
use crate::types::HardwareItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValveState {
    Stop,
    DelayOn,
    Run,
    DelayOff,
}

pub struct ValveDriver {
    item: HardwareItem,
    line: OutputId,
    state: ValveState,
    /// A deadline is armed; the driver needs ticking to progress.
    delay_active: bool,
    requested: bool,
    on: bool,
    /// Tick at which the current settling window began.
    delay_started_at: u64,
    start_time: u64,
    run_time_ms: u64,
    settle_ms: u64,
}

impl ValveDriver {
    pub fn new(item: HardwareItem, line: OutputId, settle_ms: u64) -> Self {
        Self {
            item,
            line,
            state: ValveState::Stop,
            delay_active: false,
            requested: false,
            on: false,
            delay_started_at: 0,
            start_time: 0,
            run_time_ms: 0,
            settle_ms,
        }
    }

    /// Request the heat (energized) position.  Valid in `Stop` and
    /// `DelayOff`; ignored in `DelayOn` and `Run`.
    pub fn start(&mut self, now: u64, _out: &mut dyn OutputPort) {
        match self.state {
            ValveState::Stop | ValveState::DelayOff => {
                self.state = ValveState::DelayOn;
                self.requested = true;
                self.delay_active = true;
                self.delay_started_at = now;
                debug!("{} settle-on window armed", self.item);
            }
            ValveState::DelayOn | ValveState::Run => {}
        }
    }

    /// Request the cool (de-energized) position.  Valid in `DelayOn` and
    /// `Run`; ignored in `Stop` and `DelayOff`.
    pub fn stop(&mut self, now: u64, _out: &mut dyn OutputPort) {
        match self.state {
            ValveState::DelayOn | ValveState::Run => {
                self.state = ValveState::DelayOff;
                self.requested = false;
                self.delay_active = true;
                self.delay_started_at = now;
                debug!("{} settle-off window armed", self.item);
            }
            ValveState::Stop | ValveState::DelayOff => {}
        }
    }

    /// Advance a pending settle window.  No-op in `Stop` and `Run`.
    pub fn tick(&mut self, now: u64, out: &mut dyn OutputPort) {
        match self.state {
            ValveState::DelayOn => {
                if self.settle_elapsed(now) {
                    self.state = ValveState::Run;
                    self.delay_active = false;
                    self.on = true;
                    self.start_time = now;
                    out.set_output(self.line, true);
                    debug!("{} in heat position", self.item);
                }
            }
            ValveState::DelayOff => {
                if self.settle_elapsed(now) {
                    self.enter_stop(now, out);
                }
            }
            ValveState::Stop | ValveState::Run => {}
        }
    }

    fn settle_elapsed(&self, now: u64) -> bool {
        now.saturating_sub(self.delay_started_at) > self.settle_ms
    }

    fn enter_stop(&mut self, now: u64, out: &mut dyn OutputPort) {
        self.state = ValveState::Stop;
        self.requested = false;
        self.delay_active = false;
        if self.on {
            self.run_time_ms += now.saturating_sub(self.start_time);
            debug!(
                "{} in cool position, total run {} s",
                self.item,
                self.run_time_ms / 1000
            );
        }
        self.on = false;
        out.set_output(self.line, false);
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    /// True while a settle deadline is armed.
    pub fn is_polling(&self) -> bool {
        self.delay_active
    }

    /// True when the heat position has been requested, whether or not the
    /// settle has completed.
    pub fn is_requested(&self) -> bool {
        self.requested
    }

    pub fn start_time(&self) -> u64 {
        self.start_time
    }

    pub fn run_time_ms(&self) -> u64 {
        self.run_time_ms
    }

    pub fn reset_run_time(&mut self) {
        self.run_time_ms = 0;
    }
}
