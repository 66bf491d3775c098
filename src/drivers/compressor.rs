//! Compressor driver — enforces the minimum off-time between runs.
//!
//! ```text
//!            start                  restart guard met
//!   Stop ───────────▶ Delay ─────────────────────────▶ Run
//!    ▲                  │                               │
//!    └──────── stop ────┴──────────── stop ─────────────┘
//! ```
//!
//! A stopped compressor may not re-energize until
//! `restart_delay_ms` has elapsed since it last left `Run` — restarting
//! against head pressure stalls the motor and trips the breaker.  The
//! driver is constructed with `stop_time = now`, so the very first start
//! after boot also waits out the window.
//!
//! `start` enters `Delay` and immediately evaluates the guard once, so a
//! compressor whose off-window has already elapsed energizes within the
//! same call.  While the guard is pending, `tick` re-evaluates it.

use log::debug;

use crate::ports::{OutputId, OutputPort};
use crate::types::HardwareItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CompressorState {
    Stop,
    Delay,
    Run,
}

pub struct CompressorDriver {
    item: HardwareItem,
    line: OutputId,
    state: CompressorState,
    /// A deadline is armed; the driver needs ticking to progress.
    delay_active: bool,
    requested: bool,
    on: bool,
    stop_time: u64,
    start_time: u64,
    run_time_ms: u64,
    restart_delay_ms: u64,
}

impl CompressorDriver {
    pub fn new(item: HardwareItem, line: OutputId, restart_delay_ms: u64, now: u64) -> Self {
        Self {
            item,
            line,
            state: CompressorState::Stop,
            delay_active: false,
            requested: false,
            on: false,
            stop_time: now,
            start_time: 0,
            run_time_ms: 0,
            restart_delay_ms,
        }
    }

    /// Request a run.  Valid only in `Stop`; ignored in `Delay` and `Run`.
    pub fn start(&mut self, now: u64, out: &mut dyn OutputPort) {
        if self.state != CompressorState::Stop {
            return;
        }
        self.state = CompressorState::Delay;
        self.requested = true;
        self.delay_active = true;
        debug!("{} start delay armed", self.item);
        self.try_run(now, out);
    }

    /// Cancel a pending or active run.  Ignored in `Stop`.
    pub fn stop(&mut self, now: u64, out: &mut dyn OutputPort) {
        match self.state {
            CompressorState::Stop => {}
            CompressorState::Delay | CompressorState::Run => {
                if self.state == CompressorState::Run {
                    self.stop_time = now;
                    self.run_time_ms += now.saturating_sub(self.start_time);
                    debug!(
                        "{} stopping, total run {} s",
                        self.item,
                        self.run_time_ms / 1000
                    );
                }
                out.set_output(self.line, false);
                self.state = CompressorState::Stop;
                self.requested = false;
                self.delay_active = false;
                self.on = false;
            }
        }
    }

    /// Advance a pending restart delay.  No-op outside `Delay`.
    pub fn tick(&mut self, now: u64, out: &mut dyn OutputPort) {
        if self.state == CompressorState::Delay {
            self.try_run(now, out);
        }
    }

    fn try_run(&mut self, now: u64, out: &mut dyn OutputPort) {
        if now.saturating_sub(self.stop_time) > self.restart_delay_ms {
            self.state = CompressorState::Run;
            self.delay_active = false;
            self.on = true;
            self.start_time = now;
            out.set_output(self.line, true);
            debug!("{} running", self.item);
        } else {
            self.delay_active = true;
        }
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    /// True while the restart deadline is armed.
    pub fn is_polling(&self) -> bool {
        self.delay_active
    }

    /// True when a run has been requested, whether or not the output is
    /// energized yet.
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
