//! Actuator drivers and the polymorphic device handle.
//!
//! Three driver shapes cover the whole equipment roster:
//!
//! - [`RelayDriver`] — plain on/off (fans, gas furnace, coach heat stages).
//! - [`CompressorDriver`] — on/off plus a mandatory minimum off-time
//!   before restart.
//! - [`ValveDriver`] — on/off plus a refrigerant settling delay on both
//!   transitions.
//!
//! [`Device`] wraps them as a tagged variant so the supervisor can hold a
//! uniform bank indexed by [`HardwareItem`](crate::types::HardwareItem).
//! The set is closed and fixed, so a value-typed sum beats trait objects:
//! no heap, no vtables, exhaustive dispatch.

pub mod compressor;
pub mod relay;
pub mod valve;

pub use compressor::CompressorDriver;
pub use relay::RelayDriver;
pub use valve::ValveDriver;

use crate::ports::OutputPort;

/// Uniform handle over the three driver variants.
pub enum Device {
    Relay(RelayDriver),
    Compressor(CompressorDriver),
    Valve(ValveDriver),
}

impl Device {
    pub fn start(&mut self, now: u64, out: &mut dyn OutputPort) {
        match self {
            Self::Relay(d) => d.start(now, out),
            Self::Compressor(d) => d.start(now, out),
            Self::Valve(d) => d.start(now, out),
        }
    }

    pub fn stop(&mut self, now: u64, out: &mut dyn OutputPort) {
        match self {
            Self::Relay(d) => d.stop(now, out),
            Self::Compressor(d) => d.stop(now, out),
            Self::Valve(d) => d.stop(now, out),
        }
    }

    /// Advance any armed deadline.  Cheap no-op for relays.
    pub fn tick(&mut self, now: u64, out: &mut dyn OutputPort) {
        match self {
            Self::Relay(_) => {}
            Self::Compressor(d) => d.tick(now, out),
            Self::Valve(d) => d.tick(now, out),
        }
    }

    pub fn is_on(&self) -> bool {
        match self {
            Self::Relay(d) => d.is_on(),
            Self::Compressor(d) => d.is_on(),
            Self::Valve(d) => d.is_on(),
        }
    }

    /// True while the device has a deadline armed and needs ticking.
    pub fn is_polling(&self) -> bool {
        match self {
            Self::Relay(_) => false,
            Self::Compressor(d) => d.is_polling(),
            Self::Valve(d) => d.is_polling(),
        }
    }

    /// Timestamp of the last off→on transition.
    pub fn start_time(&self) -> u64 {
        match self {
            Self::Relay(d) => d.start_time(),
            Self::Compressor(d) => d.start_time(),
            Self::Valve(d) => d.start_time(),
        }
    }

    /// Accumulated energized time, in whole seconds.
    pub fn run_time_secs(&self) -> u64 {
        let ms = match self {
            Self::Relay(d) => d.run_time_ms(),
            Self::Compressor(d) => d.run_time_ms(),
            Self::Valve(d) => d.run_time_ms(),
        };
        ms / 1000
    }

    pub fn reset_run_time(&mut self) {
        match self {
            Self::Relay(d) => d.reset_run_time(),
            Self::Compressor(d) => d.reset_run_time(),
            Self::Valve(d) => d.reset_run_time(),
        }
    }
}
