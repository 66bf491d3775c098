//! Control core for an RV coach HVAC system.
//!
//! Orchestrates two air-conditioning compressors, an electric reversing
//! valve (heat-pump mode), a gas furnace, a two-stage variable-coolant
//! coach heater and a two-stage blower against a user temperature
//! setpoint, while enforcing the electromechanical constraints that keep
//! the equipment alive:
//!
//! - compressors get a mandatory minimum off-time before restart,
//! - the reversing valve gets refrigerant settling time on both
//!   transitions, with compressors held off across the move,
//! - airflow is established before any compressor starts, and the second
//!   compressor is staggered behind the first to limit inrush.
//!
//! The crate is a pure control layer with a deterministic tick-driven
//! API.  Platform concerns stay outside: the host supplies a monotonic
//! [`Clock`], an [`OutputPort`] bound to its GPIO (or a mock), the
//! measured temperature, and availability flags for each piece of
//! equipment.  Diagnostics go through the `log` facade and are a no-op
//! unless the host installs a logger.

#![deny(unused_must_use)]

pub mod availability;
pub mod config;
pub mod controller;
pub mod drivers;
pub mod ports;
pub mod types;

pub use availability::Availability;
pub use config::TimingConfig;
pub use controller::{Controller, OutputMap, TEMP_UNSET};
pub use ports::{Clock, OutputId, OutputPort};
pub use types::{FanMode, HardwareItem, HardwareMode, SystemMode};
