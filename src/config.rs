//! Sequencing time constants.
//!
//! All tunable delays for the control core.  Hosts may persist or
//! provision these; the defaults match the coach's production tuning.

use serde::{Deserialize, Serialize};

/// Timing configuration, all values in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Interval between goal-mode recomputations.
    pub decide_period_ms: u64,
    /// A fan stage must have run this long before a compressor may start.
    pub fan_to_comp_delay_ms: u64,
    /// Compressor 1 must have run this long before compressor 2 may start.
    pub comp_stagger_ms: u64,
    /// Minimum compressor off-time before a restart.
    pub compressor_restart_delay_ms: u64,
    /// Refrigerant settling time on both reversing-valve transitions.
    pub valve_settle_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            decide_period_ms: 30_000,             // 30 s
            fan_to_comp_delay_ms: 15_000,         // 15 s
            comp_stagger_ms: 15_000,              // 15 s
            compressor_restart_delay_ms: 120_000, // 2 min
            valve_settle_ms: 60_000,              // 1 min
        }
    }
}
