//! Port traits — the boundary between the control core and the platform.
//!
//! ```text
//!   Clock adapter ──▶ Clock ──▶ Controller ──▶ OutputPort ──▶ GPIO adapter
//! ```
//!
//! The host implements both traits for its platform (memory-mapped GPIO on
//! an MCU, mocks on a workstation) and hands them to the controller at
//! construction.  The core never touches pins or timers directly.

/// Opaque handle for one output line.
///
/// The meaning is platform-specific (GPIO number, relay board channel,
/// simulation slot).  Actuator polarity — which electrical level counts as
/// "energized" — is the adapter's concern, not the core's.
pub type OutputId = u16;

/// Monotonic time source.
///
/// Implementations MUST be non-decreasing across calls; all sequencing
/// delays in the core are deadlines against this clock. Wall-clock time
/// sources that can step backwards (NTP-adjusted) are not acceptable.
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin (typically boot).
    fn now_ms(&self) -> u64;
}

/// Write-side port: the core calls this to (de)energize an actuator.
///
/// Writes are level-based and idempotent from the core's perspective;
/// adapters may debounce or coalesce repeated writes of the same level.
pub trait OutputPort {
    fn set_output(&mut self, line: OutputId, energized: bool);
}
