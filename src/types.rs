//! Core mode and hardware-identity enumerations.
//!
//! All four enums are closed sets: the coach's equipment roster is fixed
//! at design time, and the supervisor dispatches over them with exhaustive
//! `match`es rather than any dynamic registry.

use core::fmt;

// ---------------------------------------------------------------------------
// System mode
// ---------------------------------------------------------------------------

/// User-selected operating mode for the whole system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemMode {
    Off,
    Cool,
    Heat,
    /// Pick cooling or heating automatically from the two setpoints.
    Auto,
}

impl SystemMode {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Off => "Off",
            Self::Cool => "Cool",
            Self::Heat => "Heat",
            Self::Auto => "Auto",
        }
    }
}

impl fmt::Display for SystemMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Fan mode
// ---------------------------------------------------------------------------

/// User-selected blower behaviour.
///
/// `Circulate` currently behaves exactly as `Low`; it is a distinct setting
/// so the front panel can already offer it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanMode {
    /// Fan runs only when the active hardware mode needs airflow.
    Auto,
    Low,
    High,
    Circulate,
}

impl FanMode {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Auto => "Auto",
            Self::Low => "Low",
            Self::High => "High",
            Self::Circulate => "Circulate",
        }
    }
}

impl fmt::Display for FanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Hardware mode (the supervisor's goal)
// ---------------------------------------------------------------------------

/// Internal hardware operating target chosen by the supervisor.
///
/// Distinct from [`SystemMode`]: the user asks for "Heat", the supervisor
/// decides *how much* heat the equipment should be producing right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HardwareMode {
    Off,
    /// Single compressor cooling.
    LowCool,
    /// Both compressors staged on.
    HighCool,
    /// Coach heat low stage, or single-compressor heat pump.
    LowHeat,
    /// Coach heat high stage, two-compressor heat pump, or gas furnace.
    HighHeat,
    /// Every usable heat source in parallel.
    MaxHeat,
    /// Reserved fan-only modes; never derived in this revision.
    LowFan,
    HighFan,
}

impl HardwareMode {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Off => "Off",
            Self::LowCool => "Low Cool",
            Self::HighCool => "High Cool",
            Self::LowHeat => "Low Heat",
            Self::HighHeat => "High Heat",
            Self::MaxHeat => "Max Heat",
            Self::LowFan => "Low Fan",
            Self::HighFan => "High Fan",
        }
    }
}

impl fmt::Display for HardwareMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Hardware item identity
// ---------------------------------------------------------------------------

/// Identity of every physical actuator the controller sequences.
///
/// The discriminants index the controller's device bank and the
/// availability flag arrays, so the order here is load-bearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum HardwareItem {
    Comp1 = 0,
    Comp2 = 1,
    GasHeat = 2,
    ReversingValve = 3,
    FanLow = 4,
    FanHigh = 5,
    CoachHeatLow = 6,
    CoachHeatHigh = 7,
}

impl HardwareItem {
    /// Total number of items — used to size the device and flag arrays.
    pub const COUNT: usize = 8;

    /// Every item in discriminant order.
    pub const ALL: [HardwareItem; Self::COUNT] = [
        Self::Comp1,
        Self::Comp2,
        Self::GasHeat,
        Self::ReversingValve,
        Self::FanLow,
        Self::FanHigh,
        Self::CoachHeatLow,
        Self::CoachHeatHigh,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Comp1 => "Compressor 1",
            Self::Comp2 => "Compressor 2",
            Self::GasHeat => "Gas Heater",
            Self::ReversingValve => "Reversing Valve",
            Self::FanLow => "Fan Low",
            Self::FanHigh => "Fan High",
            Self::CoachHeatLow => "Coach Heat Low",
            Self::CoachHeatHigh => "Coach Heat High",
        }
    }
}

impl fmt::Display for HardwareItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
