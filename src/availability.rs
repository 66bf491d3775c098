//! Equipment availability and enablement flags.
//!
//! Two flags per hardware item, with different owners:
//!
//! - `available` — determined by the coach systems (shore/generator power
//!   present, engine coolant hot enough for coach heat, ...).
//! - `enabled` — the user's permission to run the item at all.
//!
//! An item is *usable* only when both are true.  The supervisor consults
//! usability on every sequencing pass; it never starts an unusable item.
//!
//! Reads and writes both happen from the single control context (the host
//! forwards its availability sensing through the controller's setters), so
//! no interior synchronization is needed here.  Hosts that sample
//! availability from interrupt context must hand the values over on the
//! main loop, not mutate this struct directly.

use crate::types::HardwareItem;

#[derive(Debug, Clone)]
pub struct Availability {
    available: [bool; HardwareItem::COUNT],
    enabled: [bool; HardwareItem::COUNT],
}

impl Availability {
    /// Everything available and enabled.
    pub fn new() -> Self {
        Self {
            available: [true; HardwareItem::COUNT],
            enabled: [true; HardwareItem::COUNT],
        }
    }

    pub fn is_available(&self, item: HardwareItem) -> bool {
        self.available[item as usize]
    }

    pub fn is_enabled(&self, item: HardwareItem) -> bool {
        self.enabled[item as usize]
    }

    /// Usable = system-available AND user-enabled.
    pub fn is_usable(&self, item: HardwareItem) -> bool {
        self.available[item as usize] && self.enabled[item as usize]
    }

    /// Returns true if the flag actually changed.
    pub fn set_available(&mut self, item: HardwareItem, flag: bool) -> bool {
        let slot = &mut self.available[item as usize];
        let changed = *slot != flag;
        *slot = flag;
        changed
    }

    /// Returns true if the flag actually changed.
    pub fn set_enabled(&mut self, item: HardwareItem, flag: bool) -> bool {
        let slot = &mut self.enabled[item as usize];
        let changed = *slot != flag;
        *slot = flag;
        changed
    }
}

impl Default for Availability {
    fn default() -> Self {
        Self::new()
    }
}
