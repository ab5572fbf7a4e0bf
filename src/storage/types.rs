//! Record types for stored voltage profiles.

use serde::{Deserialize, Serialize};

/// A single stored pin measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PinReading {
    /// 1-based pin position within the profile.
    pub pin: u32,
    /// Reference voltage, rounded to 2 decimals at entry time.
    pub voltage: f64,
}

/// A complete named voltage profile as read back from a backing file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    /// Readings ordered by pin ascending, pins contiguous from 1.
    pub pins: Vec<PinReading>,
}

impl Profile {
    /// Number of pins in this profile.
    pub fn pin_count(&self) -> usize {
        self.pins.len()
    }

    /// Voltages in pin order, for pre-filling entry fields.
    pub fn voltages(&self) -> Vec<f64> {
        self.pins.iter().map(|r| r.voltage).collect()
    }
}
