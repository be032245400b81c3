//! Normalized input snapshots as delivered by the HID transport
//!
//! The transport has already parsed the wire bytes and centered the analog
//! axes; everything in here is plain data. One [`InputReport`] describes the
//! complete state of one physical pad at one polling instant.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Physical buttons of a DualShock-style pad
///
/// Profile files reference these names, so the set is serde-visible. A pad
/// that lacks one of these simply never reports state for it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceButton {
    Cross,
    Circle,
    Square,
    Triangle,
    Up,
    Down,
    Left,
    Right,
    L1,
    R1,
    L2,
    R2,
    L3,
    R3,
    Select,
    Start,
    Ps,
}

impl fmt::Display for SourceButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Stable MAC-like identity of a physical pad
///
/// Kept as the transport delivered it; normalization happens only at
/// comparison time in the profile matcher.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PadAddress(pub String);

impl PadAddress {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PadAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One analog stick sample, centered by the transport
///
/// Deflection around the rest position, -128..=127 per axis. Y is positive
/// towards the player (DualShock convention, Y down).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StickSample {
    pub x: i8,
    pub y: i8,
}

impl StickSample {
    pub fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }
}

/// Snapshot of one physical pad for one polling instant
///
/// Immutable once received; the pipeline invocation that processes it is the
/// only owner. Buttons without recorded state are absent from the map, which
/// downstream treats as "unsupported on this device", not as released.
#[derive(Clone, Debug)]
pub struct InputReport {
    /// Slot the transport assigned to this pad (also tags the output frame)
    pub pad_slot: u8,

    /// Stable device identity for ByAddress profile matching
    pub address: PadAddress,

    pub left_stick: StickSample,
    pub right_stick: StickSample,

    /// Trigger travel, 0 = released, 255 = fully pressed
    pub left_trigger: u8,
    pub right_trigger: u8,

    /// Pressed state per recognized button
    pub buttons: HashMap<SourceButton, bool>,

    /// Polling instant; doubles as the turbo clock
    pub timestamp: DateTime<Local>,
}

impl InputReport {
    /// Creates an empty report for the given pad identity
    pub fn new(pad_slot: u8, address: PadAddress, timestamp: DateTime<Local>) -> Self {
        Self {
            pad_slot,
            address,
            left_stick: StickSample::default(),
            right_stick: StickSample::default(),
            left_trigger: 0,
            right_trigger: 0,
            buttons: HashMap::new(),
            timestamp,
        }
    }

    /// Pressed state of a button, `None` when this device never reported it
    pub fn button_state(&self, button: SourceButton) -> Option<bool> {
        self.buttons.get(&button).copied()
    }
}
