//! Assembled virtual-pad frames in the standardized output layout

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Buttons of the standardized virtual pad with their wire bit positions
///
/// The bit layout matches the common XInput-style gamepad mask, so the frame
/// can be handed to the virtual bus without further translation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum VirtualButton {
    DpadUp = 0x0001,
    DpadDown = 0x0002,
    DpadLeft = 0x0004,
    DpadRight = 0x0008,
    Start = 0x0010,
    Back = 0x0020,
    LeftThumb = 0x0040,
    RightThumb = 0x0080,
    LeftShoulder = 0x0100,
    RightShoulder = 0x0200,
    Guide = 0x0400,
    A = 0x1000,
    B = 0x2000,
    X = 0x4000,
    Y = 0x8000,
}

impl VirtualButton {
    /// Bitmask contribution of this button
    pub const fn bit(self) -> u16 {
        self as u16
    }
}

impl fmt::Display for VirtualButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// One complete virtual-pad state, produced once per input report
///
/// Ownership moves to the sink on dispatch. Axis values are already shaped
/// (dead zone, inversion, scaling) and guaranteed within their widths.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OutputFrame {
    /// Pad slot the frame belongs to, copied from the input report
    pub pad_slot: u8,

    /// OR-combination of [`VirtualButton`] bits from all active profiles
    pub buttons: u16,

    pub thumb_lx: i16,
    pub thumb_ly: i16,
    pub thumb_rx: i16,
    pub thumb_ry: i16,

    pub left_trigger: u8,
    pub right_trigger: u8,

    /// Timestamp of the input report this frame was assembled from
    pub timestamp: Option<DateTime<Local>>,
}

impl OutputFrame {
    /// Zeroed frame for the given pad slot
    pub fn reset(pad_slot: u8) -> Self {
        Self {
            pad_slot,
            ..Self::default()
        }
    }

    /// Whether a virtual button is set in the mask
    pub fn is_pressed(&self, button: VirtualButton) -> bool {
        self.buttons & button.bit() != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_layout_matches_xinput_mask() {
        assert_eq!(VirtualButton::DpadUp.bit(), 0x0001);
        assert_eq!(VirtualButton::Guide.bit(), 0x0400);
        assert_eq!(VirtualButton::A.bit(), 0x1000);
        assert_eq!(VirtualButton::Y.bit(), 0x8000);
    }

    #[test]
    fn reset_clears_everything_but_the_slot() {
        let frame = OutputFrame::reset(3);
        assert_eq!(frame.pad_slot, 3);
        assert_eq!(frame.buttons, 0);
        assert_eq!(frame.thumb_lx, 0);
        assert!(!frame.is_pressed(VirtualButton::A));
    }
}
