//! Report types shared between the input side and the output side
//!
//! 1. [`input`] - Normalized physical pad snapshots ([`InputReport`])
//! 2. [`frame`] - Assembled virtual-pad frames ([`OutputFrame`])
//!
//! # Data Flow
//!
//! ```text
//! HID Transport ──► InputReport ──► Remap Engine ──► OutputFrame ──► Virtual Bus
//!                   (one per poll)                   (one per report)
//! ```

pub mod frame;
pub mod input;

pub use frame::{OutputFrame, VirtualButton};
pub use input::{InputReport, PadAddress, SourceButton, StickSample};
