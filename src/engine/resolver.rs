//! Per-mapping resolution of button state
//!
//! Takes one [`ButtonMapping`] of an active profile and decides what it
//! contributes to the frame being assembled: a virtual-pad bit, a key event
//! for the injection collaborator, or nothing at all. Turbo runs first, so
//! both target kinds see the same effective state.

use crate::engine::turbo::TurboArena;
use crate::profile::{ButtonMapping, MappingTarget};
use crate::report::InputReport;
use chrono::{DateTime, Local};

/// Outcome of resolving one button mapping
///
/// `NoOp` covers both "this device never reported the source button" and
/// "pad target currently not pressed": the assembler's reset already
/// cleared the bit, absence is enough.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// OR this bit into the working button mask
    Bitmask(u16),
    /// Forward to the key-injection collaborator
    Key { code: u16, pressed: bool },
    /// Nothing to contribute
    NoOp,
}

/// Resolves one mapping against the report
///
/// An unrecognized source button is not an error; the mapping simply does
/// not apply to this device. Key targets mirror the effective state on every
/// report (down while held, up while released); the injection backend is
/// expected to treat repeated downs as idempotent.
pub fn resolve(
    report: &InputReport,
    profile: &str,
    mapping: &ButtonMapping,
    turbo: &mut TurboArena,
    now: DateTime<Local>,
) -> Resolution {
    let held = match report.button_state(mapping.source) {
        Some(state) => state,
        None => return Resolution::NoOp,
    };

    let effective = turbo.apply(profile, mapping.source, held, mapping.turbo.as_ref(), now);

    match mapping.target {
        MappingTarget::Pad(button) => {
            if effective {
                Resolution::Bitmask(button.bit())
            } else {
                Resolution::NoOp
            }
        }
        MappingTarget::Key(code) => Resolution::Key {
            code,
            pressed: effective,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{ButtonMapping, TurboSetting};
    use crate::report::{PadAddress, SourceButton, VirtualButton};

    fn report_with(button: SourceButton, pressed: bool) -> InputReport {
        let mut report = InputReport::new(0, PadAddress::default(), Local::now());
        report.buttons.insert(button, pressed);
        report
    }

    #[test]
    fn unknown_source_button_is_a_noop() {
        let report = InputReport::new(0, PadAddress::default(), Local::now());
        let mapping = ButtonMapping::pad(SourceButton::Cross, VirtualButton::A);
        let mut turbo = TurboArena::new();

        let outcome = resolve(&report, "p", &mapping, &mut turbo, report.timestamp);
        assert_eq!(outcome, Resolution::NoOp);
    }

    #[test]
    fn pressed_pad_target_contributes_its_bit() {
        let report = report_with(SourceButton::Cross, true);
        let mapping = ButtonMapping::pad(SourceButton::Cross, VirtualButton::A);
        let mut turbo = TurboArena::new();

        let outcome = resolve(&report, "p", &mapping, &mut turbo, report.timestamp);
        assert_eq!(outcome, Resolution::Bitmask(0x1000));
    }

    #[test]
    fn released_pad_target_is_absence_not_a_clear() {
        let report = report_with(SourceButton::Cross, false);
        let mapping = ButtonMapping::pad(SourceButton::Cross, VirtualButton::A);
        let mut turbo = TurboArena::new();

        let outcome = resolve(&report, "p", &mapping, &mut turbo, report.timestamp);
        assert_eq!(outcome, Resolution::NoOp);
    }

    #[test]
    fn key_target_mirrors_both_directions() {
        let mapping = ButtonMapping::key(SourceButton::Square, 0x41);
        let mut turbo = TurboArena::new();

        let down = report_with(SourceButton::Square, true);
        assert_eq!(
            resolve(&down, "p", &mapping, &mut turbo, down.timestamp),
            Resolution::Key {
                code: 0x41,
                pressed: true
            }
        );

        let up = report_with(SourceButton::Square, false);
        assert_eq!(
            resolve(&up, "p", &mapping, &mut turbo, up.timestamp),
            Resolution::Key {
                code: 0x41,
                pressed: false
            }
        );
    }

    #[test]
    fn turbo_gates_the_pad_target() {
        let mapping = ButtonMapping::pad(SourceButton::Cross, VirtualButton::A).with_turbo(
            TurboSetting {
                enabled: true,
                delay_ms: 0,
                interval_ms: 50,
                release_ms: 50,
            },
        );
        let mut turbo = TurboArena::new();

        let report = report_with(SourceButton::Cross, true);
        let start = report.timestamp;

        // Erste Phase gedrückt, zweite Phase unterdrückt
        assert_eq!(
            resolve(&report, "p", &mapping, &mut turbo, start),
            Resolution::Bitmask(0x1000)
        );
        assert_eq!(
            resolve(
                &report,
                "p",
                &mapping,
                &mut turbo,
                start + chrono::Duration::milliseconds(60)
            ),
            Resolution::NoOp
        );
    }
}
