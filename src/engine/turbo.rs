//! Turbo modulation for held buttons
//!
//! Converts a sustained hold into a pulsed press/release signal at the rate
//! the mapping configures. Phase state lives in an arena keyed by
//! (profile name, source button), owned by the frame assembler, so several
//! profiles can turbo the same physical button without interfering and a
//! profile reload can drop its entries wholesale.

use crate::profile::TurboSetting;
use crate::report::SourceButton;
use chrono::{DateTime, Local};
use std::collections::HashMap;

/// Phase record of one turboed (profile, button) pair
///
/// Created lazily on first use; the phase wraps, so no periodic reset is
/// needed. Releasing the button clears the record, which makes the next
/// press start from "pressed".
#[derive(Clone, Copy, Debug, Default)]
pub struct TurboState {
    held_since: Option<DateTime<Local>>,
}

impl TurboState {
    /// Advances the phase for one report and returns the effective state
    fn advance(&mut self, held: bool, setting: &TurboSetting, now: DateTime<Local>) -> bool {
        if !held {
            self.held_since = None;
            return false;
        }

        let held_since = *self.held_since.get_or_insert(now);
        let elapsed_ms = (now - held_since).num_milliseconds().max(0) as u64;

        let delay = setting.delay_ms as u64;
        if elapsed_ms < delay {
            // Anlaufphase: Button bleibt durchgedrückt
            return true;
        }

        let period = (setting.interval_ms + setting.release_ms) as u64;
        if period == 0 {
            return true;
        }

        let phase = (elapsed_ms - delay) % period;
        phase < setting.interval_ms as u64
    }
}

/// Arena of all turbo states, keyed per (profile, source button)
#[derive(Debug, Default)]
pub struct TurboArena {
    states: HashMap<(String, SourceButton), TurboState>,
}

impl TurboArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs a button's raw state through its mapping's turbo setting
    ///
    /// Without turbo (or with an interval of 0) the raw state passes through
    /// untouched and no arena entry is created.
    pub fn apply(
        &mut self,
        profile: &str,
        button: SourceButton,
        held: bool,
        setting: Option<&TurboSetting>,
        now: DateTime<Local>,
    ) -> bool {
        let setting = match setting {
            Some(s) if s.enabled && s.interval_ms > 0 => s,
            _ => return held,
        };

        self.states
            .entry((profile.to_string(), button))
            .or_default()
            .advance(held, setting, now)
    }

    /// Drops every state owned by a profile that is no longer loaded
    pub fn retain_profiles<'a>(&mut self, loaded: impl Iterator<Item = &'a str>) {
        let loaded: std::collections::HashSet<&str> = loaded.collect();
        self.states
            .retain(|(profile, _), _| loaded.contains(profile.as_str()));
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.states.len()
    }
}
