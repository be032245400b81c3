//! Profile applicability per incoming report
//!
//! Walks the stored profile order and yields every profile whose match
//! policy is satisfied by the report's identity. Evaluation is lazy and
//! recomputed per report, since activation flags and the report identity can
//! change between calls. A profile that does not match never cuts the walk
//! short for the profiles behind it.

use crate::profile::{MatchPolicy, Profile};
use crate::report::InputReport;
use tracing::warn;

/// Yields the profiles that apply to this report, in stored order
pub fn active_profiles<'a>(
    report: &'a InputReport,
    profiles: &'a [Profile],
) -> impl Iterator<Item = &'a Profile> {
    profiles
        .iter()
        .filter(move |profile| profile.is_active && policy_matches(profile, report))
}

/// Checks a single profile's policy against the report identity
fn policy_matches(profile: &Profile, report: &InputReport) -> bool {
    match &profile.match_policy {
        MatchPolicy::Global => true,
        MatchPolicy::ByAddress(address) => {
            if address.is_empty() {
                // Konfigurationsfehler: Policy verlangt eine Adresse
                warn!(
                    "Profile '{}' has a ByAddress policy without an address, treating as inactive",
                    profile.name
                );
                return false;
            }
            normalized_address(address) == normalized_address(report.address.as_str())
        }
        MatchPolicy::ByPadSlot(slot) => *slot == report.pad_slot,
        MatchPolicy::Disabled => false,
    }
}

/// Strips the usual MAC separators and folds hex case for comparison
fn normalized_address(raw: &str) -> String {
    raw.chars()
        .filter(|c| *c != ':' && *c != '-')
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::MatchPolicy;
    use crate::report::PadAddress;
    use chrono::Local;

    fn report_for(slot: u8, address: &str) -> InputReport {
        InputReport::new(slot, PadAddress::new(address), Local::now())
    }

    fn profile_with(policy: MatchPolicy, active: bool) -> Profile {
        Profile {
            name: "test".to_string(),
            is_active: active,
            match_policy: policy,
            buttons: Vec::new(),
            shaping: None,
        }
    }

    #[test]
    fn global_profile_is_always_selected_when_active() {
        let report = report_for(0, "00:11:22:33:44:55");
        let profiles = vec![profile_with(MatchPolicy::Global, true)];
        assert_eq!(active_profiles(&report, &profiles).count(), 1);
    }

    #[test]
    fn inactive_global_profile_is_never_selected() {
        let report = report_for(0, "00:11:22:33:44:55");
        let profiles = vec![profile_with(MatchPolicy::Global, false)];
        assert_eq!(active_profiles(&report, &profiles).count(), 0);
    }

    #[test]
    fn disabled_policy_never_matches_but_does_not_stop_the_walk() {
        let report = report_for(1, "00:11:22:33:44:55");
        let profiles = vec![
            profile_with(MatchPolicy::Disabled, true),
            profile_with(MatchPolicy::Global, true),
            profile_with(MatchPolicy::ByPadSlot(1), true),
        ];

        let selected: Vec<_> = active_profiles(&report, &profiles).collect();
        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn pad_slot_policy_requires_exact_equality() {
        let report = report_for(2, "");
        let profiles = vec![
            profile_with(MatchPolicy::ByPadSlot(1), true),
            profile_with(MatchPolicy::ByPadSlot(2), true),
        ];

        let selected: Vec<_> = active_profiles(&report, &profiles).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].match_policy, MatchPolicy::ByPadSlot(2));
    }

    #[test]
    fn address_matching_ignores_separators_and_case() {
        let report = report_for(0, "aa:bb:cc:dd:ee:ff");
        let profiles = vec![profile_with(
            MatchPolicy::ByAddress("AA-BB-CC-DD-EE-FF".to_string()),
            true,
        )];
        assert_eq!(active_profiles(&report, &profiles).count(), 1);
    }

    #[test]
    fn empty_address_parameter_is_a_config_fault_not_a_match() {
        let report = report_for(0, "");
        let profiles = vec![profile_with(MatchPolicy::ByAddress(String::new()), true)];
        assert_eq!(active_profiles(&report, &profiles).count(), 0);
    }
}
