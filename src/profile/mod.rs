//! Remapping-Profile und ihre Aktivierungsregeln
//!
//! Ein [`Profile`] ist ein benutzerdefiniertes Regelwerk: welche physischen
//! Buttons auf welche virtuellen Buttons oder Tastatur-Codes gemappt werden,
//! und für welche Pads das Profil überhaupt gilt. Die Engine liest Profile
//! ausschließlich als unveränderlichen Snapshot aus dem [`store`].

pub mod error;
pub mod matcher;
pub mod store;

pub use error::ProfileError;
pub use matcher::active_profiles;
pub use store::{ProfileSnapshot, ProfileStore};

use crate::report::{SourceButton, VirtualButton};
use serde::{Deserialize, Serialize};

/// Aktivierungsregel eines Profils
///
/// Entscheidet pro Report, ob das Profil angewendet wird. `Disabled` schlägt
/// nur für dieses Profil fehl, nie für die nachfolgenden.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPolicy {
    /// Gilt für jeden Report
    Global,
    /// Gilt, wenn die Geräteadresse übereinstimmt (Separatoren werden
    /// vor dem Vergleich entfernt)
    ByAddress(String),
    /// Gilt, wenn der Pad-Slot übereinstimmt
    ByPadSlot(u8),
    /// Gilt nie
    Disabled,
}

/// Ziel eines Button-Mappings
///
/// Entweder ein Bit des virtuellen Pads oder ein zu injizierender
/// Tastatur-Code. Die Auflösung passiert per Pattern Match im Resolver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MappingTarget {
    /// Virtueller Pad-Button (Bitmask-Beitrag)
    Pad(VirtualButton),
    /// Tastatur-Code für den Injection-Collaborator
    Key(u16),
}

/// Turbo-Einstellung eines einzelnen Button-Mappings
///
/// `interval_ms` gedrückt, `release_ms` losgelassen, nach `delay_ms`
/// Anlaufzeit. `interval_ms == 0` entspricht Durchreichen ohne Turbo.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurboSetting {
    pub enabled: bool,
    pub delay_ms: u32,
    pub interval_ms: u32,
    pub release_ms: u32,
}

impl Default for TurboSetting {
    fn default() -> Self {
        Self {
            enabled: false,
            delay_ms: 0,
            interval_ms: 50,
            release_ms: 50,
        }
    }
}

/// Zuordnung eines physischen Buttons zu seinem Mapping-Ziel
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ButtonMapping {
    pub source: SourceButton,
    pub target: MappingTarget,
    #[serde(default)]
    pub turbo: Option<TurboSetting>,
}

impl ButtonMapping {
    pub fn pad(source: SourceButton, target: VirtualButton) -> Self {
        Self {
            source,
            target: MappingTarget::Pad(target),
            turbo: None,
        }
    }

    pub fn key(source: SourceButton, code: u16) -> Self {
        Self {
            source,
            target: MappingTarget::Key(code),
            turbo: None,
        }
    }

    pub fn with_turbo(mut self, turbo: TurboSetting) -> Self {
        self.turbo = Some(turbo);
        self
    }
}

/// Per-Profil-Überschreibung der globalen Achsen-Einstellungen
///
/// Nur gesetzte Felder überschreiben; alles andere kommt weiterhin aus der
/// globalen [`crate::config::ShapingConfig`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ShapingOverride {
    #[serde(default)]
    pub dead_zone_left: Option<f32>,
    #[serde(default)]
    pub dead_zone_right: Option<f32>,
    #[serde(default)]
    pub invert_lx: Option<bool>,
    #[serde(default)]
    pub invert_ly: Option<bool>,
    #[serde(default)]
    pub invert_rx: Option<bool>,
    #[serde(default)]
    pub invert_ry: Option<bool>,
}

/// Ein benanntes Remapping-Regelwerk
///
/// Wird extern gepflegt (Editor/Store); die Engine liest nur. Die Reihenfolge
/// der `buttons`-Liste ist die Auswertungsreihenfolge im Resolver.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub is_active: bool,
    pub match_policy: MatchPolicy,
    #[serde(default)]
    pub buttons: Vec<ButtonMapping>,
    #[serde(default)]
    pub shaping: Option<ShapingOverride>,
}

impl Profile {
    /// Identity-Mapping DualShock → virtuelles Pad, global aktiv
    ///
    /// Wird installiert, wenn keine Profildatei existiert, damit ein frisch
    /// verbundenes Pad sofort benutzbar ist.
    pub fn default_profile() -> Self {
        let buttons = vec![
            ButtonMapping::pad(SourceButton::Cross, VirtualButton::A),
            ButtonMapping::pad(SourceButton::Circle, VirtualButton::B),
            ButtonMapping::pad(SourceButton::Square, VirtualButton::X),
            ButtonMapping::pad(SourceButton::Triangle, VirtualButton::Y),
            ButtonMapping::pad(SourceButton::Up, VirtualButton::DpadUp),
            ButtonMapping::pad(SourceButton::Down, VirtualButton::DpadDown),
            ButtonMapping::pad(SourceButton::Left, VirtualButton::DpadLeft),
            ButtonMapping::pad(SourceButton::Right, VirtualButton::DpadRight),
            ButtonMapping::pad(SourceButton::L1, VirtualButton::LeftShoulder),
            ButtonMapping::pad(SourceButton::R1, VirtualButton::RightShoulder),
            ButtonMapping::pad(SourceButton::L3, VirtualButton::LeftThumb),
            ButtonMapping::pad(SourceButton::R3, VirtualButton::RightThumb),
            ButtonMapping::pad(SourceButton::Select, VirtualButton::Back),
            ButtonMapping::pad(SourceButton::Start, VirtualButton::Start),
            ButtonMapping::pad(SourceButton::Ps, VirtualButton::Guide),
        ];

        Self {
            name: "Default".to_string(),
            is_active: true,
            match_policy: MatchPolicy::Global,
            buttons,
            shaping: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_is_globally_active() {
        let profile = Profile::default_profile();
        assert!(profile.is_active);
        assert_eq!(profile.match_policy, MatchPolicy::Global);
        assert!(profile
            .buttons
            .iter()
            .any(|m| m.source == SourceButton::Cross
                && m.target == MappingTarget::Pad(VirtualButton::A)));
    }

    #[test]
    fn profile_round_trips_through_toml() {
        let profile = Profile {
            name: "Turbo Cross".to_string(),
            is_active: true,
            match_policy: MatchPolicy::ByAddress("00:11:22:33:44:55".to_string()),
            buttons: vec![ButtonMapping::pad(SourceButton::Cross, VirtualButton::A)
                .with_turbo(TurboSetting {
                    enabled: true,
                    ..TurboSetting::default()
                })],
            shaping: None,
        };

        let serialized = toml::to_string(&profile).expect("profile serializes");
        let restored: Profile = toml::from_str(&serialized).expect("profile deserializes");
        assert_eq!(restored, profile);
    }
}
