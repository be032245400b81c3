//! Global axis-shaping configuration
//!
//! The engine receives this as an explicit value at construction time; there
//! is no process-wide singleton. Reloading swaps the whole value, profiles
//! layer their [`ShapingOverride`](crate::profile::ShapingOverride) on top
//! per report.

use crate::profile::ShapingOverride;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Dead-zone radii and inversion flags for both sticks
///
/// # Performance Impact
///
/// - `dead_zone_left` / `dead_zone_right`: radius in raw deflection units
///   (0..=180). Too low lets worn sticks drift, too high swallows precise
///   aiming. Typical pads want 8-15.
/// - invert flags: applied after scaling; `invert_ly`/`invert_ry` default to
///   true because DualShock reports Y down while the virtual pad expects
///   Y up.
///
/// # Examples
///
/// ```rust
/// use padbridge::config::ShapingConfig;
///
/// // Worn pad with noticeable stick drift
/// let worn = ShapingConfig {
///     dead_zone_left: 18.0,
///     dead_zone_right: 18.0,
///     ..ShapingConfig::default()
/// };
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShapingConfig {
    /// Dead-zone radius of the left stick in raw deflection units
    pub dead_zone_left: f32,

    /// Dead-zone radius of the right stick in raw deflection units
    pub dead_zone_right: f32,

    pub invert_lx: bool,
    pub invert_ly: bool,
    pub invert_rx: bool,
    pub invert_ry: bool,
}

impl Default for ShapingConfig {
    fn default() -> Self {
        Self {
            dead_zone_left: 10.0,
            dead_zone_right: 10.0,
            invert_lx: false,
            invert_ly: true, // DS meldet Y nach unten, virtuelles Pad erwartet Y nach oben
            invert_rx: false,
            invert_ry: true,
        }
    }
}

impl ShapingConfig {
    /// Applies a profile's partial override on top of this configuration
    pub fn with_override(&self, layer: &ShapingOverride) -> Self {
        Self {
            dead_zone_left: layer.dead_zone_left.unwrap_or(self.dead_zone_left),
            dead_zone_right: layer.dead_zone_right.unwrap_or(self.dead_zone_right),
            invert_lx: layer.invert_lx.unwrap_or(self.invert_lx),
            invert_ly: layer.invert_ly.unwrap_or(self.invert_ly),
            invert_rx: layer.invert_rx.unwrap_or(self.invert_rx),
            invert_ry: layer.invert_ry.unwrap_or(self.invert_ry),
        }
    }

    /// Loads the configuration from a TOML file, degrading to defaults
    ///
    /// Missing or unreadable files are not fatal; the engine has to stay
    /// usable with whatever configuration survives.
    pub fn load_or_default(path: &Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(_) => {
                info!(
                    "No shaping config at {}, using defaults",
                    path.display()
                );
                return Self::default();
            }
        };

        match toml::from_str(&raw) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Shaping config {} is not valid TOML ({}), using defaults",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }
}
