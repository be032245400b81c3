//! Shared, read-mostly home of the loaded profile list
//!
//! The engine tasks read profiles far more often than anyone writes them, so
//! the store hands out `Arc` snapshots behind a `tokio::sync::RwLock`: readers
//! clone the Arc and never observe a partially-updated list, writers swap the
//! whole snapshot at once. Each swap bumps a generation counter so per-pad
//! state (turbo timers) can notice a reload and drop stale entries.
//!
//! Loading follows the fail-safe approach of the rest of the configuration
//! handling: a missing file is created with the default profile, a corrupted
//! file degrades to the default profile with a warning instead of taking the
//! engine down.

use crate::profile::{Profile, ProfileError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Immutable view of the loaded profiles plus its reload generation
#[derive(Clone, Debug, Default)]
pub struct ProfileSnapshot {
    pub generation: u64,
    pub profiles: Vec<Profile>,
}

/// On-disk shape of a profile file
#[derive(Serialize, Deserialize, Default)]
struct ProfileFile {
    #[serde(default)]
    profiles: Vec<Profile>,
}

/// Thread-safe snapshot store for remapping profiles
///
/// Created once at startup, shared via `Arc` with every engine task. The
/// engine never mutates profiles; `replace` is for the external editor side.
#[derive(Debug)]
pub struct ProfileStore {
    inner: RwLock<Arc<ProfileSnapshot>>,
}

impl ProfileStore {
    /// Creates a store holding the given profiles as generation 1
    pub fn new(profiles: Vec<Profile>) -> Self {
        Self {
            inner: RwLock::new(Arc::new(ProfileSnapshot {
                generation: 1,
                profiles,
            })),
        }
    }

    /// Current snapshot; cheap Arc clone, never blocks writers out
    pub async fn snapshot(&self) -> Arc<ProfileSnapshot> {
        self.inner.read().await.clone()
    }

    /// Atomically swaps in a new profile list and bumps the generation
    pub async fn replace(&self, profiles: Vec<Profile>) -> u64 {
        let mut guard = self.inner.write().await;
        let generation = guard.generation + 1;
        *guard = Arc::new(ProfileSnapshot {
            generation,
            profiles,
        });
        info!("Profile snapshot replaced, generation {}", generation);
        generation
    }

    /// Default location of the profile file
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("padbridge")
            .join("profiles.toml")
    }

    /// Loads the store from a TOML file, creating it with the default
    /// profile on first run
    ///
    /// A file that exists but does not parse degrades to the default profile
    /// so a typo in the editor cannot keep a pad from working.
    pub async fn load_or_default(path: &Path) -> Result<Self, ProfileError> {
        if !path.exists() {
            Self::write_default(path).await?;
        }

        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ProfileError::FileError(format!("{}: {}", path.display(), e)))?;

        let profiles = match toml::from_str::<ProfileFile>(&raw) {
            Ok(file) if !file.profiles.is_empty() => file.profiles,
            Ok(_) => {
                info!("Profile file {} is empty, using default", path.display());
                vec![Profile::default_profile()]
            }
            Err(e) => {
                warn!(
                    "Profile file {} is not valid TOML ({}), falling back to default",
                    path.display(),
                    e
                );
                vec![Profile::default_profile()]
            }
        };

        info!("Loaded {} profile(s) from {}", profiles.len(), path.display());
        Ok(Self::new(profiles))
    }

    /// Writes a fresh profile file containing only the default profile
    async fn write_default(path: &Path) -> Result<(), ProfileError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ProfileError::FileError(format!("{}: {}", parent.display(), e)))?;
        }

        let file = ProfileFile {
            profiles: vec![Profile::default_profile()],
        };
        let serialized =
            toml::to_string_pretty(&file).map_err(|e| ProfileError::ParseError(e.to_string()))?;

        tokio::fs::write(path, serialized)
            .await
            .map_err(|e| ProfileError::FileError(format!("{}: {}", path.display(), e)))?;

        info!("Created default profile file at {}", path.display());
        Ok(())
    }
}
