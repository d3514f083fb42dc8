//! Profile persistence — the only state that crosses sessions.
//!
//! One serialized record at a fixed storage key. Corrupt or unreadable data
//! falls back to the default empty profile; it never fails startup and never
//! surfaces to the user as an error.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::profile::UserProfile;

/// Fixed storage key for the persisted profile record.
pub const PROFILE_STORAGE_KEY: &str = "career_os_profile.json";

#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        ProfileStore {
            path: data_dir.into().join(PROFILE_STORAGE_KEY),
        }
    }

    /// Loads the persisted profile, substituting the default for anything
    /// missing or unreadable.
    pub fn load(&self) -> UserProfile {
        match fs::read_to_string(&self.path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(profile) => profile,
                Err(e) => {
                    warn!("Persisted profile is corrupt, using default: {e}");
                    UserProfile::default()
                }
            },
            Err(_) => UserProfile::default(),
        }
    }

    pub fn save(&self, profile: &UserProfile) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating profile dir {}", parent.display()))?;
        }
        let raw = serde_json::to_string_pretty(profile)
            .context("serializing profile")?;
        fs::write(&self.path, raw)
            .with_context(|| format!("writing profile to {}", self.path.display()))?;
        Ok(())
    }

    /// Sign-out: drop the persisted record entirely.
    pub fn clear(&self) -> Result<(), AppError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!("Persisted profile cleared");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Internal(
                anyhow::Error::new(e).context("clearing persisted profile"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_round_trips_a_profile() {
        let dir = TempDir::new().unwrap();
        let store = ProfileStore::new(dir.path());

        let mut profile = UserProfile::default();
        profile.name = "Ada Lovelace".into();
        profile.is_authenticated = true;
        store.save(&profile).unwrap();

        let loaded = store.load();
        assert_eq!(loaded.name, "Ada Lovelace");
        assert!(loaded.is_authenticated);
    }

    #[test]
    fn test_missing_file_loads_default() {
        let dir = TempDir::new().unwrap();
        let store = ProfileStore::new(dir.path());
        let profile = store.load();
        assert!(profile.name.is_empty());
        assert!(!profile.is_authenticated);
    }

    #[test]
    fn test_corrupt_file_falls_back_to_default() {
        let dir = TempDir::new().unwrap();
        let store = ProfileStore::new(dir.path());
        fs::write(dir.path().join(PROFILE_STORAGE_KEY), "{not json").unwrap();

        let profile = store.load();
        assert!(profile.name.is_empty());
    }

    #[test]
    fn test_clear_removes_record_and_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = ProfileStore::new(dir.path());
        store.save(&UserProfile::default()).unwrap();

        store.clear().unwrap();
        store.clear().unwrap();
        assert!(!dir.path().join(PROFILE_STORAGE_KEY).exists());
    }
}
