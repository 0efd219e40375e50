use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::PathBuf,
    sync::{PoisonError, RwLock},
};

use crate::detection::{DebounceGate, ReelMarker, DEFAULT_DEBOUNCE_MS, DEFAULT_REEL_MARKER};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DetectorSettings {
    pub debounce_ms: i64,
    pub reel_marker: String,
}

impl Default for DetectorSettings {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            reel_marker: DEFAULT_REEL_MARKER.into(),
        }
    }
}

impl DetectorSettings {
    pub fn validate(&self) -> Result<()> {
        if self.debounce_ms <= 0 {
            bail!("debounce window must be positive, got {}ms", self.debounce_ms);
        }
        if self.reel_marker.trim().is_empty() {
            bail!("reel marker must not be blank");
        }
        Ok(())
    }

    pub fn debounce_gate(&self) -> DebounceGate {
        DebounceGate::new(self.debounce_ms)
    }

    pub fn reel_marker(&self) -> ReelMarker {
        ReelMarker::new(&self.reel_marker)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct UserSettings {
    detector: DetectorSettings,
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            let mut parsed: UserSettings = serde_json::from_str(&contents).unwrap_or_else(|err| {
                log::warn!(
                    "Ignoring unreadable settings at {}: {err}",
                    path.display()
                );
                UserSettings::default()
            });
            if let Err(err) = parsed.detector.validate() {
                log::warn!(
                    "Ignoring invalid detector settings at {}: {err}",
                    path.display()
                );
                parsed.detector = DetectorSettings::default();
            }
            parsed
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn detector(&self) -> DetectorSettings {
        self.data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .detector
            .clone()
    }

    /// Takes effect for trackers loaded after the update.
    pub fn update_detector(&self, settings: DetectorSettings) -> Result<()> {
        settings.validate()?;
        let mut guard = self.data.write().unwrap_or_else(PoisonError::into_inner);
        guard.detector = settings;
        self.persist(&guard)
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().expect("tempdir");
        let store = SettingsStore::new(dir.path().join("settings.json")).expect("store");
        assert_eq!(store.detector(), DetectorSettings::default());
        assert_eq!(store.detector().debounce_gate().window_ms(), 3_000);
    }

    #[test]
    fn updates_survive_reload() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("settings.json");
        let store = SettingsStore::new(path.clone()).expect("store");
        store
            .update_detector(DetectorSettings {
                debounce_ms: 5_000,
                reel_marker: "Clips".into(),
            })
            .expect("update");

        let reloaded = SettingsStore::new(path).expect("reload");
        assert_eq!(reloaded.detector().debounce_ms, 5_000);
        assert!(reloaded.detector().reel_marker().is_present("short CLIPS"));
    }

    #[test]
    fn invalid_updates_are_rejected() {
        let dir = TempDir::new().expect("tempdir");
        let store = SettingsStore::new(dir.path().join("settings.json")).expect("store");
        assert!(store
            .update_detector(DetectorSettings {
                debounce_ms: 0,
                ..DetectorSettings::default()
            })
            .is_err());
        assert!(store
            .update_detector(DetectorSettings {
                reel_marker: "  ".into(),
                ..DetectorSettings::default()
            })
            .is_err());
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").expect("write");
        let store = SettingsStore::new(path).expect("store");
        assert_eq!(store.detector(), DetectorSettings::default());
    }

    #[test]
    fn out_of_range_values_fall_back_to_defaults() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("settings.json");
        for contents in [
            r#"{"detector":{"debounceMs":0}}"#,
            r#"{"detector":{"debounceMs":-250}}"#,
            r#"{"detector":{"reelMarker":"   "}}"#,
        ] {
            fs::write(&path, contents).expect("write");
            let store = SettingsStore::new(path.clone()).expect("store");
            assert_eq!(store.detector(), DetectorSettings::default(), "{contents}");
        }
    }
}
