// SettingsManager Service
// Handles engine settings persistence

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde_json::Value;

use crate::models::SyncSettings;

/// Manages settings storage and retrieval
pub struct SettingsManager {
    settings_path: PathBuf,
    cache: RwLock<Option<SyncSettings>>,
}

impl SettingsManager {
    /// Create a new SettingsManager with the given app data directory
    pub fn new(app_data_dir: &Path) -> Self {
        Self {
            settings_path: app_data_dir.join("settings.json"),
            cache: RwLock::new(None),
        }
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    /// Load settings from disk, or return defaults if not found
    pub fn load(&self) -> Result<SyncSettings, String> {
        if let Ok(cache) = self.cache.read() {
            if let Some(ref settings) = *cache {
                return Ok(settings.clone());
            }
        }

        let settings = if self.settings_path.exists() {
            let content = std::fs::read_to_string(&self.settings_path)
                .map_err(|e| format!("Failed to read settings: {e}"))?;

            let mut user_value: Value = serde_json::from_str(&content)
                .map_err(|e| format!("Failed to parse settings: {e}"))?;

            let defaults_value = serde_json::to_value(SyncSettings::default())
                .map_err(|e| format!("Failed to build default settings: {e}"))?;
            let changed = merge_missing_settings(&mut user_value, &defaults_value);

            let settings: SyncSettings = serde_json::from_value(user_value)
                .map_err(|e| format!("Failed to parse settings: {e}"))?;

            if changed {
                log::info!("Added missing settings fields to {:?}", self.settings_path);
                self.save_internal(&settings)?;
            }

            settings
        } else {
            let defaults = SyncSettings::default();
            self.save_internal(&defaults)?;
            defaults
        };

        if let Ok(mut cache) = self.cache.write() {
            *cache = Some(settings.clone());
        }

        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, settings: &SyncSettings) -> Result<(), String> {
        self.save_internal(settings)?;

        if let Ok(mut cache) = self.cache.write() {
            *cache = Some(settings.clone());
        }

        Ok(())
    }

    fn save_internal(&self, settings: &SyncSettings) -> Result<(), String> {
        if let Some(parent) = self.settings_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create settings directory: {e}"))?;
        }

        let content = serde_json::to_string_pretty(settings)
            .map_err(|e| format!("Failed to serialize settings: {e}"))?;

        std::fs::write(&self.settings_path, content)
            .map_err(|e| format!("Failed to write settings: {e}"))
    }
}

fn merge_missing_settings(target: &mut Value, defaults: &Value) -> bool {
    match (target, defaults) {
        (Value::Object(target_map), Value::Object(defaults_map)) => {
            let mut changed = false;
            for (key, default_value) in defaults_map {
                match target_map.get_mut(key) {
                    Some(target_value) => {
                        if merge_missing_settings(target_value, default_value) {
                            changed = true;
                        }
                    }
                    None => {
                        target_map.insert(key.clone(), default_value.clone());
                        changed = true;
                    }
                }
            }
            changed
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OverwritePolicy;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_writes_defaults() {
        let temp = tempdir().unwrap();
        let manager = SettingsManager::new(temp.path());

        let settings = manager.load().unwrap();
        assert_eq!(settings, SyncSettings::default());
        assert!(manager.settings_path().exists());
    }

    #[test]
    fn test_missing_fields_are_merged_and_written_back() {
        let temp = tempdir().unwrap();
        std::fs::write(
            temp.path().join("settings.json"),
            r#"{ "orgApiUrl": "https://erp.example.com", "overwritePolicy": "reject" }"#,
        )
        .unwrap();

        let settings = SettingsManager::new(temp.path()).load().unwrap();
        assert_eq!(settings.org_api_url, "https://erp.example.com");
        assert_eq!(settings.overwrite_policy, OverwritePolicy::Reject);
        assert_eq!(settings.log_level, "info");

        let written = std::fs::read_to_string(temp.path().join("settings.json")).unwrap();
        assert!(written.contains("logLevel"));
    }

    #[test]
    fn test_save_updates_cache() {
        let temp = tempdir().unwrap();
        let manager = SettingsManager::new(temp.path());
        let mut settings = manager.load().unwrap();
        settings.api_token = "secret".to_string();
        manager.save(&settings).unwrap();

        assert_eq!(manager.load().unwrap().bearer_token(), Some("secret"));
        assert_eq!(SettingsManager::new(temp.path()).load().unwrap(), settings);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let temp = tempdir().unwrap();
        std::fs::write(temp.path().join("settings.json"), "not json").unwrap();
        let error = SettingsManager::new(temp.path()).load().unwrap_err();
        assert!(error.contains("Failed to parse settings"));
    }
}
