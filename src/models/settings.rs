// Settings Model
// Engine configuration

use serde::{Deserialize, Serialize};

fn default_org_api_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_api_token() -> String {
    String::new()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// What add/rename do when the target name is already listed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverwritePolicy {
    /// Replace the existing custom record silently
    #[default]
    Overwrite,
    /// Leave everything untouched and report failure
    Reject,
}

/// Engine settings, stored as `settings.json` in the data directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSettings {
    /// Base URL of the organization REST API
    #[serde(default = "default_org_api_url")]
    pub org_api_url: String,

    /// Bearer token sent with organization requests (empty = none)
    #[serde(default = "default_api_token")]
    pub api_token: String,

    #[serde(default)]
    pub overwrite_policy: OverwritePolicy,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            org_api_url: default_org_api_url(),
            api_token: default_api_token(),
            overwrite_policy: OverwritePolicy::default(),
            log_level: default_log_level(),
        }
    }
}

impl SyncSettings {
    pub fn log_level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }

    /// Token to send, if one is configured
    pub fn bearer_token(&self) -> Option<&str> {
        let trimmed = self.api_token.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }
}
