// Client settings, loaded from the embedded default JSON, a user file and the environment
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{GuardianError, Result};

pub const ENV_BASE_URL: &str = "STOCK_GUARDIAN_BASE_URL";
pub const ENV_DATA_DIR: &str = "STOCK_GUARDIAN_DATA_DIR";

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ClientSettings {
    pub base_url: String,
    pub request_timeout_secs: u64,
    /// Directory holding the token file. Relative paths resolve against the working directory.
    pub data_dir: PathBuf,
    pub token_file: String,
    /// Optional `code,name` CSV merged over the built-in reference table.
    pub reference_table_path: Option<PathBuf>,
    pub suggestion_limit: usize,
    /// Full casing enumeration is only attempted up to this many ASCII letters.
    pub max_enumerated_letters: u32,
    /// `{domain}` is replaced with each candidate logo domain.
    pub logo_url_template: String,
    pub log_level: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        ClientSettings {
            base_url: "https://backend-production-eb97.up.railway.app".to_string(),
            request_timeout_secs: 30,
            data_dir: PathBuf::from(".stock-guardian"),
            token_file: "userToken".to_string(),
            reference_table_path: None,
            suggestion_limit: 30,
            max_enumerated_letters: 8,
            logo_url_template: "https://logo.clearbit.com/{domain}".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl ClientSettings {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: ClientSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Overlays the keys present in a JSON file on top of `self`.
    pub fn merge_file(self, path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let overlay: serde_json::Value = serde_json::from_str(&raw)?;
        let mut base = serde_json::to_value(&self)?;
        match (&mut base, overlay) {
            (serde_json::Value::Object(base_map), serde_json::Value::Object(overlay_map)) => {
                base_map.extend(overlay_map);
            }
            _ => {
                return Err(GuardianError::Config(format!(
                    "'{}' must contain a JSON object",
                    path.display()
                )))
            }
        }
        let merged: ClientSettings = serde_json::from_value(base)?;
        merged.validate()?;
        Ok(merged)
    }

    pub fn apply_env(mut self) -> Self {
        if let Ok(url) = std::env::var(ENV_BASE_URL) {
            if !url.trim().is_empty() {
                self.base_url = url.trim().to_string();
            }
        }
        if let Ok(dir) = std::env::var(ENV_DATA_DIR) {
            if !dir.trim().is_empty() {
                self.data_dir = PathBuf::from(dir.trim());
            }
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(GuardianError::Config(format!(
                "base_url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }
        if self.token_file.trim().is_empty() {
            return Err(GuardianError::Config("token_file must not be empty".to_string()));
        }
        if self.max_enumerated_letters > 20 {
            return Err(GuardianError::Config(format!(
                "max_enumerated_letters {} would allow over a million requests per add",
                self.max_enumerated_letters
            )));
        }
        if !self.logo_url_template.contains("{domain}") {
            return Err(GuardianError::Config(
                "logo_url_template must contain '{domain}'".to_string(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn token_path(&self) -> PathBuf {
        self.data_dir.join(&self.token_file)
    }
}
