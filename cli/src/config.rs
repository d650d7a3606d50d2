// CLI configuration: embedded defaults, optional user file, environment overrides
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use engine::config::ClientSettings;

const DEFAULT_CONFIG: &str = include_str!("../assets/config/default.json");

pub struct AppConfig {
    pub settings: ClientSettings,
}

impl AppConfig {
    /// Settings bundled with the binary.
    pub fn load_default() -> Result<Self> {
        let settings = ClientSettings::from_json_str(DEFAULT_CONFIG).context("embedded default.json is invalid")?;
        Ok(AppConfig { settings })
    }

    /// Defaults, then the user file if given, then `STOCK_GUARDIAN_*` variables.
    pub fn load(user_file: Option<&Path>) -> Result<Self> {
        let mut settings = Self::load_default()?.settings;
        if let Some(path) = user_file {
            settings = settings
                .merge_file(path)
                .with_context(|| format!("failed to load config file {}", path.display()))?;
            tracing::debug!(path = %path.display(), "Applied user configuration");
        }
        let settings = settings.apply_env();
        settings.validate().context("invalid configuration after environment overrides")?;
        Ok(AppConfig { settings })
    }

    pub fn watchlist_path(&self) -> PathBuf {
        self.settings.data_dir.join("watchlist.json")
    }
}
