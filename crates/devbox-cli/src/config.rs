use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const DEFAULT_LOG_LEVEL: &str = "warn";
const DEFAULT_SYNC_TIMEOUT_SECS: u64 = 600;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ProfileConfig {
    pub production_url: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub log_level: Option<String>,
    pub sync_timeout_secs: Option<u64>,
    pub setup_hook: Option<String>,
    pub destroy_hook: Option<String>,
}

impl ProfileConfig {
    pub const KEYS: [&'static str; 6] = [
        "production_url",
        "data_dir",
        "log_level",
        "sync_timeout_secs",
        "setup_hook",
        "destroy_hook",
    ];

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "production_url" => self.production_url = Some(value.to_string()),
            "data_dir" => self.data_dir = Some(PathBuf::from(value)),
            "log_level" => self.log_level = Some(value.to_string()),
            "sync_timeout_secs" => {
                let secs = value
                    .parse()
                    .with_context(|| format!("sync_timeout_secs must be a number, got {value:?}"))?;
                self.sync_timeout_secs = Some(secs);
            }
            "setup_hook" => self.setup_hook = Some(value.to_string()),
            "destroy_hook" => self.destroy_hook = Some(value.to_string()),
            other => anyhow::bail!(
                "Unknown config key: {other}. Valid keys: {}",
                Self::KEYS.join(", ")
            ),
        }
        Ok(())
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn sync_timeout(&self) -> Duration {
        Duration::from_secs(self.sync_timeout_secs.unwrap_or(DEFAULT_SYNC_TIMEOUT_SECS))
    }

    /// Where model records live: the configured directory or `<home>/db`.
    pub fn data_dir(&self, home: &Path) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| home.join("db"))
    }
}

pub type ConfigFile = HashMap<String, ProfileConfig>;

/// `~/.devbox`, or `DEVBOX_HOME` when set.
pub fn devbox_home() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os("DEVBOX_HOME") {
        return Ok(PathBuf::from(dir));
    }
    Ok(dirs::home_dir()
        .context("Cannot determine home directory")?
        .join(".devbox"))
}

fn config_path(home: &Path) -> PathBuf {
    home.join("config.toml")
}

pub fn load_all(home: &Path) -> Result<ConfigFile> {
    let path = config_path(home);
    if !path.exists() {
        return Ok(ConfigFile::new());
    }
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let cfg: ConfigFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(cfg)
}

pub fn load_profile(home: &Path, profile: &str) -> Result<ProfileConfig> {
    let mut all = load_all(home)?;
    Ok(all.remove(profile).unwrap_or_default())
}

pub fn save_profile(home: &Path, profile: &str, config: &ProfileConfig) -> Result<()> {
    let mut all = load_all(home)?;
    all.insert(profile.to_string(), config.clone());
    fs::create_dir_all(home)?;
    let content = toml::to_string_pretty(&all)?;
    fs::write(config_path(home), content)?;
    Ok(())
}

pub fn resolve_url(home: &Path, cli_url: Option<&str>, profile: &str) -> Result<String> {
    // 1. --url flag / DEVBOX_URL env
    if let Some(url) = cli_url {
        return Ok(url.to_string());
    }
    // 2. config.toml profile
    if let Some(url) = load_profile(home, profile)?.production_url {
        return Ok(url);
    }
    // 3. Stored credentials for this profile
    if let Ok(Some(creds)) = crate::auth::load_credentials(home, profile) {
        return Ok(creds.server);
    }
    anyhow::bail!(
        "No control plane URL configured. Use --url, set DEVBOX_URL, or run: devbox config set production_url <url>"
    )
}
