//! Configuration management for the alarm host.
//!
//! The host reads a TOML file once at startup. A missing file is created with
//! defaults so a fresh install starts without any setup.

use host_event_system::PlayerId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

fn default_save_interval() -> u64 {
    300
}

fn default_language() -> String {
    "en".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub logging: LoggingSettings,
    /// Server pairing metadata attached to every push notification
    #[serde(default)]
    pub pairing: BTreeMap<String, String>,
    /// Granted permissions, keyed by player id
    #[serde(default)]
    pub permissions: BTreeMap<String, Vec<String>>,
    /// Preferred message language, keyed by player id
    #[serde(default)]
    pub languages: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Name reported to the companion app when no pairing name is set
    pub server_name: String,
    /// Edge length of the square map in world units
    pub world_size: u32,
    /// Seconds between `server_save` events (0 disables periodic saves)
    #[serde(default = "default_save_interval")]
    pub save_interval_secs: u64,
    #[serde(default = "default_language")]
    pub default_language: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Root for the `data/` and `config/` object stores
    pub data_dir: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level filter (trace, debug, info, warn, error)
    pub level: String,
    pub json_format: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                server_name: "Raid Alarm Server".to_string(),
                world_size: 3000,
                save_interval_secs: default_save_interval(),
                default_language: default_language(),
            },
            storage: StorageSettings {
                data_dir: "data".to_string(),
            },
            logging: LoggingSettings {
                level: "info".to_string(),
                json_format: false,
            },
            pairing: BTreeMap::new(),
            permissions: BTreeMap::new(),
            languages: BTreeMap::new(),
        }
    }
}

impl AppConfig {
    /// Loads the config, writing a default file first if none exists.
    pub async fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = tokio::fs::read_to_string(path).await?;
            let config: AppConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            let default_config = AppConfig::default();
            let toml_content = toml::to_string_pretty(&default_config)?;
            tokio::fs::write(path, toml_content).await?;
            info!("Created default configuration file: {}", path.display());
            Ok(default_config)
        }
    }

    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.storage.data_dir)
    }

    /// Permission grants with their player ids parsed.
    pub fn permission_grants(&self) -> Result<Vec<(PlayerId, String)>, String> {
        let mut grants = Vec::new();
        for (player, permissions) in &self.permissions {
            let id = parse_player(player)?;
            grants.extend(permissions.iter().map(|p| (id, p.clone())));
        }
        Ok(grants)
    }

    pub fn player_languages(&self) -> Result<Vec<(PlayerId, String)>, String> {
        self.languages
            .iter()
            .map(|(player, language)| Ok((parse_player(player)?, language.clone())))
            .collect()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.server.world_size == 0 {
            return Err("World size must be greater than zero".to_string());
        }

        if self.server.server_name.trim().is_empty() {
            return Err("Server name cannot be empty".to_string());
        }

        if self.server.default_language.trim().is_empty() {
            return Err("Default language cannot be empty".to_string());
        }

        if self.storage.data_dir.is_empty() {
            return Err("Data directory cannot be empty".to_string());
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(format!(
                "Invalid log level: {}. Must be one of: {valid_levels:?}",
                &self.logging.level
            ));
        }

        self.permission_grants()?;
        self.player_languages()?;

        Ok(())
    }
}

fn parse_player(raw: &str) -> Result<PlayerId, String> {
    raw.parse()
        .map_err(|_| format!("Invalid player id in config: {}", raw))
}
