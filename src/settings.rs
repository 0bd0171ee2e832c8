//! Demo settings with persistence
//!
//! Settings are saved to `~/.config/skirmish/settings.toml`

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// All demo settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub logging: LoggingSettings,
    pub combat: CombatSettings,
    pub arena: ArenaSettings,
}

impl Settings {
    /// Get the config directory path
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("skirmish"))
    }

    /// Get the settings file path
    fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.toml"))
    }

    /// Load settings from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            warn!("Could not determine config directory");
            return Self::default();
        };

        if !path.exists() {
            info!("No settings file found, using defaults");
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(settings) => {
                    info!("Loaded settings from {:?}", path);
                    settings
                }
                Err(e) => {
                    warn!("Failed to parse settings: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read settings file: {}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Save settings to disk
    pub fn save(&self) -> anyhow::Result<()> {
        let Some(dir) = Self::config_dir() else {
            anyhow::bail!("Could not determine config directory");
        };

        let path = dir.join("settings.toml");
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        info!("Saved settings to {:?}", path);
        Ok(())
    }

    /// Combat configuration file: the configured one, else `combat.toml`
    /// next to the settings
    pub fn combat_config_path(&self) -> Option<PathBuf> {
        self.combat
            .config
            .clone()
            .or_else(|| Self::config_dir().map(|p| p.join("combat.toml")))
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter directive, e.g. `info` or `skirmish_combat=debug`
    pub filter: String,
    /// Show the module path of each event
    pub targets: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            targets: false,
        }
    }
}

/// Combat engine settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatSettings {
    /// Path of the combat configuration (interaction rules, indicators)
    pub config: Option<PathBuf>,
}

/// Scripted skirmish settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaSettings {
    /// Number of ticks simulated
    pub ticks: u64,
    /// Wolves the knight fights
    pub wolves: u32,
    /// Seed for reproducible runs
    pub seed: Option<u64>,
}

impl Default for ArenaSettings {
    fn default() -> Self {
        Self {
            ticks: 200,
            wolves: 3,
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_use_defaults() {
        let settings: Settings = toml::from_str("[arena]\nwolves = 5\n").unwrap();
        assert_eq!(settings.arena.wolves, 5);
        assert_eq!(settings.arena.ticks, 200);
        assert_eq!(settings.logging.filter, "info");
        assert!(settings.combat.config.is_none());
    }

    #[test]
    fn test_settings_roundtrip() {
        let mut settings = Settings::default();
        settings.arena.seed = Some(7);
        let content = toml::to_string_pretty(&settings).unwrap();
        let parsed: Settings = toml::from_str(&content).unwrap();
        assert_eq!(parsed.arena.seed, Some(7));
    }
}
