//! Configuration access by dotted path
//!
//! The engine only ever reads booleans with a default. Problems with the
//! configuration are logged and the default is used.

use std::fs;
use std::path::Path;

use tracing::{info, warn};

/// Read-only configuration source
pub trait ConfigAdapter: Send + Sync {
    /// Boolean at a dotted path such as `interaction-rules.pvp-on.offense.self`
    fn get_bool(&self, path: &str, default: bool) -> bool;
}

/// Error when reading a configuration document
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Configuration backed by a TOML document
#[derive(Debug, Clone, Default)]
pub struct TomlConfig {
    root: toml::Table,
}

impl TomlConfig {
    pub fn new(root: toml::Table) -> Self {
        Self { root }
    }

    /// An empty configuration: every lookup yields its default
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(Self::new(content.parse::<toml::Table>()?))
    }

    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Load a configuration file, falling back to an empty one if it is
    /// missing or malformed
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            info!("No configuration at {:?}, using defaults", path);
            return Self::empty();
        }
        match Self::read(path) {
            Ok(config) => {
                info!("Loaded configuration from {:?}", path);
                config
            }
            Err(e) => {
                warn!("{}, using defaults", e);
                Self::empty()
            }
        }
    }

    /// Value at a dotted path, if every segment resolves
    pub fn lookup(&self, path: &str) -> Option<&toml::Value> {
        let mut segments = path.split('.');
        let mut current = self.root.get(segments.next()?)?;
        for segment in segments {
            current = current.as_table()?.get(segment)?;
        }
        Some(current)
    }
}

impl ConfigAdapter for TomlConfig {
    fn get_bool(&self, path: &str, default: bool) -> bool {
        match self.lookup(path) {
            None => default,
            Some(toml::Value::Boolean(value)) => *value,
            Some(other) => {
                warn!(
                    "Expected a boolean at '{}', found {}, using {}",
                    path,
                    other.type_str(),
                    default
                );
                default
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[interaction-rules]
enabled = true
support-skills-on-mobs = false

[interaction-rules.pvp-on.offense]
party-member = false
guild-ally = "no"
"#;

    #[test]
    fn test_dotted_lookup() {
        let config = TomlConfig::parse(SAMPLE).unwrap();
        assert!(config.get_bool("interaction-rules.enabled", false));
        assert!(!config.get_bool("interaction-rules.support-skills-on-mobs", true));
        assert!(!config.get_bool("interaction-rules.pvp-on.offense.party-member", true));
    }

    #[test]
    fn test_missing_uses_default() {
        let config = TomlConfig::parse(SAMPLE).unwrap();
        assert!(config.get_bool("interaction-rules.pvp-off.support.self", true));
        assert!(!config.get_bool("nothing.here", false));
        assert!(TomlConfig::empty().get_bool("interaction-rules.enabled", true));
    }

    #[test]
    fn test_malformed_value_uses_default() {
        let config = TomlConfig::parse(SAMPLE).unwrap();
        assert!(config.get_bool("interaction-rules.pvp-on.offense.guild-ally", true));
        // a table where a boolean is expected
        assert!(config.get_bool("interaction-rules.pvp-on", true));
    }

    #[test]
    fn test_path_through_scalar() {
        let config = TomlConfig::parse(SAMPLE).unwrap();
        assert!(config.lookup("interaction-rules.enabled.deeper").is_none());
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(TomlConfig::parse("[broken"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let config = TomlConfig::load(Path::new("/nonexistent/skirmish/combat.toml"));
        assert!(config.lookup("interaction-rules").is_none());
    }
}
