use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::category::StorageFormat;
use crate::error::{NewsdeskError, Result};

const CONFIG_FILE: &str = "newsdesk.toml";

/// Label shown for posts whose category does not resolve
pub const DEFAULT_FALLBACK_LABEL: &str = "Uncategorized";

/// Default config template with rich comments
const DEFAULT_CONFIG_TEMPLATE: &str = r#"# newsdesk configuration file
# Location: ~/.newsdesk/newsdesk.toml

[routing]
# Legacy route aliases to stop resolving (must be listed explicitly)
# Default: []
# Example: deprecated_aliases = ["news/local"]
deprecated_aliases = []

# Extra legacy url fragments mapped to a category id
# Example:
# [routing.extra_aliases]
# "theatre" = 32

[storage]
# Representation emitted when serializing a category: id | path | hierarchical | display
# Only "id" is read by the current schema; the others serve older readers.
format = "id"

[display]
# Label rendered for posts whose category cannot be resolved
fallback_label = "Uncategorized"
"#;

/// Global configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub routing: RoutingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Route alias overrides applied on top of the builtin alias table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RoutingConfig {
    /// Builtin aliases that no longer resolve
    #[serde(default)]
    pub deprecated_aliases: Vec<String>,

    /// Additional alias -> category id entries
    #[serde(default)]
    pub extra_aliases: BTreeMap<String, u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    #[serde(default)]
    pub format: StorageFormat,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_fallback_label")]
    pub fallback_label: String,
}

fn default_fallback_label() -> String {
    DEFAULT_FALLBACK_LABEL.to_string()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            fallback_label: default_fallback_label(),
        }
    }
}

impl Config {
    /// Load config from base directory
    pub fn load(base_dir: &Path) -> Result<Self> {
        let path = base_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content).map_err(|e| NewsdeskError::ConfigParse {
            path: path.clone(),
            message: e.to_string(),
        })?;

        Ok(config)
    }

    /// Save config to base directory
    pub fn save(&self, base_dir: &Path) -> Result<()> {
        let path = base_dir.join(CONFIG_FILE);
        fs::create_dir_all(base_dir)?;

        let content = toml::to_string_pretty(self).map_err(|e| NewsdeskError::ConfigParse {
            path: path.clone(),
            message: e.to_string(),
        })?;

        fs::write(&path, content)?;
        Ok(())
    }

    /// Get config file path
    pub fn path(base_dir: &Path) -> PathBuf {
        base_dir.join(CONFIG_FILE)
    }

    /// Initialize config with default template (rich comments)
    pub fn init(base_dir: &Path) -> Result<PathBuf> {
        let path = base_dir.join(CONFIG_FILE);
        fs::create_dir_all(base_dir)?;

        if !path.exists() {
            fs::write(&path, DEFAULT_CONFIG_TEMPLATE)?;
        }

        Ok(path)
    }

    /// Get a config value by dot-notation key
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "routing.deprecated_aliases" => {
                Some(format!("{:?}", self.routing.deprecated_aliases))
            }
            "routing.extra_aliases" => Some(format_alias_map(&self.routing.extra_aliases)),
            "storage.format" => Some(self.storage.format.to_string()),
            "display.fallback_label" => Some(self.display.fallback_label.clone()),
            _ => None,
        }
    }

    /// Set a config value by dot-notation key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "routing.deprecated_aliases" => {
                self.routing.deprecated_aliases = parse_string_list(value);
                Ok(())
            }
            "routing.extra_aliases" => {
                self.routing.extra_aliases = parse_alias_map(key, value)?;
                Ok(())
            }
            "storage.format" => {
                self.storage.format =
                    value
                        .parse()
                        .map_err(|message| NewsdeskError::InvalidConfigValue {
                            key: key.to_string(),
                            value: value.to_string(),
                            message,
                        })?;
                Ok(())
            }
            "display.fallback_label" => {
                self.display.fallback_label = value.trim().to_string();
                Ok(())
            }
            _ => Err(NewsdeskError::ConfigKeyNotFound {
                key: key.to_string(),
            }),
        }
    }

    /// List all config keys with their current values
    pub fn list(&self) -> Vec<(String, String)> {
        [
            "routing.deprecated_aliases",
            "routing.extra_aliases",
            "storage.format",
            "display.fallback_label",
        ]
        .into_iter()
        .filter_map(|key| self.get(key).map(|value| (key.to_string(), value)))
        .collect()
    }
}

/// Parse a comma-separated or JSON-like list string
fn parse_string_list(value: &str) -> Vec<String> {
    let trimmed = value.trim();

    // Try JSON array format first: ["a", "b"]
    let inner = if trimmed.starts_with('[') && trimmed.ends_with(']') {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    };

    inner
        .split(',')
        .map(|s| s.trim().trim_matches('"').trim_matches('\'').to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Parse `alias=id` pairs: "theatre=32,news/locals=11"
fn parse_alias_map(key: &str, value: &str) -> Result<BTreeMap<String, u32>> {
    let mut map = BTreeMap::new();
    for item in parse_string_list(value) {
        let invalid = |message: String| NewsdeskError::InvalidConfigValue {
            key: key.to_string(),
            value: value.to_string(),
            message,
        };
        let (alias, id) = item
            .split_once('=')
            .ok_or_else(|| invalid(format!("expected alias=id, got '{}'", item)))?;
        let id = id
            .trim()
            .parse::<u32>()
            .map_err(|e| invalid(format!("bad id for '{}': {}", alias.trim(), e)))?;
        map.insert(alias.trim().to_string(), id);
    }
    Ok(map)
}

fn format_alias_map(map: &BTreeMap<String, u32>) -> String {
    map.iter()
        .map(|(alias, id)| format!("{}={}", alias, id))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_string_list_comma() {
        let result = parse_string_list("localnews,news/local");
        assert_eq!(result, vec!["localnews", "news/local"]);
    }

    #[test]
    fn test_parse_string_list_json() {
        let result = parse_string_list(r#"["localnews", "news/local"]"#);
        assert_eq!(result, vec!["localnews", "news/local"]);
    }

    #[test]
    fn test_parse_string_list_empty() {
        assert!(parse_string_list("[]").is_empty());
    }

    #[test]
    fn test_parse_alias_map() {
        let map = parse_alias_map("routing.extra_aliases", "theatre=32, news/locals = 11").unwrap();
        assert_eq!(map.get("theatre"), Some(&32));
        assert_eq!(map.get("news/locals"), Some(&11));
        assert_eq!(format_alias_map(&map), "news/locals=11,theatre=32");
    }

    #[test]
    fn test_parse_alias_map_rejects_garbage() {
        let err = parse_alias_map("routing.extra_aliases", "theatre").unwrap_err();
        assert_eq!(err.exit_code(), 5);
        let err = parse_alias_map("routing.extra_aliases", "theatre=abc").unwrap_err();
        assert!(err.to_string().contains("bad id for 'theatre'"));
    }

    #[test]
    fn test_config_get_set() {
        let mut config = Config::default();

        config
            .set("routing.deprecated_aliases", "news/local")
            .unwrap();
        assert_eq!(config.routing.deprecated_aliases, vec!["news/local"]);

        config.set("storage.format", "hierarchical").unwrap();
        assert_eq!(config.storage.format, StorageFormat::Hierarchical);
        assert_eq!(config.get("storage.format").unwrap(), "hierarchical");

        assert!(config.set("storage.format", "slug").is_err());
        assert!(config.set("nope", "1").is_err());
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.storage.format, StorageFormat::Id);
        assert_eq!(config.display.fallback_label, DEFAULT_FALLBACK_LABEL);
        assert_eq!(config.list().len(), 4);
    }

    #[test]
    fn test_template_parses_to_defaults() {
        let config: Config = toml::from_str(DEFAULT_CONFIG_TEMPLATE).unwrap();
        assert_eq!(config, Config::default());
    }
}
