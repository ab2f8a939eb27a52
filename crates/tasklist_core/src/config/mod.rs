use crate::error::StoreError;
use crate::sort::SortKey;
use crate::storage::json_store;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_ENV_VAR: &str = "TASKLIST_CONFIG_PATH";

/// ANSI styling used by plain-text list output. Empty strings mean no
/// styling, so writes stay clean when no theme is configured.
#[derive(Debug, Clone)]
pub struct Palette {
    pub accent: &'static str,
    pub muted: &'static str,
    pub reset: &'static str,
}

impl Palette {
    pub fn highlight(&self, text: &str) -> String {
        if self.accent.is_empty() {
            text.to_string()
        } else {
            format!("{}{}{}", self.accent, text, self.reset)
        }
    }

    pub fn dim(&self, text: &str) -> String {
        if self.muted.is_empty() {
            text.to_string()
        } else {
            format!("{}{}{}", self.muted, text, self.reset)
        }
    }
}

pub fn palette_for_theme(theme: Option<&str>) -> Palette {
    match theme.and_then(canonical_theme_name) {
        Some(ref name) if name == "dark" => Palette {
            accent: "\x1b[38;5;125m",
            muted: "\x1b[38;5;245m",
            reset: "\x1b[0m",
        },
        Some(ref name) if name == "light" => Palette {
            accent: "\x1b[38;5;88m",
            muted: "\x1b[38;5;250m",
            reset: "\x1b[0m",
        },
        _ => Palette {
            accent: "",
            muted: "",
            reset: "",
        },
    }
}

/// Normalize a theme name from the config file. Unknown names are kept so
/// the palette lookup can fall through to unstyled output.
pub fn canonical_theme_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim().to_ascii_lowercase();
    if trimmed.is_empty() {
        return None;
    }

    match trimmed.as_str() {
        "dark" | "dark-mode" | "dark_mode" | "darkmode" => Some("dark".to_string()),
        "light" | "light-mode" | "light_mode" | "lightmode" => Some("light".to_string()),
        other => Some(other.to_string()),
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub default_sort: Option<String>,
}

impl Config {
    /// Sort key used when the caller does not ask for one. Unrecognized
    /// config values fall back to priority, the application default.
    pub fn default_sort_key(&self) -> SortKey {
        self.default_sort
            .as_deref()
            .and_then(SortKey::parse)
            .unwrap_or_default()
    }
}

/// A config load never blocks startup: a missing file is the default
/// config, and malformed content is the default config plus a diagnostic.
#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: Config,
    pub error: Option<StoreError>,
}

pub fn config_path() -> Result<PathBuf, StoreError> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    json_store::app_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}

pub fn load_config_with_fallback() -> ConfigLoad {
    match config_path() {
        Ok(path) => load_config_with_fallback_from_path(&path),
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_with_fallback_from_path(path: &Path) -> ConfigLoad {
    if !path.exists() {
        return ConfigLoad {
            config: Config::default(),
            error: None,
        };
    }

    match load_config_from_path(path) {
        Ok(config) => ConfigLoad {
            config,
            error: None,
        },
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_from_path(path: &Path) -> Result<Config, StoreError> {
    let content = std::fs::read_to_string(path)
        .map_err(|err| StoreError::io(format!("{}: {}", path.display(), err)))?;
    let mut config: Config = serde_json::from_str(&content).map_err(|err| {
        StoreError::corrupt(format!("invalid JSON in {}: {}", path.display(), err))
    })?;
    config.theme = config.theme.as_deref().and_then(canonical_theme_name);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::{
        Config, canonical_theme_name, load_config_from_path,
        load_config_with_fallback_from_path, palette_for_theme,
    };
    use crate::sort::SortKey;
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(file_name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("tasklist-{nanos}-{file_name}"))
    }

    #[test]
    fn missing_config_is_default_without_error() {
        let path = temp_path("missing-config.json");
        let result = load_config_with_fallback_from_path(&path);

        assert_eq!(result.config, Config::default());
        assert!(result.error.is_none());
    }

    #[test]
    fn invalid_config_is_default_with_diagnostic() {
        let path = temp_path("invalid-config.json");
        fs::write(&path, "{ invalid json ").unwrap();

        let result = load_config_with_fallback_from_path(&path);
        fs::remove_file(&path).ok();

        assert_eq!(result.config, Config::default());
        assert!(result.error.is_some());
    }

    #[test]
    fn valid_config_reads_theme_and_sort() {
        let path = temp_path("valid-config.json");
        let content = serde_json::json!({
            "theme": "Dark-Mode",
            "default_sort": "due_date"
        });
        fs::write(&path, serde_json::to_string(&content).unwrap()).unwrap();

        let loaded = load_config_from_path(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(loaded.theme.as_deref(), Some("dark"));
        assert_eq!(loaded.default_sort_key(), SortKey::DueDate);
    }

    #[test]
    fn unknown_default_sort_falls_back_to_priority() {
        let config = Config {
            theme: None,
            default_sort: Some("created".to_string()),
        };
        assert_eq!(config.default_sort_key(), SortKey::Priority);
    }

    #[test]
    fn canonical_theme_name_maps_variants() {
        assert_eq!(canonical_theme_name("Dark"), Some("dark".into()));
        assert_eq!(canonical_theme_name("darkmode"), Some("dark".into()));
        assert_eq!(canonical_theme_name("LIGHT_MODE"), Some("light".into()));
        assert_eq!(canonical_theme_name("oceanic"), Some("oceanic".into()));
        assert_eq!(canonical_theme_name("  "), None);
    }

    #[test]
    fn palette_for_theme_styles_known_themes_only() {
        let dark = palette_for_theme(Some("dark"));
        assert_eq!(dark.accent, "\x1b[38;5;125m");

        let light = palette_for_theme(Some("light"));
        assert_eq!(light.accent, "\x1b[38;5;88m");

        let unknown = palette_for_theme(Some("oceanic"));
        assert!(unknown.accent.is_empty());

        let none = palette_for_theme(None);
        assert!(none.accent.is_empty());
        assert_eq!(none.highlight("text"), "text");
    }
}
