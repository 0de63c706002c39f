//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/orgtree/orgtree.toml`
//! 3. Explicit config file (`--config`)
//! 4. Environment variables: `ORGTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::entities::{DEFAULT_NAME, DEFAULT_ROOT_NAME};
use crate::domain::ids::DEFAULT_ID_LENGTH;

/// Unified configuration for orgtree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Field delimiter of chart files (default: ',')
    pub delimiter: char,
    /// Name of the synthetic root shown for multi-root charts
    pub root_name: String,
    /// Name shown for members without a name
    pub default_name: String,
    /// Length of generated node ids
    pub id_length: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            delimiter: ',',
            root_name: DEFAULT_ROOT_NAME.to_string(),
            default_name: DEFAULT_NAME.to_string(),
            id_length: DEFAULT_ID_LENGTH,
        }
    }
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub delimiter: Option<char>,
    pub root_name: Option<String>,
    pub default_name: Option<String>,
    pub id_length: Option<usize>,
}

/// Get the XDG config directory for orgtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "orgtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("orgtree.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            delimiter: overlay.delimiter.unwrap_or(self.delimiter),
            root_name: overlay
                .root_name
                .clone()
                .unwrap_or_else(|| self.root_name.clone()),
            default_name: overlay
                .default_name
                .clone()
                .unwrap_or_else(|| self.default_name.clone()),
            id_length: overlay.id_length.unwrap_or(self.id_length),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file, must exist when given
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Explicit config file
        if let Some(path) = config_file {
            let raw = load_raw_settings(path)?;
            current = current.merge_with(&raw);
        }

        // 4. Environment variables
        current = Self::apply_env_overrides(current)?;

        current.validate()?;
        Ok(current)
    }

    /// Apply ORGTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("ORGTREE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("delimiter") {
            let mut chars = val.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => settings.delimiter = c,
                _ => {
                    return Err(ApplicationError::Config {
                        message: format!("ORGTREE_DELIMITER must be one character, got {:?}", val),
                    })
                }
            }
        }
        if let Ok(val) = config.get_string("root_name") {
            settings.root_name = val;
        }
        if let Ok(val) = config.get_string("default_name") {
            settings.default_name = val;
        }
        if let Ok(val) = config.get_int("id_length") {
            settings.id_length = usize::try_from(val).map_err(|_| ApplicationError::Config {
                message: format!("ORGTREE_ID_LENGTH out of range: {}", val),
            })?;
        }

        Ok(settings)
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        if !self.delimiter.is_ascii() || matches!(self.delimiter, '"' | '\n' | '\r') {
            return Err(ApplicationError::Config {
                message: format!("unsupported delimiter: {:?}", self.delimiter),
            });
        }
        if !(1..=32).contains(&self.id_length) {
            return Err(ApplicationError::Config {
                message: format!("id_length must be between 1 and 32, got {}", self.id_length),
            });
        }
        Ok(())
    }

    /// Serialize settings to TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {}", e),
        })
    }

    /// Commented template for a new config file.
    pub fn template() -> String {
        let defaults = Self::default();
        format!(
            r#"# orgtree configuration
# Location: {}

# Field delimiter of chart files
delimiter = "{}"

# Name of the synthetic root shown when a chart has several top-level members
root_name = "{}"

# Name shown for members without a name
default_name = "{}"

# Length of generated node ids (1-32)
id_length = {}
"#,
            global_config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "~/.config/orgtree/orgtree.toml".into()),
            defaults.delimiter,
            defaults.root_name,
            defaults.default_name,
            defaults.id_length,
        )
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
