//! Generator configuration
//!
//! Optional TOML file, every key has a default:
//!
//! ```toml
//! standard_table_name = "STD_OPCODE_TABLE"
//! extended_table_name = "EXT_OPCODE_TABLE"
//! slot_comments = true
//! trim_trailing_empty_slots = false
//! source = "tables/opcodes.adoc"   # relative to this file
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::opcodes::RenderOptions;

/// Settings for one generator run
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Name of the standard-namespace array
    pub standard_table_name: String,

    /// Name of the extended-namespace array
    pub extended_table_name: String,

    /// Append `// <byte>` comments to every slot
    pub slot_comments: bool,

    /// End each array after its last populated slot instead of slot 255
    pub trim_trailing_empty_slots: bool,

    /// Alternate documentation table. Relative paths are resolved
    /// against the directory of the config file.
    pub source: Option<PathBuf>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            standard_table_name: "STD_OPCODE_TABLE".to_string(),
            extended_table_name: "EXT_OPCODE_TABLE".to_string(),
            slot_comments: true,
            trim_trailing_empty_slots: false,
            source: None,
        }
    }
}

impl GeneratorConfig {
    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let mut config = Self::from_toml_str(&text)?;

        if let (Some(source), Some(dir)) = (config.source.as_ref(), path.parent()) {
            if source.is_relative() {
                config.source = Some(dir.join(source));
            }
        }
        Ok(config)
    }

    /// Parse and validate TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: GeneratorConfig = toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            slot_comments: self.slot_comments,
            trim_trailing_empty_slots: self.trim_trailing_empty_slots,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (key, name) in [
            ("standard_table_name", &self.standard_table_name),
            ("extended_table_name", &self.extended_table_name),
        ] {
            if !is_identifier(name) {
                return Err(ConfigError::Invalid(format!(
                    "{} '{}' is not an identifier",
                    key, name
                )));
            }
        }
        if self.standard_table_name == self.extended_table_name {
            return Err(ConfigError::Invalid(format!(
                "standard and extended tables share the name '{}'",
                self.standard_table_name
            )));
        }
        Ok(())
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Errors from loading a [`GeneratorConfig`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file could not be read
    Io { path: PathBuf, message: String },

    /// TOML syntax or type error
    Parse(String),

    /// Well-formed but unusable value
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, message } => {
                write!(f, "Failed to read config '{}': {}", path.display(), message)
            }
            ConfigError::Parse(msg) => write!(f, "Invalid config: {}", msg),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}
