use crate::ConfDiffError;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const CONFIG_FILE_NAME: &str = "confdiff.toml";

fn default_format() -> String {
    "json".to_string()
}

fn default_separator() -> char {
    '='
}

fn default_comment_prefix() -> String {
    "#".to_string()
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Format used when neither a hint nor a file extension is available
    #[serde(default = "default_format")]
    pub default_format: String,

    /// Key/value separator for the line-oriented format
    #[serde(default = "default_separator")]
    pub separator: char,

    /// Tolerate keys present only in the candidate document
    #[serde(default)]
    pub ignore_extra: bool,

    /// Lines starting with this prefix are skipped by the line-oriented format
    #[serde(default = "default_comment_prefix")]
    pub comment_prefix: String,

    /// Extra file extension to format name mappings (e.g. "ini" = "keyvalue")
    #[serde(default)]
    pub extensions: BTreeMap<String, String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_format: default_format(),
            separator: default_separator(),
            ignore_extra: false,
            comment_prefix: default_comment_prefix(),
            extensions: BTreeMap::new(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfDiffError> {
        if self.default_format.trim().is_empty() {
            return Err(ConfDiffError::Config("default_format must not be empty".to_string()));
        }
        if self.separator.is_whitespace() {
            return Err(ConfDiffError::Config(
                "separator must not be a whitespace character".to_string(),
            ));
        }
        if self.comment_prefix.is_empty() {
            return Err(ConfDiffError::Config("comment_prefix must not be empty".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: AppConfig,
    pub path: PathBuf,
    pub exists: bool,
    pub portable: bool,
}

pub fn load_config(prefer_portable: bool) -> Result<LoadedConfig, ConfDiffError> {
    let (path, portable) = resolve_config_path(prefer_portable)?;
    load_config_from(&path, portable)
}

/// Load configuration from an explicit path, falling back to defaults when absent
pub fn load_config_from(path: &Path, portable: bool) -> Result<LoadedConfig, ConfDiffError> {
    let exists = path.exists();

    let config = if exists {
        debug!("Reading configuration from {}", path.display());
        let data = fs::read_to_string(path)?;
        let config: AppConfig =
            toml::from_str(&data).map_err(|e| ConfDiffError::Serialization(e.to_string()))?;
        config.validate()?;
        config
    } else {
        debug!("No configuration at {}, using defaults", path.display());
        AppConfig::default()
    };

    Ok(LoadedConfig {
        config,
        path: path.to_path_buf(),
        exists,
        portable,
    })
}

pub fn ensure_config(prefer_portable: bool) -> Result<LoadedConfig, ConfDiffError> {
    let loaded = load_config(prefer_portable)?;
    if !loaded.exists {
        save_config(&loaded.path, &loaded.config)?;
    }
    Ok(loaded)
}

pub fn save_config(path: &Path, config: &AppConfig) -> Result<(), ConfDiffError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let data = toml::to_string_pretty(config)
        .map_err(|e| ConfDiffError::Serialization(e.to_string()))?;
    fs::write(path, data)?;
    Ok(())
}

fn resolve_config_path(prefer_portable: bool) -> Result<(PathBuf, bool), ConfDiffError> {
    if let Some(portable_path) = portable_config_path() {
        if prefer_portable || portable_path.exists() {
            return Ok((portable_path, true));
        }
    }

    let dirs = ProjectDirs::from("", "aecs4u", "confdiff")
        .ok_or_else(|| ConfDiffError::Config("Unable to determine config directory".to_string()))?;
    Ok((dirs.config_dir().join(CONFIG_FILE_NAME), false))
}

fn portable_config_path() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|path| path.parent().map(|dir| dir.join(CONFIG_FILE_NAME)))
}
