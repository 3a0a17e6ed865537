use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::editor::viewport::DEFAULT_CANVAS_INSET;
use crate::raster::{FontBook, FontFamily, FontResult};

pub(crate) const APP_DIR: &str = "paintcore";
pub(crate) const APP_CONFIG_FILE: &str = "config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("neither XDG_CONFIG_HOME nor HOME is set")]
    MissingHomeDirectory,
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Font files for the text tool, one per family. Unset families render no text.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FontPaths {
    pub sans: Option<PathBuf>,
    pub serif: Option<PathBuf>,
    pub mono: Option<PathBuf>,
}

impl FontPaths {
    fn entries(&self) -> [(FontFamily, Option<&Path>); 3] {
        [
            (FontFamily::Sans, self.sans.as_deref()),
            (FontFamily::Serif, self.serif.as_deref()),
            (FontFamily::Mono, self.mono.as_deref()),
        ]
    }

    /// Loads every configured font; the first unreadable file aborts.
    pub fn load_book(&self) -> FontResult<FontBook> {
        let mut book = FontBook::new();
        for (family, path) in self.entries() {
            if let Some(path) = path {
                book.load_file(family, path)?;
            }
        }
        Ok(book)
    }
}

/// Engine settings from `config.json`. Every field is optional in the file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub default_tool: Option<String>,
    pub color: String,
    pub size: Option<u32>,
    pub zoom_percent: u16,
    pub grid_visible: bool,
    pub canvas_inset: f64,
    pub debug_logging: bool,
    pub fonts: FontPaths,
    /// Tool name -> setting name -> raw value, validated when applied.
    pub tool_settings: HashMap<String, serde_json::Map<String, serde_json::Value>>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_tool: None,
            color: "black".to_string(),
            size: None,
            zoom_percent: 100,
            grid_visible: false,
            canvas_inset: DEFAULT_CANVAS_INSET,
            debug_logging: false,
            fonts: FontPaths::default(),
            tool_settings: HashMap::new(),
        }
    }
}

/// Loads the config from the XDG location, falling back to defaults on any failure.
/// A missing file is not an error and yields defaults.
pub fn try_load_engine_config_with(
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> ConfigResult<EngineConfig> {
    let path = app_config_path(APP_DIR, APP_CONFIG_FILE, xdg_config_home, home)?;
    if !path.exists() {
        tracing::debug!(?path, "no config file; using defaults");
        return Ok(EngineConfig::default());
    }
    let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| ConfigError::Parse { path, source })
}

pub fn config_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

pub fn app_config_path(
    app_dir: &str,
    file_name: &str,
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> ConfigResult<PathBuf> {
    let mut path = config_root(xdg_config_home, home)?;
    path.push(app_dir);
    path.push(file_name);
    Ok(path)
}

fn config_root(xdg_config_home: Option<&Path>, home: Option<&Path>) -> ConfigResult<PathBuf> {
    if let Some(xdg) = xdg_config_home.filter(|path| !path.as_os_str().is_empty()) {
        return Ok(xdg.to_path_buf());
    }

    let home = home.ok_or(ConfigError::MissingHomeDirectory)?;
    Ok(home.join(".config"))
}
