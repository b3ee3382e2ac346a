use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Settings for the terminal front end. Every field has a default, so an
/// empty file (or no file at all) is a valid config.
#[derive(Clone, Debug, PartialEq, serde::Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub store: Store,
    #[serde(default)]
    pub game: GameConfig,
    #[serde(default)]
    pub log: Log,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct Store {
    /// JSON file holding the best score and theme.
    #[serde(default = "defaults::prefs_path")]
    pub path: PathBuf,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize, Default)]
pub struct GameConfig {
    /// Fixed RNG seed; a fresh entropy seed is used when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct Log {
    /// tracing filter, e.g. "info" or "slide_2048=debug".
    #[serde(default = "defaults::log_filter")]
    pub filter: String,
    #[serde(default = "defaults::log_file")]
    pub file: PathBuf,
}

impl Default for Store {
    fn default() -> Self { Self { path: defaults::prefs_path() } }
}

impl Default for Log {
    fn default() -> Self { Self { filter: defaults::log_filter(), file: defaults::log_file() } }
}

impl Config {
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }
}

mod defaults {
    use std::path::PathBuf;

    pub fn prefs_path() -> PathBuf { PathBuf::from("slide2048-prefs.json") }
    pub fn log_filter() -> String { String::from("info") }
    pub fn log_file() -> PathBuf { PathBuf::from("slide2048.log") }
}
