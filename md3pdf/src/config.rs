//! Build configuration from md3pdf.toml

use crate::figures::{DEFAULT_CONVERTER, DEFAULT_FETCH_TIMEOUT_SECS};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File looked up in the current directory when no config is named
pub const DEFAULT_CONFIG_FILE: &str = "md3pdf.toml";

/// Default TeX engine
pub const DEFAULT_ENGINE: &str = "pdflatex";

/// External tools and paths used by a build
///
/// Every field is optional in the file; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// TeX engine command
    pub engine: String,

    /// Arguments placed before the `.tex` file name
    pub engine_args: Vec<String>,

    /// Raster converter command
    pub converter: String,

    /// Arguments placed before the converter's input and output names
    pub converter_args: Vec<String>,

    /// Timeout for each figure download, in seconds
    pub fetch_timeout_secs: u64,

    /// Class file used instead of the bundled one
    pub class_file: Option<PathBuf>,

    /// Directory build workspaces are created in (system temp dir if unset)
    pub workspace_root: Option<PathBuf>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            engine: DEFAULT_ENGINE.to_string(),
            engine_args: vec![
                "-interaction=nonstopmode".to_string(),
                "-halt-on-error".to_string(),
            ],
            converter: DEFAULT_CONVERTER.to_string(),
            converter_args: Vec::new(),
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            class_file: None,
            workspace_root: None,
        }
    }
}

impl BuildConfig {
    /// Load configuration from a TOML file
    ///
    /// # Parameters
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(BuildConfig)` - Loaded configuration, defaults filled in
    /// * `Err(ConfigError)` - The file could not be read or parsed
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the configuration a run should use
    ///
    /// An explicitly named file must exist. Without one, `md3pdf.toml` in the
    /// current directory is used if present, and the defaults otherwise.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let fallback = Path::new(DEFAULT_CONFIG_FILE);
        if fallback.is_file() {
            log::info!("Using configuration from {}", fallback.display());
            return Self::load(fallback);
        }

        Ok(Self::default())
    }

    /// Save configuration as TOML
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Errors that can occur when loading or saving configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("couldn't read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("couldn't parse {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("couldn't serialize configuration")]
    Serialize(#[from] toml::ser::Error),
}
