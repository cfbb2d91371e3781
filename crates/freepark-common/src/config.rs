//! Storage configuration.
//!
//! Locations of user data, savegames, track designs and installed data files.
//! The configuration is an explicit value passed to whoever needs a path; it
//! can be loaded from and saved to a TOML file.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Configuration file name.
pub const CONFIG_FILE: &str = "freepark.toml";

/// Environment variables consulted, in order, for the user home directory.
const HOME_VARIABLES: [&str; 4] = ["HOME", "USERPROFILE", "HOMEPATH", "APPDATA"];

/// Directory below the home directory holding user data.
const USERDATA_DIRNAME: &str = ".freepark";

/// Where files live on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// User data directory (None = `<home>/.freepark`)
    pub userdata_dir: Option<PathBuf>,
    /// Directories searched for installed data files, in order
    pub data_search_paths: Vec<PathBuf>,
    /// Savegame directory name inside the user data directory
    pub savegame_subdir: String,
    /// Track design directory name inside the user data directory
    pub track_design_subdir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            userdata_dir: None,
            data_search_paths: vec![
                PathBuf::from("."),
                PathBuf::from(".."),
                PathBuf::from("../.."),
                PathBuf::from("/usr/share/freepark"),
            ],
            savegame_subdir: "save".to_string(),
            track_design_subdir: "tracks".to_string(),
        }
    }
}

impl StorageConfig {
    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    info!("Loaded config from {}", path.display());
                    config
                },
                Err(e) => {
                    warn!("Failed to parse config file: {e}");
                    Self::default()
                },
            },
            Err(e) => {
                warn!("Failed to read config file: {e}");
                Self::default()
            },
        }
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// The user data directory, locating the home directory when not configured.
    pub fn userdata_dir(&self) -> Result<PathBuf, ConfigError> {
        if let Some(dir) = &self.userdata_dir {
            return Ok(dir.clone());
        }
        let home = locate_home_with(|var| std::env::var(var).ok())
            .ok_or(ConfigError::NoHomeDirectory)?;
        Ok(home.join(USERDATA_DIRNAME))
    }

    /// Directory holding the user's savegames.
    pub fn savegame_dir(&self) -> Result<PathBuf, ConfigError> {
        Ok(self.userdata_dir()?.join(&self.savegame_subdir))
    }

    /// Directory holding the user's track designs.
    pub fn track_design_dir(&self) -> Result<PathBuf, ConfigError> {
        Ok(self.userdata_dir()?.join(&self.track_design_subdir))
    }

    /// Create the savegame and track design directories, including parents.
    pub fn ensure_dirs(&self) -> Result<(), ConfigError> {
        for dir in [self.savegame_dir()?, self.track_design_dir()?] {
            if !dir.is_dir() {
                fs::create_dir_all(&dir)?;
                debug!("Created directory {}", dir.display());
            }
        }
        Ok(())
    }

    /// Find an installed data file by its relative path.
    pub fn find_data_file(&self, name: &str) -> Result<PathBuf, ConfigError> {
        self.data_search_paths
            .iter()
            .map(|dir| dir.join(name))
            .find(|path| path.is_file())
            .ok_or_else(|| ConfigError::DataFileMissing(name.to_string()))
    }
}

/// Locate the user's home directory through an environment lookup, falling
/// back to the platform's notion of a home directory.
pub fn locate_home_with<F>(lookup: F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    HOME_VARIABLES
        .iter()
        .filter_map(|var| lookup(var))
        .find(|value| !value.is_empty())
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
}

/// Copy a file byte for byte.
pub fn copy_binary_file<P: AsRef<Path>, Q: AsRef<Path>>(src: P, dest: Q) -> Result<(), ConfigError> {
    fs::copy(src, dest)?;
    Ok(())
}
