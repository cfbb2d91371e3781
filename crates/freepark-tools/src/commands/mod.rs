//! Subcommands of the `freepark` tool.
//!
//! Each command is a separate module with its own arguments and execution logic.

mod blocks;
mod missions;
mod new_save;
mod savegame;

pub use blocks::Blocks;
pub use missions::Missions;
pub use new_save::NewSave;
pub use savegame::Savegame;

use anyhow::Result;
use freepark_common::StorageConfig;
use std::path::{Path, PathBuf};

/// Resolve a resource file named on the command line, falling back to the data search paths.
fn resolve_resource(config: &StorageConfig, path: &Path) -> Result<PathBuf> {
    if path.is_absolute() || path.exists() {
        return Ok(path.to_path_buf());
    }
    Ok(config.find_data_file(&path.to_string_lossy())?)
}

/// Resolve a savegame named on the command line; relative names live in the savegame directory.
fn resolve_savegame(config: &StorageConfig, path: &Path) -> Result<PathBuf> {
    if path.is_absolute() || path.exists() {
        return Ok(path.to_path_buf());
    }
    Ok(config.savegame_dir()?.join(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config(dir: &TempDir) -> StorageConfig {
        StorageConfig {
            userdata_dir: Some(dir.path().join("user")),
            data_search_paths: vec![dir.path().join("data")],
            ..StorageConfig::default()
        }
    }

    #[test]
    fn test_relative_savegame_lives_in_savegame_dir() {
        let dir = TempDir::new().expect("tempdir");
        let resolved = resolve_savegame(&config(&dir), Path::new("park-does-not-exist.fct")).expect("resolve");
        assert_eq!(resolved, dir.path().join("user").join("save").join("park-does-not-exist.fct"));
    }

    #[test]
    fn test_resource_found_in_search_path() {
        let dir = TempDir::new().expect("tempdir");
        std::fs::create_dir_all(dir.path().join("data")).expect("mkdir");
        std::fs::write(dir.path().join("data").join("missions-test.rcd"), b"RCDF").expect("write");
        let resolved = resolve_resource(&config(&dir), Path::new("missions-test.rcd")).expect("resolve");
        assert_eq!(resolved, dir.path().join("data").join("missions-test.rcd"));
        assert!(resolve_resource(&config(&dir), Path::new("absent-test.rcd")).is_err());
    }
}
