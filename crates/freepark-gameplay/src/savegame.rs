//! Savegame files.
//!
//! A savegame starts with the `FCTS` header pattern holding the revision of
//! the program that wrote it, followed by the scenario pattern.

use crate::persist::Persistent;
use crate::scenario::Scenario;
use freepark_common::{LoadResult, LoadingError, Tag};
use freepark_fileio::{Loader, Saver};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Savegame header pattern.
pub const TAG_FCTS: Tag = Tag(*b"FCTS");
/// Currently supported version of the FCTS pattern.
pub const CURRENT_VERSION_FCTS: u32 = 1;

/// Revision text written into new savegames.
pub const REVISION: &str = concat!("freepark-", env!("CARGO_PKG_VERSION"));

/// The part of a savegame needed to describe it without loading the world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreloadData {
    /// Program revision that wrote the savegame; empty when unknown.
    pub revision: String,
    /// Scenario of the savegame.
    pub scenario: Scenario,
}

/// Read the savegame header and scenario from the loader position.
pub fn preload(ldr: &mut Loader<'_>) -> LoadResult<PreloadData> {
    let version = ldr.open_pattern(TAG_FCTS)?;
    ldr.check_supported(version, CURRENT_VERSION_FCTS)?;
    let revision = if version >= 1 { ldr.get_text()? } else { String::new() };
    ldr.close_pattern()?;

    let mut scenario = Scenario::default();
    scenario.load(ldr)?;
    debug!("Preloaded savegame of revision '{revision}', scenario '{}'", scenario.name);
    Ok(PreloadData { revision, scenario })
}

/// A complete savegame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveGame {
    /// Program revision that wrote the savegame.
    pub revision: String,
    /// Scenario being played.
    pub scenario: Scenario,
}

impl Default for SaveGame {
    fn default() -> Self {
        Self::new(Scenario::default())
    }
}

impl From<PreloadData> for SaveGame {
    fn from(data: PreloadData) -> Self {
        Self {
            revision: data.revision,
            scenario: data.scenario,
        }
    }
}

impl SaveGame {
    /// Creates a savegame of the current revision.
    #[must_use]
    pub fn new(scenario: Scenario) -> Self {
        Self {
            revision: REVISION.to_string(),
            scenario,
        }
    }

    /// A new game, built through the same path as loading a file.
    pub fn default_init() -> LoadResult<Self> {
        let mut ldr = Loader::default_init();
        let data = preload(&mut ldr)?;
        ldr.finish()?;
        Ok(Self {
            revision: REVISION.to_string(),
            scenario: data.scenario,
        })
    }

    /// Decode a savegame, requiring all bytes to be used.
    pub fn from_bytes(bytes: &[u8]) -> LoadResult<Self> {
        let mut ldr = Loader::new(bytes);
        let data = preload(&mut ldr)?;
        ldr.finish()?;
        if ldr.remaining() > 0 {
            return Err(LoadingError::TrailingBytes {
                what: "end of savegame".to_string(),
                trailing: ldr.remaining(),
            });
        }
        Ok(data.into())
    }

    /// Encode the savegame with the current version of every pattern.
    pub fn to_bytes(&self) -> LoadResult<Vec<u8>> {
        let mut svr = Saver::new();
        svr.start_pattern(TAG_FCTS, CURRENT_VERSION_FCTS);
        svr.put_text(&self.revision)?;
        svr.end_pattern()?;
        self.scenario.save(&mut svr)?;
        svr.finish()
    }

    /// Load a savegame file.
    pub fn load_file(path: &Path) -> LoadResult<Self> {
        let bytes = fs::read(path)?;
        let save = Self::from_bytes(&bytes)?;
        info!("Loaded savegame {}", path.display());
        Ok(save)
    }

    /// Write a savegame file.
    ///
    /// The data is written to a temporary sibling first and renamed over the
    /// target, so an existing file is never left half written.
    pub fn save_file(&self, path: &Path) -> LoadResult<()> {
        let bytes = self.to_bytes()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let temp_path = temp_path(path);

        let mut file = fs::File::create(&temp_path)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&temp_path, path)?;
        info!("Saved game to {}", path.display());
        Ok(())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Load the named savegame, or start a new game when there is none or it fails to load.
pub fn load_or_default(path: Option<&Path>) -> LoadResult<SaveGame> {
    match path {
        None => SaveGame::default_init(),
        Some(path) => match SaveGame::load_file(path) {
            Ok(save) => Ok(save),
            Err(e) => {
                warn!("Failed to load savegame {}: {e}; starting a new game", path.display());
                SaveGame::default_init()
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objective::{ContainerObjective, GuestsObjective, Objective, TimeoutPolicy};
    use crate::Date;
    use tempfile::TempDir;

    fn sample() -> SaveGame {
        let mut scenario = Scenario::default_with_rng(&mut fastrand::Rng::with_seed(11));
        scenario.name = "Coaster Valley".to_string();
        scenario.objective = ContainerObjective::new(
            TimeoutPolicy::Before,
            Date::new(15, 4, 3),
            vec![Objective::Guests(GuestsObjective::new(800))],
        );
        SaveGame::new(scenario)
    }

    #[test]
    fn test_bytes_round_trip() {
        let save = sample();
        let bytes = save.to_bytes().expect("encode");
        assert_eq!(&bytes[..4], b"FCTS");
        assert_eq!(SaveGame::from_bytes(&bytes).expect("decode"), save);
    }

    #[test]
    fn test_boundary_savegame_round_trip() {
        let mut scenario = Scenario::default_with_rng(&mut fastrand::Rng::with_seed(5));
        scenario.name = String::new();
        scenario.descr = String::new();
        scenario.objective = ContainerObjective::new(TimeoutPolicy::None, Date::new(1, 1, 1), Vec::new());
        scenario.spawn_lowest = u16::MAX;
        scenario.spawn_highest = u16::MAX;
        scenario.interest = u16::MAX;
        scenario.max_guests = u32::MAX;
        scenario.max_loan = u32::MAX;
        let save = SaveGame {
            revision: String::new(),
            scenario,
        };
        let bytes = save.to_bytes().expect("encode");
        assert_eq!(SaveGame::from_bytes(&bytes).expect("decode"), save);
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut bytes = sample().to_bytes().expect("encode");
        bytes.extend_from_slice(&[1, 2]);
        let err = SaveGame::from_bytes(&bytes).expect_err("trailing");
        assert!(matches!(err, LoadingError::TrailingBytes { trailing: 2, .. }));
    }

    #[test]
    fn test_truncated_savegame_fails() {
        let bytes = sample().to_bytes().expect("encode");
        for len in 0..bytes.len() {
            assert!(SaveGame::from_bytes(&bytes[..len]).is_err(), "prefix of {len} bytes decoded");
        }
    }

    #[test]
    fn test_file_round_trip() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("save").join("park.fct");
        let save = sample();
        save.save_file(&path).expect("save");
        assert!(!temp_path(&path).exists());
        assert_eq!(SaveGame::load_file(&path).expect("load"), save);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().expect("tempdir");
        let err = SaveGame::load_file(&dir.path().join("nope.fct")).expect_err("missing");
        assert!(matches!(err, LoadingError::Io(_)));
    }

    #[test]
    fn test_load_or_default_falls_back() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("broken.fct");
        fs::write(&path, b"FCTS\x01\x00").expect("write");
        let save = load_or_default(Some(&path)).expect("fallback");
        assert_eq!(save.revision, REVISION);
        assert_eq!(save.scenario.name, crate::scenario::DEFAULT_SCENARIO_NAME);

        let fresh = load_or_default(None).expect("new game");
        assert_eq!(fresh.scenario.max_guests, 3000);
    }

    #[test]
    fn test_preload_ignores_rest_of_stream() {
        let mut bytes = sample().to_bytes().expect("encode");
        bytes.extend_from_slice(b"WRLD");
        let mut ldr = Loader::new(&bytes);
        let data = preload(&mut ldr).expect("preload");
        assert_eq!(data.revision, REVISION);
        assert_eq!(data.scenario.name, "Coaster Valley");
        assert_eq!(ldr.remaining(), 4);
    }
}
