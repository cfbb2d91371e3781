//! Write a savegame for a new default game.

use anyhow::{Context, Result};
use clap::Parser;
use freepark_common::{copy_binary_file, StorageConfig};
use freepark_gameplay::SaveGame;
use std::path::PathBuf;
use tracing::info;

/// Write a savegame for a new default game
#[derive(Parser)]
pub struct NewSave {
    /// Savegame to write; relative names are placed in the savegame directory
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Keep a copy of an existing file as FILE.bak
    #[arg(short, long)]
    backup: bool,
}

impl NewSave {
    pub fn execute(self, config: &StorageConfig) -> Result<()> {
        let path = super::resolve_savegame(config, &self.file)?;
        if self.backup && path.is_file() {
            let mut backup = path.clone().into_os_string();
            backup.push(".bak");
            copy_binary_file(&path, &backup)?;
            info!("Kept previous savegame as {}", PathBuf::from(backup).display());
        }

        let save = SaveGame::default_init()?;
        save.save_file(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Wrote new game '{}' to {}", save.scenario.name, path.display());
        Ok(())
    }
}
