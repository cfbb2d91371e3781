//! Describe a savegame.

use anyhow::{Context, Result};
use clap::Parser;
use freepark_common::StorageConfig;
use freepark_fileio::Loader;
use freepark_gameplay::{preload, Objective};
use std::fs;
use std::path::PathBuf;

/// Describe a savegame
#[derive(Parser)]
pub struct Savegame {
    /// Savegame to read; relative names are looked up in the savegame directory
    #[arg(value_name = "FILE")]
    file: PathBuf,
}

impl Savegame {
    pub fn execute(self, config: &StorageConfig) -> Result<()> {
        let path = super::resolve_savegame(config, &self.file)?;
        let bytes = fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;
        let mut ldr = Loader::new(&bytes);
        let data = preload(&mut ldr).with_context(|| format!("Failed to preload {}", path.display()))?;
        let scenario = &data.scenario;

        println!("File:        {} ({} bytes)", path.display(), bytes.len());
        println!("Revision:    {}", if data.revision.is_empty() { "unknown" } else { data.revision.as_str() });
        println!("Scenario:    {}", scenario.name);
        println!("             {}", scenario.descr);
        println!("Guests:      at most {}, spawn {}..{}", scenario.max_guests, scenario.spawn_lowest, scenario.spawn_highest);
        println!("Loan:        at most {}, interest {}", scenario.max_loan, scenario.interest);
        println!("Entrance fee {}", if scenario.allow_entrance_fee { "allowed" } else { "not allowed" });
        println!("Objectives:");
        for line in Objective::Container(scenario.objective.clone()).describe().lines() {
            println!("  {line}");
        }
        Ok(())
    }
}
