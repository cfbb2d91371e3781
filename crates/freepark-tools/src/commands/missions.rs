//! Show the missions of a resource file.

use anyhow::{Context, Result};
use clap::Parser;
use freepark_common::StorageConfig;
use freepark_gameplay::{Objective, ResourceStore};
use std::path::PathBuf;

/// Show the missions of a resource file
#[derive(Parser)]
pub struct Missions {
    /// Resource file to read
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Also print the objectives of every scenario
    #[arg(short, long)]
    objectives: bool,
}

impl Missions {
    pub fn execute(self, config: &StorageConfig) -> Result<()> {
        let path = super::resolve_resource(config, &self.file)?;
        let mut store = ResourceStore::new();
        store
            .load_file(&path)
            .with_context(|| format!("Failed to load {}", path.display()))?;

        if store.missions.is_empty() {
            println!("{}: no missions", path.display());
            return Ok(());
        }
        for mission in &store.missions {
            println!("Mission: {}", mission.name);
            if !mission.descr.is_empty() {
                println!("  {}", mission.descr);
            }
            for (index, entry) in mission.scenarios.iter().enumerate() {
                let lock = if entry.is_unlocked() {
                    "unlocked".to_string()
                } else {
                    format!("{} more to solve", entry.required_to_unlock)
                };
                println!("  {}. {} ({lock}, {} bytes)", index + 1, entry.name, entry.savegame.len());
                if self.objectives {
                    let text = Objective::Container(entry.scenario.objective.clone()).describe();
                    for line in text.lines() {
                        println!("       {line}");
                    }
                }
            }
        }
        Ok(())
    }
}
