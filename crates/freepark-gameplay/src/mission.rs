//! Missions: ordered sets of scenarios stored in `MISN` blocks.
//!
//! Each scenario of a mission embeds a complete savegame. Scenarios become
//! playable as earlier ones of the same mission are solved.

use crate::savegame::preload;
use crate::scenario::Scenario;
use crate::text::{TextData, TextMap};
use freepark_common::{LoadResult, Tag};
use freepark_fileio::{Loader, RcdFileReader};
use tracing::debug;

/// Mission block.
pub const TAG_MISN: Tag = Tag(*b"MISN");
/// Supported version of the MISN block.
pub const CURRENT_VERSION_MISN: u32 = 1;

/// String holding the name in a mission or scenario text block.
pub const STRING_NAME: &str = "NAME";
/// String holding the description in a mission or scenario text block.
pub const STRING_DESCR: &str = "DESCR";

/// Record of a scenario that has been won.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolvedState {
    /// Who solved it.
    pub user: String,
    /// Park value at the moment of winning.
    pub company_value: i64,
    /// Seconds since the Unix epoch when it was solved.
    pub timestamp: u64,
}

/// One scenario of a mission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissionScenario {
    /// Display name.
    pub name: String,
    /// Display description.
    pub descr: String,
    /// Savegame to start the scenario from.
    pub savegame: Vec<u8>,
    /// Settings read from the savegame.
    pub scenario: Scenario,
    /// Scenarios that still have to be solved before this one can be played.
    pub required_to_unlock: u32,
    /// Set once the scenario is won.
    pub solved: Option<SolvedState>,
}

impl MissionScenario {
    /// Whether the scenario can be played.
    #[must_use]
    pub fn is_unlocked(&self) -> bool {
        self.required_to_unlock == 0
    }
}

/// A mission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mission {
    /// Display name.
    pub name: String,
    /// Display description.
    pub descr: String,
    /// Zero if every scenario is playable from the start.
    pub max_unlock: u32,
    /// Scenarios in play order, never empty.
    pub scenarios: Vec<MissionScenario>,
}

impl Mission {
    /// Recompute [`MissionScenario::required_to_unlock`] from the solved states.
    ///
    /// Walking in order, every solved scenario pays for one unsolved
    /// scenario further down the list.
    pub fn compute_unlocks(&mut self) {
        if self.max_unlock == 0 {
            for scenario in &mut self.scenarios {
                scenario.required_to_unlock = 0;
            }
            return;
        }
        let mut balance: i64 = 0;
        for scenario in &mut self.scenarios {
            if scenario.solved.is_some() {
                scenario.required_to_unlock = 0;
                balance -= 1;
            } else {
                scenario.required_to_unlock = u32::try_from(balance.max(0)).unwrap_or(u32::MAX);
                balance += 1;
            }
        }
    }
}

/// Load the current `MISN` block.
pub fn load_mission(rcd: &mut RcdFileReader, texts: &TextMap) -> LoadResult<Mission> {
    rcd.check_version(CURRENT_VERSION_MISN)?;
    let mut length = rcd.block().map_or(0, |b| b.size);
    rcd.check_min_length(length, 12, "header")?;
    length -= 12;

    let (name, descr) = names(rcd, texts)?;
    let max_unlock = rcd.get_u32()?;
    let nr_scenarios = rcd.get_u32()?;
    if nr_scenarios == 0 {
        return Err(rcd.error("Mission without scenarios"));
    }

    let mut scenarios = Vec::new();
    for i in 0..nr_scenarios {
        rcd.check_min_length(length, 8, "scenario header")?;
        length -= 8;
        let (scenario_name, scenario_descr) = names(rcd, texts)?;

        let blob_length = rcd.get_u32()?;
        rcd.check_min_length(length, blob_length, "scenario blob")?;
        length -= blob_length;
        let savegame = rcd.get_blob(blob_length, "scenario blob")?;

        let mut ldr = Loader::new(&savegame);
        let data = preload(&mut ldr).map_err(|e| rcd.error(format!("Preloading scenario {i} failed: {e}")))?;
        debug!("Mission '{name}' scenario {i}: '{scenario_name}'");

        scenarios.push(MissionScenario {
            name: scenario_name,
            descr: scenario_descr,
            scenario: data.scenario,
            savegame,
            required_to_unlock: 0,
            solved: None,
        });
    }
    rcd.check_exact_length(length, 0, "end of block")?;

    let mut mission = Mission { name, descr, max_unlock, scenarios };
    mission.compute_unlocks();
    Ok(mission)
}

/// Read a text block reference and look up its name and description.
fn names(rcd: &mut RcdFileReader, texts: &TextMap) -> LoadResult<(String, String)> {
    let reference = rcd.get_u32()?;
    let text: &TextData = texts
        .get(&reference)
        .ok_or_else(|| rcd.error(format!("Text block {reference} not found")))?;
    let name = text
        .get(STRING_NAME)
        .ok_or_else(|| rcd.error(format!("Text block {reference} has no {STRING_NAME} string")))?;
    Ok((name.to_string(), text.get(STRING_DESCR).unwrap_or_default().to_string()))
}
