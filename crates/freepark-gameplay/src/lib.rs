//! # FreePark Gameplay
//!
//! Records FreePark reads from savegames and resource files:
//! - [`objective`]: the polymorphic objective family and its discriminant dispatch
//! - [`scenario`]: scenario settings, with every historical layout
//! - [`savegame`]: savegame header, preloading and file handling
//! - [`text`], [`mission`], [`resources`]: blocks of RCD resource files

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod date;
pub mod mission;
pub mod objective;
pub mod persist;
pub mod resources;
pub mod savegame;
pub mod scenario;
pub mod text;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::date::Date;
    pub use crate::mission::{load_mission, Mission, MissionScenario, SolvedState};
    pub use crate::objective::{
        ContainerObjective, DropPolicy, GuestsObjective, NoObjective, Objective, ObjectiveState,
        ObjectiveType, ParkRatingObjective, TimeoutPolicy,
    };
    pub use crate::persist::Persistent;
    pub use crate::resources::{scan_blocks, BlockEntry, ResourceStore};
    pub use crate::savegame::{load_or_default, preload, PreloadData, SaveGame};
    pub use crate::scenario::Scenario;
    pub use crate::text::{TextData, TextMap};
}

pub use prelude::*;
