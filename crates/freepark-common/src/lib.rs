//! # FreePark Common
//!
//! Common types, utilities, and shared abstractions for FreePark.
//!
//! This crate provides foundational types used across all FreePark crates:
//! - The structured loading error raised by every decoder
//! - Four-character tags naming blocks and patterns
//! - Storage configuration (user data, savegame and data file locations)
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod error;
pub mod tag;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::*;
    pub use crate::error::*;
    pub use crate::tag::*;
}

pub use prelude::*;
