//! Shared data types and serialization for the episode generator.
//!
//! This crate contains pure data structures with no generation logic.
//! The generator in `episode-core` produces these types; a presentation
//! layer can consume them without pulling in the generator itself.

pub mod snapshot;
pub mod step;
pub mod types;

// Re-export world types
pub use types::{ActionKind, Level, ResourceKind, Target, TerrainKind, Tile};

// Re-export step types
pub use step::{Movement, StepRecord};

// Re-export snapshot types
pub use snapshot::{AgentSnapshot, LedgerSnapshot, Position};
