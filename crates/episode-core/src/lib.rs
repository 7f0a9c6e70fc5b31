//! Marooned episode generator.
//!
//! Produces a deterministic, replayable episode of a social-deduction
//! scenario: a fixed roster of agents on a procedurally generated
//! island gathers resources, builds an escape ship, and periodically
//! votes to exile the secretly assigned traitor. Everything downstream
//! of a seed is reproducible bit for bit; the presentation layer only
//! consumes the finished step sequence and terrain grids.

pub mod config;
pub mod episode;
pub mod ledger;
pub mod logger;
pub mod policy;
pub mod rng;
pub mod roster;
pub mod terrain;
pub mod voting;

pub use config::{ConfigError, EpisodeConfig};
pub use episode::{generate_episode, Episode, EpisodeCursor};
pub use ledger::Ledger;
pub use logger::StepLogger;
pub use rng::EpisodeRng;
pub use roster::{Agent, Role};
pub use terrain::{LevelSpec, TileGrid, WorldMap};
