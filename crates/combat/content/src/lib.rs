//! Data-driven combat content and loaders.
//!
//! This crate holds the data files a host needs besides code:
//! - Combat configuration (TOML)
//! - Per-skill level caps and disables (RON)
//! - Skirmish scenarios: actors and scripted casts (RON)
//!
//! Default copies of every file are embedded so a host can start without a
//! data directory.

#[cfg(feature = "loaders")]
pub mod loaders;
#[cfg(feature = "serde")]
pub mod scenario;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ContentFactory, LoadResult, ScenarioLoader, SkillTableLoader};
#[cfg(feature = "serde")]
pub use scenario::{ActorSpec, ScenarioSpec, ScriptedCast, TargetSpec};
