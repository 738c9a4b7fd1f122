//! Loaders that turn TOML/RON data files into core types.

pub mod config;
pub mod factory;
pub mod scenario;
pub mod skills;

pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use scenario::ScenarioLoader;
pub use skills::SkillTableLoader;

use std::path::Path;

use anyhow::Context as _;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}
