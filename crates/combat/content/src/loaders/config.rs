//! Combat configuration loader.

use std::path::Path;

use anyhow::Context as _;
use combat_core::CombatConfig;

use crate::loaders::{LoadResult, read_file};

/// Default configuration shipped with the crate.
pub const DEFAULT_CONFIG: &str = include_str!("../../data/config.toml");

/// Loader for [`CombatConfig`] from TOML.
///
/// Missing keys fall back to [`CombatConfig::default`].
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("in {}", path.display()))
    }

    pub fn parse(content: &str) -> LoadResult<CombatConfig> {
        toml::from_str(content).context("failed to parse combat config TOML")
    }

    pub fn embedded() -> LoadResult<CombatConfig> {
        Self::parse(DEFAULT_CONFIG)
    }
}
