//! Skill limit table loader.
//!
//! The table caps levels and disables skills without touching code:
//!
//! ```ron
//! [
//!     (id: 5001, name: Some("rending_strike"), max_level: 10),
//!     (id: 5011, max_level: 5, enabled: false),
//! ]
//! ```

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context as _, bail};
use combat_core::{CombatConfig, SkillLimit};

use crate::loaders::{LoadResult, read_file};

pub const DEFAULT_SKILLS: &str = include_str!("../../data/skills.ron");

pub struct SkillTableLoader;

impl SkillTableLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<SkillLimit>> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("in {}", path.display()))
    }

    /// Parses a table and rejects repeated ids or levels above the global cap.
    ///
    /// Whether each id is registered is checked later by the registry builder.
    pub fn parse(content: &str) -> LoadResult<Vec<SkillLimit>> {
        let limits: Vec<SkillLimit> =
            ron::from_str(content).context("failed to parse skill table RON")?;

        let mut seen = BTreeSet::new();
        for limit in &limits {
            if !seen.insert(limit.id) {
                bail!("skill {} appears more than once", limit.id);
            }
            if limit.max_level == 0 || limit.max_level > CombatConfig::MAX_SKILL_LEVEL {
                bail!(
                    "skill {} max_level {} outside 1..={}",
                    limit.id,
                    limit.max_level,
                    CombatConfig::MAX_SKILL_LEVEL
                );
            }
        }
        Ok(limits)
    }

    pub fn embedded() -> LoadResult<Vec<SkillLimit>> {
        Self::parse(DEFAULT_SKILLS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::SkillId;

    #[test]
    fn embedded_table_applies_to_builtin_catalog() {
        let limits = SkillTableLoader::embedded().unwrap();
        assert!(!limits.is_empty());
        let registry = combat_core::builtin_registry(&limits).unwrap();
        assert!(registry.contains(SkillId(5001)));
    }

    #[test]
    fn enabled_defaults_to_true() {
        let limits = SkillTableLoader::parse("[(id: 7, max_level: 3)]").unwrap();
        assert_eq!(limits[0].id, SkillId(7));
        assert!(limits[0].enabled);
        assert_eq!(limits[0].name, None);
    }

    #[test]
    fn duplicates_and_bad_levels_are_rejected() {
        assert!(SkillTableLoader::parse("[(id: 7, max_level: 3), (id: 7, max_level: 2)]").is_err());
        assert!(SkillTableLoader::parse("[(id: 7, max_level: 0)]").is_err());
        assert!(SkillTableLoader::parse("[(id: 7, max_level: 14)]").is_err());
    }
}
