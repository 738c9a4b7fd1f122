//! Content factory that resolves data files under one directory.

use std::path::{Path, PathBuf};

use combat_core::{CombatConfig, SkillLimit};
use tracing::debug;

use crate::loaders::{ConfigLoader, LoadResult, ScenarioLoader, SkillTableLoader};
use crate::scenario::ScenarioSpec;

/// Loads combat content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── skills.ron
/// └── scenarios/
///     └── skirmish.ron
/// ```
///
/// Files that do not exist fall back to the defaults embedded in the crate;
/// files that exist but fail to parse are errors.
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load combat configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        let path = self.data_dir.join("config.toml");
        if path.exists() {
            debug!(target: "combat::content", path = %path.display(), "loading config");
            ConfigLoader::load(&path)
        } else {
            debug!(target: "combat::content", "no config.toml, using embedded default");
            ConfigLoader::embedded()
        }
    }

    /// Load skill limits from `skills.ron`.
    pub fn load_skill_limits(&self) -> LoadResult<Vec<SkillLimit>> {
        let path = self.data_dir.join("skills.ron");
        if path.exists() {
            debug!(target: "combat::content", path = %path.display(), "loading skill table");
            SkillTableLoader::load(&path)
        } else {
            debug!(target: "combat::content", "no skills.ron, using embedded default");
            SkillTableLoader::embedded()
        }
    }

    /// Load `scenarios/<name>.ron`.
    ///
    /// Only `skirmish` has an embedded fallback.
    pub fn load_scenario(&self, name: &str) -> LoadResult<ScenarioSpec> {
        let path = self.scenario_path(name);
        if !path.exists() && name == "skirmish" {
            debug!(target: "combat::content", "using embedded skirmish scenario");
            return ScenarioLoader::embedded();
        }
        debug!(target: "combat::content", path = %path.display(), "loading scenario");
        ScenarioLoader::load(&path)
    }

    pub fn scenario_path(&self, name: &str) -> PathBuf {
        self.data_dir.join("scenarios").join(format!("{name}.ron"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{Ruleset, SkillId};

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/combat");
        assert_eq!(factory.data_dir(), Path::new("/tmp/combat"));
        assert_eq!(
            factory.scenario_path("arena"),
            PathBuf::from("/tmp/combat/scenarios/arena.ron")
        );
    }

    #[test]
    fn empty_directory_uses_embedded_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let factory = ContentFactory::new(dir.path());

        assert_eq!(factory.load_config().unwrap(), ConfigLoader::embedded().unwrap());
        assert_eq!(factory.load_skill_limits().unwrap().len(), 16);
        assert_eq!(factory.load_scenario("skirmish").unwrap().name, "skirmish");
        assert!(factory.load_scenario("arena").is_err());
    }

    #[test]
    fn files_on_disk_take_precedence() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.toml"),
            "ruleset = \"renewal\"\nrng_seed = 7\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("skills.ron"),
            "[(id: 5011, max_level: 1, enabled: false)]",
        )
        .unwrap();
        std::fs::create_dir(dir.path().join("scenarios")).unwrap();
        std::fs::write(
            dir.path().join("scenarios/duel.ron"),
            r#"(
                name: "duel",
                actors: [
                    (id: 1, name: "a", hp: 10, attack: 3, position: (x: 0, y: 0), faction: 0),
                    (id: 2, name: "b", hp: 10, attack: 3, position: (x: 1, y: 0), faction: 1),
                ],
                casts: [(tick: 0, caster: 1, skill: 5001, level: 1, target: Entity(2))],
            )"#,
        )
        .unwrap();

        let factory = ContentFactory::new(dir.path());
        let config = factory.load_config().unwrap();
        assert_eq!(config.ruleset, Ruleset::Renewal);
        assert_eq!(config.rng_seed, 7);

        let limits = factory.load_skill_limits().unwrap();
        let registry = combat_core::builtin_registry(&limits).unwrap();
        assert!(!registry.contains(SkillId(5011)));

        let duel = factory.load_scenario("duel").unwrap();
        assert_eq!(duel.actors.len(), 2);
        assert_eq!(duel.tail_ticks, 0);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.toml"), "max_chain_depth = \"deep\"").unwrap();
        let err = ContentFactory::new(dir.path()).load_config().unwrap_err();
        assert!(format!("{err:#}").contains("config.toml"));
    }
}
