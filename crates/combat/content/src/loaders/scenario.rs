//! Skirmish scenario loader.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context as _, bail};

use crate::loaders::{LoadResult, read_file};
use crate::scenario::{ScenarioSpec, TargetSpec};

pub const DEFAULT_SCENARIO: &str = include_str!("../../data/skirmish.ron");

pub struct ScenarioLoader;

impl ScenarioLoader {
    pub fn load(path: &Path) -> LoadResult<ScenarioSpec> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("in {}", path.display()))
    }

    /// Parses a scenario and checks that every cast refers to a declared actor.
    pub fn parse(content: &str) -> LoadResult<ScenarioSpec> {
        let spec: ScenarioSpec = ron::from_str(content).context("failed to parse scenario RON")?;

        let mut ids = BTreeSet::new();
        for actor in &spec.actors {
            if !ids.insert(actor.id) {
                bail!("actor {} declared twice", actor.id);
            }
        }
        for cast in &spec.casts {
            if !ids.contains(&cast.caster) {
                bail!("cast at tick {} uses unknown caster {}", cast.tick, cast.caster);
            }
            if let TargetSpec::Entity(target) = cast.target
                && !ids.contains(&target)
            {
                bail!("cast at tick {} targets unknown actor {}", cast.tick, target);
            }
        }
        Ok(spec)
    }

    pub fn embedded() -> LoadResult<ScenarioSpec> {
        Self::parse(DEFAULT_SCENARIO)
    }
}
