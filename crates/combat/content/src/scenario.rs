//! Skirmish scenario format: who stands where and who casts what, when.

use combat_core::{EntityId, Position, SkillId, Target};

/// One combatant placed at scenario start.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ActorSpec {
    pub id: u32,
    pub name: String,
    pub hp: i64,
    pub attack: i64,
    pub position: Position,
    pub faction: u8,
    #[serde(default)]
    pub hit: i32,
    #[serde(default)]
    pub flee: i32,
    #[serde(default)]
    pub immune: bool,
}

impl ActorSpec {
    pub fn entity(&self) -> EntityId {
        EntityId(self.id)
    }
}

/// Cast target in data files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TargetSpec {
    Entity(u32),
    Ground { x: i32, y: i32 },
}

impl From<TargetSpec> for Target {
    fn from(spec: TargetSpec) -> Self {
        match spec {
            TargetSpec::Entity(id) => Target::Entity(EntityId(id)),
            TargetSpec::Ground { x, y } => Target::Ground(Position::new(x, y)),
        }
    }
}

/// A cast issued at a fixed tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ScriptedCast {
    pub tick: u64,
    pub caster: u32,
    pub skill: SkillId,
    pub level: u8,
    pub target: TargetSpec,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ScenarioSpec {
    pub name: String,
    /// Ticks to simulate after the last scripted cast is issued.
    #[serde(default)]
    pub tail_ticks: u64,
    pub actors: Vec<ActorSpec>,
    #[serde(default)]
    pub casts: Vec<ScriptedCast>,
}

impl ScenarioSpec {
    /// Tick after which nothing scripted remains.
    pub fn last_tick(&self) -> u64 {
        let last_cast = self.casts.iter().map(|c| c.tick).max().unwrap_or(0);
        last_cast + self.tail_ticks
    }

    /// Casts scheduled for `tick`, in file order.
    pub fn casts_at(&self, tick: u64) -> impl Iterator<Item = &ScriptedCast> {
        self.casts.iter().filter(move |c| c.tick == tick)
    }
}
