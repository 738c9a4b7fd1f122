use crate::skill::{ModeFlags, SkillId};
use crate::state::{EntityId, Tick};

/// Damage classification passed to the attack routine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DamageClass {
    Weapon,
    Magic,
    Mixed,
}

/// Inputs the damage engine needs from a skill.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackRequest {
    pub class: DamageClass,
    pub caster: EntityId,
    /// Entity the hit is drawn from; the caster unless the skill redirects it.
    pub source: EntityId,
    pub target: EntityId,
    pub skill: SkillId,
    pub level: u8,
    pub tick: Tick,
    pub flags: ModeFlags,
    pub ratio: i32,
    pub hit_rate: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum AttackResult {
    Hit,
    Critical,
    Miss,
    Immune,
}

/// What the damage engine reports back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackOutcome {
    pub result: AttackResult,
    pub damage: i64,
}

impl AttackOutcome {
    pub const MISS: Self = Self {
        result: AttackResult::Miss,
        damage: 0,
    };

    pub const fn hit(damage: i64) -> Self {
        Self {
            result: AttackResult::Hit,
            damage,
        }
    }

    /// True for non-miss, non-immune outcomes.
    pub fn landed(&self) -> bool {
        matches!(self.result, AttackResult::Hit | AttackResult::Critical)
    }
}

/// The external damage routine. Formulas live behind this trait.
pub trait AttackResolver {
    fn resolve_attack(&mut self, request: &AttackRequest) -> AttackOutcome;
}
