//! The polymorphic capability interface implemented once per skill.
//!
//! A skill overrides only the steps it needs. Everything else falls back to a
//! neutral default: no hit-rate change, a zero ratio delta, no-op cast
//! entries and no additional effect. Setting [`SkillBehavior::attack_type`]
//! turns the default damage entry into the shared attack routine, which is
//! what separates weapon and magic skills from generic ones.

use arrayvec::ArrayVec;

use crate::config::CombatConfig;
use crate::env::{AttackOutcome, CombatEnv, DamageClass, RelationFilter};
use crate::skill::{CombatContext, SkillId, skill_attack};
use crate::state::{EntityId, Position, UnitGroupId, UnitSpec};

/// Which execution entry the dispatcher calls for a skill.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum TargetKind {
    /// Aimed at an entity, deals damage.
    EntityDamage,
    /// Aimed at an entity, no damage (buffs, statuses, toggles).
    EntityNoDamage,
    /// Aimed at a ground cell.
    Ground,
}

/// Delays, in ticks, of the re-entries a skill requests.
pub type Deferrals = ArrayVec<u64, { CombatConfig::MAX_DEFERRALS }>;

/// Summary of one area resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AreaReport {
    /// Entities that passed the filter.
    pub targets: u32,
    /// Sub-invocations that reported a non-zero effect.
    pub landed: u32,
}

/// What one execution step produced.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CastEffect {
    NoOp,
    /// A non-damaging effect took hold.
    Applied,
    Attack(AttackOutcome),
    Area(AreaReport),
    /// Ask the dispatcher to place a unit group at the cast position.
    PlaceUnit(UnitSpec),
    /// A unit group was placed and resolved against its area.
    Unit { group: UnitGroupId, report: AreaReport },
    /// Re-enter the execution stage after each listed delay.
    Defer(Deferrals),
    /// Re-enter the pipeline for another skill with the same level and flags.
    Forward(SkillId),
}

impl CastEffect {
    /// Integer success signal: 0 means not applicable or no effect.
    pub fn code(&self) -> i32 {
        match self {
            Self::NoOp => 0,
            Self::Applied | Self::PlaceUnit(_) | Self::Forward(_) => 1,
            Self::Attack(outcome) => i32::from(outcome.landed()),
            Self::Area(report) => report.landed as i32,
            Self::Unit { report, .. } => 1 + report.landed as i32,
            Self::Defer(delays) => delays.len() as i32,
        }
    }

    pub fn defer_once(delay: u64) -> Self {
        let mut delays = Deferrals::new();
        delays.push(delay);
        Self::Defer(delays)
    }
}

/// Strategy object registered once per skill id.
///
/// Implementations hold no per-cast state and are shared across every cast
/// for the lifetime of the process.
pub trait SkillBehavior: Send + Sync {
    fn id(&self) -> SkillId;

    fn name(&self) -> &'static str;

    fn target_kind(&self) -> TargetKind;

    /// Highest level before any data-driven cap.
    fn max_level(&self) -> u8 {
        10
    }

    /// Damage classification; `None` marks a generic skill without the
    /// weapon damage path.
    fn attack_type(&self) -> Option<DamageClass> {
        None
    }

    /// Maximum cast distance; `None` means unlimited.
    fn range(&self, _level: u8) -> Option<u32> {
        None
    }

    /// Radius of the area a cast covers; 0 for single-target skills.
    fn splash_radius(&self, _level: u8) -> u32 {
        0
    }

    /// Who a placed unit group affects.
    fn area_relation(&self) -> RelationFilter {
        RelationFilter::Enemies
    }

    /// Adjusts an accuracy percentage. Must stay pure for identical inputs.
    fn modify_hit_rate(
        &self,
        rate: i32,
        _caster: EntityId,
        _target: Option<EntityId>,
        _level: u8,
    ) -> i32 {
        rate
    }

    /// Ratio delta added to [`CombatContext::BASE_SKILL_RATIO`].
    fn calculate_skill_ratio(&self, _ctx: &CombatContext, _env: &CombatEnv<'_>) -> i32 {
        0
    }

    fn castend_damage_id(
        &self,
        ctx: &mut CombatContext,
        target: EntityId,
        env: &mut CombatEnv<'_>,
    ) -> CastEffect {
        match self.attack_type() {
            Some(class) => skill_attack(self, class, ctx, target, env),
            None => CastEffect::NoOp,
        }
    }

    fn castend_nodamage_id(
        &self,
        _ctx: &mut CombatContext,
        _target: EntityId,
        _env: &mut CombatEnv<'_>,
    ) -> CastEffect {
        CastEffect::NoOp
    }

    fn castend_pos2(
        &self,
        _ctx: &mut CombatContext,
        _at: Position,
        _env: &mut CombatEnv<'_>,
    ) -> CastEffect {
        CastEffect::NoOp
    }

    /// Secondary effects layered on after a landed hit.
    fn apply_additional_effects(
        &self,
        _ctx: &CombatContext,
        _target: EntityId,
        _outcome: &AttackOutcome,
        _env: &mut CombatEnv<'_>,
    ) {
    }
}
