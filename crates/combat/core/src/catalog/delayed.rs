use crate::catalog::ids;
use crate::env::{AttackOutcome, CombatEnv, DamageClass};
use crate::skill::{
    CastEffect, CombatContext, Deferrals, ModeFlags, SkillBehavior, SkillId, TargetKind,
    skill_attack,
};
use crate::state::{EntityId, StatusChange, StatusKind};

/// Ground-shaking stomp whose shockwave reaches the target in two impacts.
///
/// The initial cast only schedules the impacts; each resumed impact is a
/// regular weapon hit that may stun.
pub struct QuakeStomp;

impl QuakeStomp {
    /// Ticks after the cast at which each impact lands.
    pub const IMPACT_DELAYS: [u64; 2] = [2, 4];
}

impl SkillBehavior for QuakeStomp {
    fn id(&self) -> SkillId {
        ids::QUAKE_STOMP
    }

    fn name(&self) -> &'static str {
        "quake_stomp"
    }

    fn target_kind(&self) -> TargetKind {
        TargetKind::EntityDamage
    }

    fn max_level(&self) -> u8 {
        5
    }

    fn attack_type(&self) -> Option<DamageClass> {
        Some(DamageClass::Weapon)
    }

    fn range(&self, _level: u8) -> Option<u32> {
        Some(4)
    }

    fn calculate_skill_ratio(&self, ctx: &CombatContext, _env: &CombatEnv<'_>) -> i32 {
        60 * i32::from(ctx.level)
    }

    fn castend_damage_id(
        &self,
        ctx: &mut CombatContext,
        target: EntityId,
        env: &mut CombatEnv<'_>,
    ) -> CastEffect {
        if ctx.flags.contains(ModeFlags::RESUMED) {
            return skill_attack(self, DamageClass::Weapon, ctx, target, env);
        }
        CastEffect::Defer(Self::IMPACT_DELAYS.into_iter().collect::<Deferrals>())
    }

    fn apply_additional_effects(
        &self,
        ctx: &CombatContext,
        target: EntityId,
        _outcome: &AttackOutcome,
        env: &mut CombatEnv<'_>,
    ) {
        let stun = StatusChange::new(StatusKind::Stunned, ctx.level, 2)
            .with_chance(5 * u32::from(ctx.level));
        env.apply_status(target, stun);
    }
}
