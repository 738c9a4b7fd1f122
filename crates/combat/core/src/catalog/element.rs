use crate::catalog::{cycle_storm_charge, ids};
use crate::env::{AttackOutcome, CombatEnv, DamageClass};
use crate::skill::{CastEffect, CombatContext, SkillBehavior, SkillId, TargetKind, skill_attack};
use crate::state::{EntityId, StatusChange, StatusKind};

const SPELL_RANGE: u32 = 9;

/// Wind blade with a separate formula per ruleset.
///
/// Classic adds 20 per level; renewal replaces the whole multiplier with
/// `250 + 50 * level`.
pub struct GaleCutter;

impl SkillBehavior for GaleCutter {
    fn id(&self) -> SkillId {
        ids::GALE_CUTTER
    }

    fn name(&self) -> &'static str {
        "gale_cutter"
    }

    fn target_kind(&self) -> TargetKind {
        TargetKind::EntityDamage
    }

    fn attack_type(&self) -> Option<DamageClass> {
        Some(DamageClass::Magic)
    }

    fn range(&self, _level: u8) -> Option<u32> {
        Some(SPELL_RANGE)
    }

    fn calculate_skill_ratio(&self, ctx: &CombatContext, _env: &CombatEnv<'_>) -> i32 {
        let level = i32::from(ctx.level);
        if ctx.is_renewal() {
            CombatContext::replace_baseline(250 + 50 * level)
        } else {
            20 * level
        }
    }
}

/// Ice bolt with a per-level chance to freeze.
pub struct FrostSpike;

impl FrostSpike {
    pub fn freeze(level: u8) -> StatusChange {
        StatusChange::new(StatusKind::Frozen, level, 3).with_chance(10 * u32::from(level))
    }
}

impl SkillBehavior for FrostSpike {
    fn id(&self) -> SkillId {
        ids::FROST_SPIKE
    }

    fn name(&self) -> &'static str {
        "frost_spike"
    }

    fn target_kind(&self) -> TargetKind {
        TargetKind::EntityDamage
    }

    fn attack_type(&self) -> Option<DamageClass> {
        Some(DamageClass::Magic)
    }

    fn range(&self, _level: u8) -> Option<u32> {
        Some(SPELL_RANGE)
    }

    fn calculate_skill_ratio(&self, ctx: &CombatContext, _env: &CombatEnv<'_>) -> i32 {
        30 * i32::from(ctx.level)
    }

    fn apply_additional_effects(
        &self,
        ctx: &CombatContext,
        target: EntityId,
        _outcome: &AttackOutcome,
        env: &mut CombatEnv<'_>,
    ) {
        env.apply_status(target, Self::freeze(ctx.level));
    }
}

/// Single hail shard. Registered wrapped in a splash decorator, which turns
/// it into a volley around the primary target.
pub struct HailShard;

impl SkillBehavior for HailShard {
    fn id(&self) -> SkillId {
        ids::HAIL_VOLLEY
    }

    fn name(&self) -> &'static str {
        "hail_volley"
    }

    fn target_kind(&self) -> TargetKind {
        TargetKind::EntityDamage
    }

    fn attack_type(&self) -> Option<DamageClass> {
        Some(DamageClass::Magic)
    }

    fn range(&self, _level: u8) -> Option<u32> {
        Some(SPELL_RANGE)
    }

    fn splash_radius(&self, level: u8) -> u32 {
        1 + u32::from(level) / 5
    }

    fn calculate_skill_ratio(&self, ctx: &CombatContext, _env: &CombatEnv<'_>) -> i32 {
        CombatContext::replace_baseline(50 * i32::from(ctx.level))
    }

    fn apply_additional_effects(
        &self,
        ctx: &CombatContext,
        target: EntityId,
        _outcome: &AttackOutcome,
        env: &mut CombatEnv<'_>,
    ) {
        env.apply_status(
            target,
            StatusChange::new(StatusKind::Chilled, ctx.level, 2).with_chance(15),
        );
    }
}

/// Lightning lance that builds storm charges and spends a full charge for
/// double damage.
pub struct StormLance;

impl SkillBehavior for StormLance {
    fn id(&self) -> SkillId {
        ids::STORM_LANCE
    }

    fn name(&self) -> &'static str {
        "storm_lance"
    }

    fn target_kind(&self) -> TargetKind {
        TargetKind::EntityDamage
    }

    fn attack_type(&self) -> Option<DamageClass> {
        Some(DamageClass::Magic)
    }

    fn range(&self, _level: u8) -> Option<u32> {
        Some(SPELL_RANGE)
    }

    fn calculate_skill_ratio(&self, ctx: &CombatContext, env: &CombatEnv<'_>) -> i32 {
        let mut total = CombatContext::BASE_SKILL_RATIO + 40 * i32::from(ctx.level);
        if env.has_status(ctx.caster, StatusKind::StormChargeMax) {
            total *= 2;
        }
        CombatContext::replace_baseline(total)
    }

    fn castend_damage_id(
        &self,
        ctx: &mut CombatContext,
        target: EntityId,
        env: &mut CombatEnv<'_>,
    ) -> CastEffect {
        let effect = skill_attack(self, DamageClass::Magic, ctx, target, env);
        cycle_storm_charge(env, self.id(), ctx.caster);
        effect
    }
}
