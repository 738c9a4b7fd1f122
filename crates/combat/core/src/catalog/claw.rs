use crate::catalog::{ids, madness_stage, try_gain_madness};
use crate::env::{AttackOutcome, CombatEnv, DamageClass};
use crate::skill::{CombatContext, SkillBehavior, SkillId, TargetKind};
use crate::state::{EntityId, StatusChange, StatusKind};

const MELEE_RANGE: u32 = 2;

/// Plain weapon strike: +10 ratio per level above the first, and a small
/// accuracy bonus per level.
pub struct RendingStrike;

impl SkillBehavior for RendingStrike {
    fn id(&self) -> SkillId {
        ids::RENDING_STRIKE
    }

    fn name(&self) -> &'static str {
        "rending_strike"
    }

    fn target_kind(&self) -> TargetKind {
        TargetKind::EntityDamage
    }

    fn attack_type(&self) -> Option<DamageClass> {
        Some(DamageClass::Weapon)
    }

    fn range(&self, _level: u8) -> Option<u32> {
        Some(MELEE_RANGE)
    }

    fn modify_hit_rate(
        &self,
        rate: i32,
        _caster: EntityId,
        _target: Option<EntityId>,
        level: u8,
    ) -> i32 {
        rate + 5 * i32::from(level)
    }

    fn calculate_skill_ratio(&self, ctx: &CombatContext, _env: &CombatEnv<'_>) -> i32 {
        10 * (i32::from(ctx.level) - 1)
    }
}

/// Two-fang bite whose whole multiplier doubles under feral rage.
pub struct TwinFang;

impl SkillBehavior for TwinFang {
    fn id(&self) -> SkillId {
        ids::TWIN_FANG
    }

    fn name(&self) -> &'static str {
        "twin_fang"
    }

    fn target_kind(&self) -> TargetKind {
        TargetKind::EntityDamage
    }

    fn attack_type(&self) -> Option<DamageClass> {
        Some(DamageClass::Weapon)
    }

    fn range(&self, _level: u8) -> Option<u32> {
        Some(MELEE_RANGE)
    }

    fn calculate_skill_ratio(&self, ctx: &CombatContext, env: &CombatEnv<'_>) -> i32 {
        let mut total = CombatContext::BASE_SKILL_RATIO + 50 * i32::from(ctx.level);
        if env.has_status(ctx.caster, StatusKind::FeralRage) {
            total *= 2;
        }
        CombatContext::replace_baseline(total)
    }
}

/// Bite that always opens a bleeding wound and feeds the madness stages.
pub struct SavageBite;

impl SavageBite {
    pub const fn bleeding(level: u8) -> StatusChange {
        StatusChange::new(StatusKind::Bleeding, level, 5 + level as u64)
    }
}

impl SkillBehavior for SavageBite {
    fn id(&self) -> SkillId {
        ids::SAVAGE_BITE
    }

    fn name(&self) -> &'static str {
        "savage_bite"
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
        Some(MELEE_RANGE)
    }

    fn calculate_skill_ratio(&self, ctx: &CombatContext, env: &CombatEnv<'_>) -> i32 {
        30 * i32::from(ctx.level) + 50 * i32::from(madness_stage(env, ctx.caster))
    }

    fn apply_additional_effects(
        &self,
        ctx: &CombatContext,
        target: EntityId,
        _outcome: &AttackOutcome,
        env: &mut CombatEnv<'_>,
    ) {
        env.apply_status(target, Self::bleeding(ctx.level));
        try_gain_madness(env, self.id(), ctx.caster);
    }
}

/// Thorn thrust that bursts outward from the caster. Registered as an outer
/// splash: the struck target takes the thrust itself, and every other enemy
/// beyond arm's reach inside the burst takes one lash.
pub struct ThornLash;

impl ThornLash {
    /// Cells around the caster the burst leaves untouched.
    pub const DEAD_ZONE: u32 = 1;
}

impl SkillBehavior for ThornLash {
    fn id(&self) -> SkillId {
        ids::THORN_BURST
    }

    fn name(&self) -> &'static str {
        "thorn_burst"
    }

    fn target_kind(&self) -> TargetKind {
        TargetKind::EntityDamage
    }

    fn attack_type(&self) -> Option<DamageClass> {
        Some(DamageClass::Weapon)
    }

    fn range(&self, _level: u8) -> Option<u32> {
        Some(MELEE_RANGE)
    }

    fn splash_radius(&self, level: u8) -> u32 {
        3 + u32::from(level) / 5
    }

    fn calculate_skill_ratio(&self, ctx: &CombatContext, _env: &CombatEnv<'_>) -> i32 {
        20 * i32::from(ctx.level)
    }
}
