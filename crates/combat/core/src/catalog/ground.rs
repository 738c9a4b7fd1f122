use crate::catalog::ids;
use crate::env::{CombatEnv, DamageClass};
use crate::skill::{CastEffect, CombatContext, ModeFlags, SkillBehavior, SkillId, TargetKind};
use crate::state::{EntityId, Position, StatusChange, StatusKind, UnitSpec};

/// Rain of feathers over an area.
///
/// Ammunition is bound to the placed group, so the cast keeps it.
pub struct FeatherRain;

impl FeatherRain {
    pub const DURATION: u64 = 10;
}

impl SkillBehavior for FeatherRain {
    fn id(&self) -> SkillId {
        ids::FEATHER_RAIN
    }

    fn name(&self) -> &'static str {
        "feather_rain"
    }

    fn target_kind(&self) -> TargetKind {
        TargetKind::Ground
    }

    fn attack_type(&self) -> Option<DamageClass> {
        Some(DamageClass::Weapon)
    }

    fn range(&self, _level: u8) -> Option<u32> {
        Some(9)
    }

    fn splash_radius(&self, level: u8) -> u32 {
        1 + u32::from(level.saturating_sub(1)) / 2
    }

    fn calculate_skill_ratio(&self, ctx: &CombatContext, _env: &CombatEnv<'_>) -> i32 {
        20 * i32::from(ctx.level)
    }

    fn castend_pos2(
        &self,
        ctx: &mut CombatContext,
        _at: Position,
        _env: &mut CombatEnv<'_>,
    ) -> CastEffect {
        ctx.flags |= ModeFlags::RETAIN_AMMO;
        CastEffect::PlaceUnit(UnitSpec::new(self.splash_radius(ctx.level), Self::DURATION))
    }
}

/// Freezing mist that chills everyone inside it every other tick.
pub struct FrostMist;

impl SkillBehavior for FrostMist {
    fn id(&self) -> SkillId {
        ids::FROST_MIST
    }

    fn name(&self) -> &'static str {
        "frost_mist"
    }

    fn target_kind(&self) -> TargetKind {
        TargetKind::Ground
    }

    fn max_level(&self) -> u8 {
        5
    }

    fn range(&self, _level: u8) -> Option<u32> {
        Some(7)
    }

    fn splash_radius(&self, _level: u8) -> u32 {
        2
    }

    fn castend_pos2(
        &self,
        ctx: &mut CombatContext,
        _at: Position,
        _env: &mut CombatEnv<'_>,
    ) -> CastEffect {
        let duration = 4 + 2 * u64::from(ctx.level);
        CastEffect::PlaceUnit(
            UnitSpec::new(self.splash_radius(ctx.level), duration).with_interval(2),
        )
    }

    fn castend_nodamage_id(
        &self,
        ctx: &mut CombatContext,
        target: EntityId,
        env: &mut CombatEnv<'_>,
    ) -> CastEffect {
        let chill = StatusChange::new(StatusKind::Chilled, ctx.level, 3);
        if env.apply_status(target, chill) {
            CastEffect::Applied
        } else {
            CastEffect::NoOp
        }
    }
}
