use crate::catalog::ids;
use crate::env::CombatEnv;
use crate::skill::{CastEffect, CombatContext, SkillBehavior, SkillId, TargetKind};
use crate::state::EntityId;

/// Disguised elemental strike: forwards to one of four skills at random.
pub struct WildSurge;

impl WildSurge {
    pub const CANDIDATES: [SkillId; 4] = [
        ids::GALE_CUTTER,
        ids::FROST_SPIKE,
        ids::STORM_LANCE,
        ids::TWIN_FANG,
    ];
}

impl SkillBehavior for WildSurge {
    fn id(&self) -> SkillId {
        ids::WILD_SURGE
    }

    fn name(&self) -> &'static str {
        "wild_surge"
    }

    fn target_kind(&self) -> TargetKind {
        TargetKind::EntityDamage
    }

    fn max_level(&self) -> u8 {
        5
    }

    fn range(&self, _level: u8) -> Option<u32> {
        Some(2)
    }

    fn castend_damage_id(
        &self,
        _ctx: &mut CombatContext,
        _target: EntityId,
        env: &mut CombatEnv<'_>,
    ) -> CastEffect {
        let pick = env.rng.below(Self::CANDIDATES.len() as u32) as usize;
        CastEffect::Forward(Self::CANDIDATES[pick])
    }
}
