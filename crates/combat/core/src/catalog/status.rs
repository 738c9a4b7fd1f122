use crate::env::CombatEnv;
use crate::skill::{CastEffect, CombatContext, SkillBehavior, SkillId, TargetKind};
use crate::state::{EntityId, StatusChange, StatusKind};

/// Reusable behavior for skills whose only effect is starting a status.
///
/// Duration is `base + per_level * level` ticks; chance is
/// `base + per_level * (level - 1)` percent, 100 by default.
#[derive(Clone, Debug)]
pub struct StatusSkill {
    id: SkillId,
    name: &'static str,
    kind: StatusKind,
    on_self: bool,
    duration: (u64, u64),
    chance: (u32, u32),
    range: Option<u32>,
    max_level: u8,
}

impl StatusSkill {
    fn new(id: SkillId, name: &'static str, kind: StatusKind, on_self: bool) -> Self {
        Self {
            id,
            name,
            kind,
            on_self,
            duration: (10, 0),
            chance: (100, 0),
            range: None,
            max_level: 10,
        }
    }

    /// Status lands on the caster regardless of the chosen target.
    pub fn on_self(id: SkillId, name: &'static str, kind: StatusKind) -> Self {
        Self::new(id, name, kind, true)
    }

    pub fn on_target(id: SkillId, name: &'static str, kind: StatusKind) -> Self {
        Self::new(id, name, kind, false)
    }

    pub fn with_duration(mut self, base: u64, per_level: u64) -> Self {
        self.duration = (base, per_level);
        self
    }

    pub fn with_chance(mut self, base: u32, per_level: u32) -> Self {
        self.chance = (base, per_level);
        self
    }

    pub fn with_range(mut self, range: u32) -> Self {
        self.range = Some(range);
        self
    }

    pub fn with_max_level(mut self, max_level: u8) -> Self {
        self.max_level = max_level;
        self
    }

    pub fn change(&self, level: u8) -> StatusChange {
        let (base, per_level) = self.duration;
        let (chance, chance_per_level) = self.chance;
        StatusChange::new(self.kind, level, base + per_level * u64::from(level))
            .with_chance(chance + chance_per_level * u32::from(level.saturating_sub(1)))
    }
}

impl SkillBehavior for StatusSkill {
    fn id(&self) -> SkillId {
        self.id
    }

    fn name(&self) -> &'static str {
        self.name
    }

    fn target_kind(&self) -> TargetKind {
        TargetKind::EntityNoDamage
    }

    fn max_level(&self) -> u8 {
        self.max_level
    }

    fn range(&self, _level: u8) -> Option<u32> {
        self.range
    }

    fn castend_nodamage_id(
        &self,
        ctx: &mut CombatContext,
        target: EntityId,
        env: &mut CombatEnv<'_>,
    ) -> CastEffect {
        let recipient = if self.on_self { ctx.caster } else { target };
        if env.apply_status(recipient, self.change(ctx.level)) {
            CastEffect::Applied
        } else {
            CastEffect::NoOp
        }
    }
}
