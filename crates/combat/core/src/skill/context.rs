//! Per-cast value threaded through the dispatch pipeline.

use bitflags::bitflags;

use crate::state::{EntityId, Position, Tick};

bitflags! {
    /// Mode switches carried by a cast and visible to every stage.
    ///
    /// The low bits steer the pipeline itself; the `0x1000..=0x8000` range
    /// mirrors how a client would be told to render the cast.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ModeFlags: u32 {
        /// Ammunition is tied to a placed unit group, not consumed on cast.
        const RETAIN_AMMO  = 1 << 0;
        /// This invocation is one sub-hit of an area or splash resolution.
        const SPLASH_CHILD = 1 << 1;
        /// Resumed from a deferred snapshot.
        const RESUMED      = 1 << 2;
        /// Entered through another skill's forward.
        const FORWARDED    = 1 << 3;

        const HIDE_LEVEL   = 0x1000;
        const ANIMATION    = 0x2000;
        const SPLASH       = 0x4000;
        const PREAMBLE     = 0x8000;

        /// Renewal balance formulas are active for this cast.
        const RENEWAL      = 0x1_0000;
    }
}

/// Where a cast is aimed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Target {
    Entity(EntityId),
    Ground(Position),
}

/// Everything a skill may read about the cast in flight.
///
/// Created per cast attempt. When a cast is deferred a copy is stored in the
/// timer queue until it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatContext {
    pub caster: EntityId,
    pub target: Target,
    pub level: u8,
    pub tick: Tick,
    pub flags: ModeFlags,
    /// Damage multiplier in percentage points, seeded at [`Self::BASE_SKILL_RATIO`].
    pub accumulated_ratio: i32,
    /// Accuracy percentage, seeded at [`Self::BASE_HIT_RATE`] and never below 0.
    pub hit_rate: i32,
    /// Number of forwards or resumptions between this cast and the command.
    pub depth: u8,
}

impl CombatContext {
    /// Baseline damage ratio every skill ratio delta is added to.
    pub const BASE_SKILL_RATIO: i32 = 100;
    /// Baseline accuracy before skill adjustments.
    pub const BASE_HIT_RATE: i32 = 100;

    pub fn new(caster: EntityId, target: Target, level: u8, tick: Tick) -> Self {
        Self {
            caster,
            target,
            level,
            tick,
            flags: ModeFlags::empty(),
            accumulated_ratio: Self::BASE_SKILL_RATIO,
            hit_rate: Self::BASE_HIT_RATE,
            depth: 0,
        }
    }

    pub fn with_flags(mut self, flags: ModeFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Delta that turns the baseline into an absolute `total` ratio.
    ///
    /// Formulas that define the whole multiplier ("the skill deals 350%")
    /// return `replace_baseline(350)` instead of a bare offset.
    pub const fn replace_baseline(total: i32) -> i32 {
        total - Self::BASE_SKILL_RATIO
    }

    pub fn target_entity(&self) -> Option<EntityId> {
        match self.target {
            Target::Entity(id) => Some(id),
            Target::Ground(_) => None,
        }
    }

    pub fn ground(&self) -> Option<Position> {
        match self.target {
            Target::Ground(at) => Some(at),
            Target::Entity(_) => None,
        }
    }

    pub fn is_renewal(&self) -> bool {
        self.flags.contains(ModeFlags::RENEWAL)
    }

    /// Ratio delta accumulated so far relative to the baseline.
    pub fn ratio_delta(&self) -> i32 {
        self.accumulated_ratio - Self::BASE_SKILL_RATIO
    }

    /// Copy of this context aimed at one area member.
    pub fn child_for(&self, target: EntityId, extra: ModeFlags) -> Self {
        let mut child = *self;
        child.target = Target::Entity(target);
        child.flags |= extra;
        child
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_context_starts_at_baselines() {
        let ctx = CombatContext::new(EntityId(1), Target::Entity(EntityId(2)), 3, Tick(7));
        assert_eq!(ctx.accumulated_ratio, 100);
        assert_eq!(ctx.hit_rate, 100);
        assert_eq!(ctx.ratio_delta(), 0);
        assert_eq!(ctx.target_entity(), Some(EntityId(2)));
        assert_eq!(ctx.ground(), None);
    }

    #[test]
    fn replace_baseline_is_explicit_delta() {
        assert_eq!(CombatContext::replace_baseline(350), 250);
        assert_eq!(CombatContext::replace_baseline(40), -60);
    }

    #[test]
    fn retain_ammo_is_bit_one() {
        assert_eq!(ModeFlags::RETAIN_AMMO.bits(), 0x1);
        assert_eq!(ModeFlags::PREAMBLE.bits(), 0x8000);
    }

    #[test]
    fn child_keeps_origin_flags() {
        let ctx = CombatContext::new(EntityId(1), Target::Ground(Position::new(3, 3)), 2, Tick(0))
            .with_flags(ModeFlags::RETAIN_AMMO | ModeFlags::RENEWAL);
        let child = ctx.child_for(EntityId(9), ModeFlags::SPLASH_CHILD);
        assert!(child.flags.contains(ModeFlags::RETAIN_AMMO | ModeFlags::RENEWAL));
        assert!(child.flags.contains(ModeFlags::SPLASH_CHILD));
        assert_eq!(child.target, Target::Entity(EntityId(9)));
        assert!(child.is_renewal());
    }
}
