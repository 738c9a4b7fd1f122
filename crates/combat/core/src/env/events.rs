use crate::dispatch::CastPhase;
use crate::env::AttackOutcome;
use crate::error::DispatchError;
use crate::skill::SkillId;
use crate::state::{EntityId, SkillUnitGroup, StatusKind, Tick, UnitGroupId};

/// Follow-up notifications a skill may trigger beyond damage and statuses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NoticeKind {
    /// A charge counter reached its cap and turned into the charged state.
    ChargeFull,
    /// A charged state was consumed by a cast.
    ChargeSpent,
    StageRaised { stage: u8 },
}

/// Observable effect of a cast, published through [`EventSink`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatEvent {
    CastStarted {
        skill: SkillId,
        caster: EntityId,
        level: u8,
        tick: Tick,
    },
    CastRejected {
        skill: SkillId,
        caster: EntityId,
        phase: CastPhase,
        error: DispatchError,
    },
    AttackResolved {
        skill: SkillId,
        caster: EntityId,
        target: EntityId,
        outcome: AttackOutcome,
    },
    StatusApplied {
        target: EntityId,
        kind: StatusKind,
        level: u8,
        expires_at: Tick,
    },
    StatusEnded {
        target: EntityId,
        kind: StatusKind,
    },
    UnitPlaced {
        group: SkillUnitGroup,
    },
    UnitExpired {
        group: UnitGroupId,
        skill: SkillId,
        evicted: bool,
    },
    CastDeferred {
        skill: SkillId,
        caster: EntityId,
        fire_at: Tick,
    },
    Forwarded {
        from: SkillId,
        to: SkillId,
        caster: EntityId,
    },
    Notice {
        skill: SkillId,
        entity: EntityId,
        kind: NoticeKind,
    },
    EntityDefeated {
        entity: EntityId,
        by: EntityId,
    },
}

/// Receives combat events for the host to buffer or publish.
pub trait EventSink {
    fn emit(&mut self, event: CombatEvent);
}
