//! Collaborator interfaces the dispatcher and skills call out to.
//!
//! The host world implements these traits; the core never owns entity
//! state. [`CombatEnv`] bundles the host with the unit-group store and the
//! injected random source so skills receive one explicit handle.
mod area;
mod attack;
mod events;
mod rng;
mod status;
mod timer;
mod world;

pub use area::{AreaFilter, AreaQuery, RelationFilter};
pub use attack::{AttackOutcome, AttackRequest, AttackResolver, AttackResult, DamageClass};
pub use events::{CombatEvent, EventSink, NoticeKind};
pub use rng::{PcgRandom, RandomSource, compute_seed};
pub use status::StatusEffectController;
pub use timer::{DeferredCast, TimerScheduler};
pub use world::{Relation, WorldView};

use crate::state::{EntityId, StatusChange, StatusEntry, StatusKind, UnitGroups};

/// Everything a host must provide to run casts.
pub trait CombatHost:
    WorldView + AreaQuery + StatusEffectController + TimerScheduler + AttackResolver + EventSink
{
}

impl<T> CombatHost for T where
    T: WorldView + AreaQuery + StatusEffectController + TimerScheduler + AttackResolver + EventSink
{
}

/// Mutable view handed to the dispatcher and every skill step.
pub struct CombatEnv<'a> {
    pub host: &'a mut dyn CombatHost,
    pub units: &'a mut UnitGroups,
    pub rng: &'a mut dyn RandomSource,
}

impl<'a> CombatEnv<'a> {
    pub fn new(
        host: &'a mut dyn CombatHost,
        units: &'a mut UnitGroups,
        rng: &'a mut dyn RandomSource,
    ) -> Self {
        Self { host, units, rng }
    }

    pub fn status(&self, entity: EntityId, kind: StatusKind) -> Option<StatusEntry> {
        self.host.query(entity, kind)
    }

    pub fn has_status(&self, entity: EntityId, kind: StatusKind) -> bool {
        self.host.has(entity, kind)
    }

    pub fn apply_status(&mut self, target: EntityId, change: StatusChange) -> bool {
        self.host.apply(target, change)
    }

    pub fn end_status(&mut self, target: EntityId, kind: StatusKind) -> bool {
        self.host.end(target, kind)
    }

    pub fn emit(&mut self, event: CombatEvent) {
        self.host.emit(event);
    }
}
