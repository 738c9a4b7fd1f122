use crate::skill::{CombatContext, SkillId};
use crate::state::Tick;

/// Snapshot of a suspended cast waiting in the host's timer queue.
///
/// This is the data form of "a callback closing over the context": the host
/// hands it back to [`crate::dispatch::CombatDispatcher::resume`] when
/// `fire_at` is reached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeferredCast {
    pub skill: SkillId,
    pub context: CombatContext,
    pub fire_at: Tick,
}

/// Schedules deferred casts. Fire-and-forget, at most once per item.
pub trait TimerScheduler {
    fn schedule(&mut self, delay: u64, cast: DeferredCast);
}
