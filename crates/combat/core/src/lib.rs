//! Deterministic skill dispatch shared by combat hosts.
//!
//! `combat-core` defines how a cast is resolved: skills implement
//! [`SkillBehavior`], are bound to ids in a [`SkillRegistry`] at startup, and
//! run through the [`CombatDispatcher`] pipeline. Entity state lives in the
//! host, which plugs in through the collaborator traits of [`env`]. The core
//! performs no I/O and draws randomness only from the injected
//! [`RandomSource`].
pub mod catalog;
pub mod config;
pub mod dispatch;
pub mod env;
pub mod error;
pub mod skill;
pub mod state;

pub use config::{CombatConfig, Ruleset};
pub use dispatch::{CastOutcome, CastPhase, CastReport, CombatDispatcher};
pub use env::{
    AreaFilter, AreaQuery, AttackOutcome, AttackRequest, AttackResolver, AttackResult,
    CombatEnv, CombatEvent, CombatHost, DamageClass, DeferredCast, EventSink, NoticeKind,
    PcgRandom, RandomSource, Relation, RelationFilter, StatusEffectController, TimerScheduler,
    WorldView, compute_seed,
};
pub use error::{ClassifiedError, DispatchError, ErrorSeverity, RegistryError, TargetFault};
pub use skill::{
    AreaReport, CastEffect, CombatContext, ModeFlags, RecursiveDamageSplash, RegisteredSkill,
    SkillBehavior, SkillId, SkillLimit, SkillRegistry, SkillRegistryBuilder, Target, TargetKind,
    skill_attack,
};
pub use state::{
    EntityId, Placement, Position, Region, SkillUnitGroup, StatusChange, StatusEffects,
    StatusEntry, StatusKind, Tick, UnitGroupId, UnitGroups, UnitSpec,
};

/// Builds a registry holding the built-in catalog with `limits` applied.
pub fn builtin_registry<'a>(
    limits: impl IntoIterator<Item = &'a SkillLimit>,
) -> Result<SkillRegistry, RegistryError> {
    let mut builder = SkillRegistry::builder();
    catalog::register_all(&mut builder)?;
    builder.apply_limits(limits)?;
    Ok(builder.build())
}
