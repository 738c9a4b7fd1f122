//! Skill identity, per-cast context and the behavior interface.
mod attack;
mod behavior;
mod context;
mod id;
mod registry;
mod splash;

pub use attack::skill_attack;
pub use behavior::{AreaReport, CastEffect, Deferrals, SkillBehavior, TargetKind};
pub use context::{CombatContext, ModeFlags, Target};
pub use id::SkillId;
pub use registry::{RegisteredSkill, SkillLimit, SkillRegistry, SkillRegistryBuilder};
pub use splash::RecursiveDamageSplash;
