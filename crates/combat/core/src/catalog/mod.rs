//! Built-in skill catalog.
//!
//! An illustrative set covering each shape the pipeline supports: plain
//! weapon and magic hits, status-conditioned ratios, ruleset-dependent
//! formulas, splash decorators, ground units, deferred impacts, random
//! forwarding, status toggles and status-backed stacking resources.
mod claw;
mod delayed;
mod element;
mod forward;
mod ground;
mod stacks;
mod status;

pub use claw::{RendingStrike, SavageBite, ThornLash, TwinFang};
pub use delayed::QuakeStomp;
pub use element::{FrostSpike, GaleCutter, HailShard, StormLance};
pub use forward::WildSurge;
pub use ground::{FeatherRain, FrostMist};
pub use stacks::{
    STORM_CHARGE_CAP, add_storm_charge, cycle_storm_charge, madness_stage, try_gain_madness,
};
pub use status::StatusSkill;

use crate::error::RegistryError;
use crate::skill::{RecursiveDamageSplash, SkillRegistryBuilder};
use crate::state::StatusKind;

/// Skill identifiers of the built-in catalog.
pub mod ids {
    use crate::skill::SkillId;

    pub const RENDING_STRIKE: SkillId = SkillId(5001);
    pub const TWIN_FANG: SkillId = SkillId(5002);
    pub const SAVAGE_BITE: SkillId = SkillId(5003);
    pub const GALE_CUTTER: SkillId = SkillId(5004);
    pub const FROST_SPIKE: SkillId = SkillId(5005);
    pub const HAIL_VOLLEY: SkillId = SkillId(5006);
    pub const STORM_LANCE: SkillId = SkillId(5007);
    pub const FEATHER_RAIN: SkillId = SkillId(5008);
    pub const FROST_MIST: SkillId = SkillId(5009);
    pub const QUAKE_STOMP: SkillId = SkillId(5010);
    pub const WILD_SURGE: SkillId = SkillId(5011);
    pub const PULSE_OF_FRENZY: SkillId = SkillId(5012);
    pub const FERAL_RAGE: SkillId = SkillId(5013);
    pub const IRON_HIDE: SkillId = SkillId(5014);
    pub const ROOT_SNARE: SkillId = SkillId(5015);
    pub const THORN_BURST: SkillId = SkillId(5016);
}

/// Registers every built-in skill.
pub fn register_all(builder: &mut SkillRegistryBuilder) -> Result<(), RegistryError> {
    builder
        .register(ids::RENDING_STRIKE, RendingStrike)?
        .register(ids::TWIN_FANG, TwinFang)?
        .register(ids::SAVAGE_BITE, SavageBite)?
        .register(ids::GALE_CUTTER, GaleCutter)?
        .register(ids::FROST_SPIKE, FrostSpike)?
        .register(
            ids::HAIL_VOLLEY,
            RecursiveDamageSplash::new(HailShard).with_hits(3),
        )?
        .register(ids::STORM_LANCE, StormLance)?
        .register(ids::FEATHER_RAIN, FeatherRain)?
        .register(ids::FROST_MIST, FrostMist)?
        .register(ids::QUAKE_STOMP, QuakeStomp)?
        .register(ids::WILD_SURGE, WildSurge)?
        .register(
            ids::PULSE_OF_FRENZY,
            StatusSkill::on_self(ids::PULSE_OF_FRENZY, "pulse_of_frenzy", StatusKind::Frenzy)
                .with_duration(20, 5)
                .with_max_level(5),
        )?
        .register(
            ids::FERAL_RAGE,
            StatusSkill::on_self(ids::FERAL_RAGE, "feral_rage", StatusKind::FeralRage)
                .with_duration(15, 3)
                .with_max_level(5),
        )?
        .register(
            ids::IRON_HIDE,
            StatusSkill::on_target(ids::IRON_HIDE, "iron_hide", StatusKind::IronHide)
                .with_duration(30, 0)
                .with_range(5),
        )?
        .register(
            ids::ROOT_SNARE,
            StatusSkill::on_target(ids::ROOT_SNARE, "root_snare", StatusKind::Rooted)
                .with_duration(3, 1)
                .with_chance(20, 10)
                .with_range(7)
                .with_max_level(5),
        )?
        .register(
            ids::THORN_BURST,
            RecursiveDamageSplash::new(ThornLash)
                .around_caster()
                .with_min_distance(ThornLash::DEAD_ZONE)
                .sparing_primary(),
        )?;
    Ok(())
}
