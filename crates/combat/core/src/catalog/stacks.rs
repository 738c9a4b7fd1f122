//! Resources kept in status values instead of dedicated entity fields.
//!
//! Storm charge: each storm cast adds a charge stored in `values[0]` of
//! [`StatusKind::StormCharge`]. Passing [`STORM_CHARGE_CAP`] ends the counter
//! and starts [`StatusKind::StormChargeMax`]; the next storm cast spends it.
//!
//! Madness: while [`StatusKind::Frenzy`] is active, landed hits may raise the
//! caster through three stages, each a separate status kind.

use crate::env::{CombatEnv, CombatEvent, NoticeKind};
use crate::skill::SkillId;
use crate::state::{EntityId, StatusChange, StatusKind};

pub const STORM_CHARGE_CAP: i32 = 5;
const STORM_CHARGE_DURATION: u64 = 60;
const MADNESS_DURATION: u64 = 30;

const MADNESS_STAGES: [StatusKind; 3] = [
    StatusKind::Madness1,
    StatusKind::Madness2,
    StatusKind::Madness3,
];

/// Current madness stage of `entity`, 0 when none is active.
pub fn madness_stage(env: &CombatEnv<'_>, entity: EntityId) -> u8 {
    MADNESS_STAGES
        .iter()
        .rposition(|&kind| env.has_status(entity, kind))
        .map_or(0, |index| index as u8 + 1)
}

/// Rolls for a madness stage gain. Returns the new stage when it rose or
/// refreshed.
///
/// The chance is `20 + 10 * (frenzy_level - 1)` percent.
pub fn try_gain_madness(env: &mut CombatEnv<'_>, skill: SkillId, entity: EntityId) -> Option<u8> {
    let frenzy = env.status(entity, StatusKind::Frenzy)?;
    let chance = 20 + 10 * u32::from(frenzy.level.saturating_sub(1));
    if !env.rng.chance(chance) {
        return None;
    }

    let current = madness_stage(env, entity);
    let next = (current + 1).min(3);
    if current > 0 && current != next {
        env.end_status(entity, MADNESS_STAGES[usize::from(current - 1)]);
    }

    let kind = MADNESS_STAGES[usize::from(next - 1)];
    if !env.apply_status(entity, StatusChange::new(kind, 1, MADNESS_DURATION)) {
        return None;
    }
    if next != current {
        env.emit(CombatEvent::Notice {
            skill,
            entity,
            kind: NoticeKind::StageRaised { stage: next },
        });
    }
    Some(next)
}

/// Adds `count` storm charges, converting to the charged state past the cap.
///
/// Does nothing while the charged state is already active.
pub fn add_storm_charge(env: &mut CombatEnv<'_>, skill: SkillId, entity: EntityId, count: i32) {
    if count <= 0 || env.has_status(entity, StatusKind::StormChargeMax) {
        return;
    }

    let current = env
        .status(entity, StatusKind::StormCharge)
        .map_or(0, |entry| entry.values[0]);
    let next = current + count;

    if next > STORM_CHARGE_CAP {
        env.end_status(entity, StatusKind::StormCharge);
        env.apply_status(
            entity,
            StatusChange::new(StatusKind::StormChargeMax, 1, STORM_CHARGE_DURATION),
        );
        env.emit(CombatEvent::Notice {
            skill,
            entity,
            kind: NoticeKind::ChargeFull,
        });
        return;
    }

    env.apply_status(
        entity,
        StatusChange::new(StatusKind::StormCharge, 1, STORM_CHARGE_DURATION)
            .with_values([next, 0, 0]),
    );
}

/// Spends the charged state if present, otherwise gains one charge.
///
/// Returns true when a charged state was spent.
pub fn cycle_storm_charge(env: &mut CombatEnv<'_>, skill: SkillId, entity: EntityId) -> bool {
    if env.end_status(entity, StatusKind::StormChargeMax) {
        env.emit(CombatEvent::Notice {
            skill,
            entity,
            kind: NoticeKind::ChargeSpent,
        });
        return true;
    }
    add_storm_charge(env, skill, entity, 1);
    false
}
