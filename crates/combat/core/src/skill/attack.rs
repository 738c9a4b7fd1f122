use tracing::trace;

use crate::env::{AttackRequest, CombatEnv, CombatEvent, DamageClass};
use crate::skill::{CastEffect, CombatContext, SkillBehavior};
use crate::state::EntityId;

/// Shared attack routine behind every damaging skill.
///
/// Sends the accumulated ratio and hit rate to the host's damage engine and
/// runs `apply_additional_effects` only when the hit landed.
pub fn skill_attack<B>(
    behavior: &B,
    class: DamageClass,
    ctx: &CombatContext,
    target: EntityId,
    env: &mut CombatEnv<'_>,
) -> CastEffect
where
    B: SkillBehavior + ?Sized,
{
    let request = AttackRequest {
        class,
        caster: ctx.caster,
        source: ctx.caster,
        target,
        skill: behavior.id(),
        level: ctx.level,
        tick: ctx.tick,
        flags: ctx.flags,
        ratio: ctx.accumulated_ratio,
        hit_rate: ctx.hit_rate,
    };
    let outcome = env.host.resolve_attack(&request);

    trace!(
        target: "combat::dispatch",
        skill = %request.skill,
        caster = %ctx.caster,
        defender = %target,
        ratio = request.ratio,
        result = %outcome.result,
        damage = outcome.damage,
        "attack resolved"
    );

    env.emit(CombatEvent::AttackResolved {
        skill: request.skill,
        caster: ctx.caster,
        target,
        outcome,
    });

    if outcome.landed() {
        behavior.apply_additional_effects(ctx, target, &outcome, env);
    }

    CastEffect::Attack(outcome)
}
