use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::config::{CombatConfig, Ruleset};
use crate::dispatch::{CastOutcome, CastPhase, CastReport};
use crate::env::{AreaFilter, CombatEnv, CombatEvent, DeferredCast};
use crate::error::{ClassifiedError, DispatchError, TargetFault};
use crate::skill::{
    AreaReport, CastEffect, CombatContext, ModeFlags, RegisteredSkill, SkillBehavior, SkillId,
    SkillRegistry, Target, TargetKind,
};
use crate::state::{EntityId, Position, SkillUnitGroup, Tick, UnitSpec};

/// Drives one cast through the resolution pipeline against a registered skill.
///
/// The dispatcher holds no per-cast state. Every entity mutation goes
/// through the [`CombatEnv`] passed in by the host, so a single dispatcher is
/// shared by every cast of the process.
pub struct CombatDispatcher {
    registry: Arc<SkillRegistry>,
    config: CombatConfig,
}

/// Phase bookkeeping for one pipeline run.
struct Pipeline {
    skill: SkillId,
    phase: CastPhase,
}

impl Pipeline {
    fn start(skill: SkillId, phase: CastPhase) -> Self {
        Self { skill, phase }
    }

    fn advance(&mut self, next: CastPhase) {
        debug_assert!(
            self.phase.can_transition_to(next),
            "illegal cast transition {:?} -> {:?}",
            self.phase,
            next
        );
        trace!(
            target: "combat::dispatch",
            skill = %self.skill,
            from = self.phase.as_str(),
            to = next.as_str(),
            "phase"
        );
        self.phase = next;
    }
}

impl CombatDispatcher {
    pub fn new(registry: Arc<SkillRegistry>, config: CombatConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &SkillRegistry {
        &self.registry
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    /// Looks up the behavior bound to `skill`.
    pub fn resolve(&self, skill: SkillId) -> Result<&dyn SkillBehavior, DispatchError> {
        self.registry.resolve(skill).map(RegisteredSkill::behavior)
    }

    /// Fresh context for a new cast with the configured ruleset stamped in.
    pub fn context(&self, caster: EntityId, target: Target, level: u8, tick: Tick) -> CombatContext {
        let ctx = CombatContext::new(caster, target, level, tick);
        match self.config.ruleset {
            Ruleset::Renewal => ctx.with_flags(ModeFlags::RENEWAL),
            Ruleset::Classic => ctx,
        }
    }

    /// Runs a cast from the top of the pipeline.
    ///
    /// Never fails: every validation problem comes back as
    /// [`CastOutcome::Rejected`] with no entity mutated.
    pub fn dispatch(
        &self,
        skill: SkillId,
        mut ctx: CombatContext,
        env: &mut CombatEnv<'_>,
    ) -> CastOutcome {
        let mut pipeline = Pipeline::start(skill, CastPhase::Requested);

        if ctx.depth > self.config.max_chain_depth {
            let err = DispatchError::ChainTooDeep {
                skill,
                depth: ctx.depth,
            };
            return self.reject(&mut pipeline, &ctx, err, env);
        }

        let entry = match self.registry.resolve(skill) {
            Ok(entry) => entry,
            Err(err) => return self.reject(&mut pipeline, &ctx, err, env),
        };
        let behavior = entry.behavior();

        if let Err(err) = self.validate(skill, entry, &ctx, env) {
            return self.reject(&mut pipeline, &ctx, err, env);
        }
        pipeline.advance(CastPhase::Validated);

        env.emit(CombatEvent::CastStarted {
            skill,
            caster: ctx.caster,
            level: ctx.level,
            tick: ctx.tick,
        });

        self.resolve_ratio(behavior, &mut ctx, env);
        pipeline.advance(CastPhase::RatioResolved);

        self.execute(&mut pipeline, behavior, ctx, env)
    }

    /// Resumes a deferred cast at the execution stage.
    ///
    /// The stored context is used as-is apart from its tick, which moves to
    /// the firing tick. If the caster or target left the simulation while the
    /// cast was suspended the result is `Rejected` and nothing is applied.
    pub fn resume(&self, cast: DeferredCast, env: &mut CombatEnv<'_>) -> CastOutcome {
        let DeferredCast {
            skill,
            mut context,
            fire_at,
        } = cast;
        context.tick = fire_at;
        let mut pipeline = Pipeline::start(skill, CastPhase::Deferred);

        let entry = match self.registry.resolve(skill) {
            Ok(entry) => entry,
            Err(err) => return self.reject(&mut pipeline, &context, err, env),
        };

        let target_gone = context
            .target_entity()
            .is_some_and(|target| !env.host.is_alive(target));
        if target_gone || !env.host.is_alive(context.caster) {
            let err = DispatchError::SuspensionInvalidated { skill };
            return self.reject(&mut pipeline, &context, err, env);
        }

        if context.depth > self.config.max_chain_depth {
            let err = DispatchError::ChainTooDeep {
                skill,
                depth: context.depth,
            };
            return self.reject(&mut pipeline, &context, err, env);
        }

        self.execute(&mut pipeline, entry.behavior(), context, env)
    }

    /// Re-resolves every interval unit group due at `now`.
    ///
    /// Returns the number of groups that pulsed.
    pub fn pulse_units(&self, now: Tick, env: &mut CombatEnv<'_>) -> usize {
        let due = env.units.take_due_pulses(now);
        let mut pulsed = 0;

        for group in due {
            let Ok(entry) = self.registry.resolve(group.skill) else {
                continue;
            };
            if !env.host.is_alive(group.source) {
                continue;
            }
            let behavior = entry.behavior();
            let mut ctx = self
                .context(group.source, Target::Ground(group.origin), group.level, now)
                .with_flags(group.flags);
            self.resolve_ratio(behavior, &mut ctx, env);

            let report = self.resolve_area(behavior, &group, &ctx, env);
            trace!(
                target: "combat::dispatch",
                group = %group.id,
                skill = %group.skill,
                targets = report.targets,
                landed = report.landed,
                "unit pulse"
            );
            pulsed += 1;
        }
        pulsed
    }

    /// Removes unit groups whose lifetime ended and reports them.
    pub fn expire_units(&self, now: Tick, env: &mut CombatEnv<'_>) -> Vec<SkillUnitGroup> {
        let expired = env.units.expire(now);
        for group in &expired {
            env.emit(CombatEvent::UnitExpired {
                group: group.id,
                skill: group.skill,
                evicted: false,
            });
        }
        expired
    }

    fn validate(
        &self,
        skill: SkillId,
        entry: &RegisteredSkill,
        ctx: &CombatContext,
        env: &CombatEnv<'_>,
    ) -> Result<(), DispatchError> {
        let max = entry.max_level();
        if ctx.level == 0 || ctx.level > max {
            return Err(DispatchError::InvalidLevel {
                skill,
                level: ctx.level,
                max,
            });
        }

        let invalid = |reason| DispatchError::InvalidTarget { skill, reason };

        if !env.host.is_alive(ctx.caster) {
            return Err(invalid(TargetFault::CasterGone));
        }

        let behavior = entry.behavior();
        let aim = match (behavior.target_kind(), ctx.target) {
            (TargetKind::Ground, Target::Ground(at)) => Some(at),
            (TargetKind::EntityDamage | TargetKind::EntityNoDamage, Target::Entity(target)) => {
                if !env.host.is_alive(target) {
                    return Err(invalid(TargetFault::TargetGone));
                }
                env.host.position(target)
            }
            _ => return Err(invalid(TargetFault::WrongTargetKind)),
        };

        if let (Some(range), Some(aim), Some(from)) =
            (behavior.range(ctx.level), aim, env.host.position(ctx.caster))
            && from.distance(aim) > range
        {
            return Err(invalid(TargetFault::OutOfRange));
        }

        Ok(())
    }

    /// Applies the hit-rate and ratio steps for skills that deal damage.
    fn resolve_ratio(
        &self,
        behavior: &dyn SkillBehavior,
        ctx: &mut CombatContext,
        env: &CombatEnv<'_>,
    ) {
        let damaging =
            behavior.target_kind() == TargetKind::EntityDamage || behavior.attack_type().is_some();
        if !damaging {
            return;
        }

        ctx.hit_rate = behavior
            .modify_hit_rate(ctx.hit_rate, ctx.caster, ctx.target_entity(), ctx.level)
            .max(0);
        ctx.accumulated_ratio += behavior.calculate_skill_ratio(ctx, env);
    }

    fn execute(
        &self,
        pipeline: &mut Pipeline,
        behavior: &dyn SkillBehavior,
        mut ctx: CombatContext,
        env: &mut CombatEnv<'_>,
    ) -> CastOutcome {
        let skill = pipeline.skill;
        let effect = match (behavior.target_kind(), ctx.target) {
            (TargetKind::EntityDamage, Target::Entity(target)) => {
                behavior.castend_damage_id(&mut ctx, target, env)
            }
            (TargetKind::EntityNoDamage, Target::Entity(target)) => {
                behavior.castend_nodamage_id(&mut ctx, target, env)
            }
            (TargetKind::Ground, Target::Ground(at)) => behavior.castend_pos2(&mut ctx, at, env),
            // Validation pairs target kind and target shape before any context
            // reaches this point, deferred snapshots included.
            _ => CastEffect::NoOp,
        };
        pipeline.advance(CastPhase::Executed);

        match effect {
            CastEffect::PlaceUnit(spec) => {
                let effect = match ctx.ground() {
                    Some(at) => self.place_unit(skill, behavior, &ctx, at, spec, env),
                    None => CastEffect::NoOp,
                };
                self.complete(pipeline, &ctx, effect)
            }
            CastEffect::Defer(delays) => {
                let mut snapshot = ctx;
                snapshot.flags |= ModeFlags::RESUMED;
                snapshot.depth = ctx.depth.saturating_add(1);

                for &delay in &delays {
                    let fire_at = ctx.tick + delay;
                    env.host.schedule(
                        delay,
                        DeferredCast {
                            skill,
                            context: snapshot,
                            fire_at,
                        },
                    );
                    env.emit(CombatEvent::CastDeferred {
                        skill,
                        caster: ctx.caster,
                        fire_at,
                    });
                }
                debug!(
                    target: "combat::dispatch",
                    skill = %skill,
                    caster = %ctx.caster,
                    deferrals = delays.len(),
                    "cast deferred"
                );

                pipeline.advance(CastPhase::Deferred);
                let deferrals = delays.len();
                CastOutcome::Deferred(CastReport {
                    deferrals,
                    ..self.report(skill, &ctx, CastEffect::Defer(delays))
                })
            }
            CastEffect::Forward(sub) => {
                pipeline.advance(CastPhase::Completed);
                self.forward(skill, sub, &ctx, env)
            }
            other => self.complete(pipeline, &ctx, other),
        }
    }

    /// Re-enters the pipeline for `sub` with the caller's level, tick and flags.
    fn forward(
        &self,
        origin: SkillId,
        sub: SkillId,
        ctx: &CombatContext,
        env: &mut CombatEnv<'_>,
    ) -> CastOutcome {
        let mut next = CombatContext::new(ctx.caster, ctx.target, ctx.level, ctx.tick);
        next.flags = ctx.flags | ModeFlags::FORWARDED;
        next.depth = ctx.depth.saturating_add(1);

        debug!(
            target: "combat::dispatch",
            from = %origin,
            to = %sub,
            caster = %ctx.caster,
            depth = next.depth,
            "cast forwarded"
        );
        env.emit(CombatEvent::Forwarded {
            from: origin,
            to: sub,
            caster: ctx.caster,
        });

        self.dispatch(sub, next, env).forwarded_from(origin)
    }

    fn place_unit(
        &self,
        skill: SkillId,
        behavior: &dyn SkillBehavior,
        ctx: &CombatContext,
        at: Position,
        spec: UnitSpec,
        env: &mut CombatEnv<'_>,
    ) -> CastEffect {
        let placement = env.units.place(
            ctx.caster,
            skill,
            ctx.level,
            ctx.flags.difference(ModeFlags::SPLASH_CHILD),
            at,
            spec,
            ctx.tick,
            self.config.max_units_per_source,
        );

        if let Some(evicted) = placement.evicted {
            warn!(
                target: "combat::dispatch",
                source = %ctx.caster,
                group = %evicted.id,
                cap = self.config.max_units_per_source,
                "unit group cap reached, evicting oldest"
            );
            env.emit(CombatEvent::UnitExpired {
                group: evicted.id,
                skill: evicted.skill,
                evicted: true,
            });
        }

        let group = placement.group;
        env.emit(CombatEvent::UnitPlaced { group });
        let report = self.resolve_area(behavior, &group, ctx, env);

        CastEffect::Unit {
            group: group.id,
            report,
        }
    }

    /// Runs the damage or status entry once for every entity in the group.
    ///
    /// Members are sorted by id so identical snapshots resolve identically.
    fn resolve_area(
        &self,
        behavior: &dyn SkillBehavior,
        group: &SkillUnitGroup,
        ctx: &CombatContext,
        env: &mut CombatEnv<'_>,
    ) -> AreaReport {
        let filter = AreaFilter::enemies_of(ctx.caster).with_relation(behavior.area_relation());
        let mut members: Vec<EntityId> = env.host.find(group.region(), filter).collect();
        members.sort_unstable();
        members.dedup();

        let mut report = AreaReport {
            targets: members.len() as u32,
            landed: 0,
        };
        for member in members {
            if !env.host.is_alive(member) {
                continue;
            }
            let mut child = ctx.child_for(member, ModeFlags::SPLASH_CHILD);
            let effect = if behavior.attack_type().is_some() {
                behavior.castend_damage_id(&mut child, member, env)
            } else {
                behavior.castend_nodamage_id(&mut child, member, env)
            };
            if effect.code() != 0 {
                report.landed += 1;
            }
        }
        report
    }

    fn complete(
        &self,
        pipeline: &mut Pipeline,
        ctx: &CombatContext,
        effect: CastEffect,
    ) -> CastOutcome {
        pipeline.advance(CastPhase::Completed);
        CastOutcome::Completed(self.report(pipeline.skill, ctx, effect))
    }

    fn report(&self, skill: SkillId, ctx: &CombatContext, effect: CastEffect) -> CastReport {
        CastReport {
            skill,
            caster: ctx.caster,
            level: ctx.level,
            tick: ctx.tick,
            flags: ctx.flags,
            ratio: ctx.accumulated_ratio,
            hit_rate: ctx.hit_rate,
            effect,
            deferrals: 0,
            via: None,
        }
    }

    fn reject(
        &self,
        pipeline: &mut Pipeline,
        ctx: &CombatContext,
        error: DispatchError,
        env: &mut CombatEnv<'_>,
    ) -> CastOutcome {
        let phase = pipeline.phase;
        match error {
            DispatchError::ChainTooDeep { .. } => warn!(
                target: "combat::dispatch",
                skill = %pipeline.skill,
                caster = %ctx.caster,
                phase = phase.as_str(),
                code = error.error_code(),
                error = %error,
                "cast rejected"
            ),
            _ => debug!(
                target: "combat::dispatch",
                skill = %pipeline.skill,
                caster = %ctx.caster,
                phase = phase.as_str(),
                code = error.error_code(),
                error = %error,
                "cast rejected"
            ),
        }
        pipeline.advance(CastPhase::Rejected);

        env.emit(CombatEvent::CastRejected {
            skill: pipeline.skill,
            caster: ctx.caster,
            phase,
            error,
        });

        CastOutcome::Rejected {
            skill: pipeline.skill,
            phase,
            error,
        }
    }
}
