//! Synchronous tick loop around the dispatcher.
//!
//! [`Simulation`] is the single-threaded owner of all mutable combat state.
//! Casts run in submission order; [`Simulation::advance`] moves time and
//! performs, per tick and in this order: deferred-cast resumption, unit
//! pulses, unit expiry, status expiry.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use combat_content::ScriptedCast;
use combat_core::{
    CastOutcome, CombatDispatcher, CombatEnv, CombatEvent, DispatchError, EntityId, EventSink,
    PcgRandom, SkillId, SkillUnitGroup, Target, Tick, UnitGroups, compute_seed,
};

use crate::api::{Result, RuntimeError};
use crate::events::TickReport;
use crate::world::{Actor, ActorState, World};

/// Stream discriminator for the dispatch random source.
const DISPATCH_STREAM: u64 = 0;

/// A cast command as issued by an actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastRequest {
    pub caster: EntityId,
    pub skill: SkillId,
    pub level: u8,
    pub target: Target,
}

impl CastRequest {
    pub fn new(caster: EntityId, skill: SkillId, level: u8, target: Target) -> Self {
        Self {
            caster,
            skill,
            level,
            target,
        }
    }
}

impl From<&ScriptedCast> for CastRequest {
    fn from(cast: &ScriptedCast) -> Self {
        Self::new(EntityId(cast.caster), cast.skill, cast.level, cast.target.into())
    }
}

/// Read-only copy of the simulation for clients.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub tick: Tick,
    pub actors: Vec<ActorState>,
    pub units: Vec<SkillUnitGroup>,
    pub pending_timers: usize,
}

pub struct Simulation {
    world: World,
    units: UnitGroups,
    rng: PcgRandom,
    dispatcher: Arc<CombatDispatcher>,
}

impl Simulation {
    /// Creates an empty simulation starting at `start`.
    ///
    /// All random streams derive from the dispatcher's configured seed.
    pub fn new(dispatcher: Arc<CombatDispatcher>, start: Tick) -> Self {
        let seed = dispatcher.config().rng_seed;
        Self {
            world: World::new(seed, start),
            units: UnitGroups::new(),
            rng: PcgRandom::new(compute_seed(seed, DISPATCH_STREAM, 0)),
            dispatcher,
        }
    }

    pub fn dispatcher(&self) -> &CombatDispatcher {
        &self.dispatcher
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn units(&self) -> &UnitGroups {
        &self.units
    }

    pub fn now(&self) -> Tick {
        self.world.now()
    }

    pub fn spawn(&mut self, actor: Actor) -> Result<()> {
        let id = actor.id;
        if self.world.spawn(actor) {
            Ok(())
        } else {
            Err(RuntimeError::DuplicateActor { id })
        }
    }

    /// Runs one cast to completion (or deferral) at the current tick.
    pub fn cast(&mut self, request: CastRequest) -> CastOutcome {
        let ctx = self.dispatcher.context(
            request.caster,
            request.target,
            request.level,
            self.world.now(),
        );
        let dispatcher = Arc::clone(&self.dispatcher);
        let outcome = {
            let mut env = CombatEnv::new(&mut self.world, &mut self.units, &mut self.rng);
            dispatcher.dispatch(request.skill, ctx, &mut env)
        };
        trace!(
            target: "runtime::simulation",
            skill = %request.skill,
            caster = %request.caster,
            code = outcome.code(),
            "cast resolved"
        );
        self.clear_defeated_sources();
        outcome
    }

    /// Advances `ticks` ticks and reports what happened in each.
    pub fn advance(&mut self, ticks: u64) -> Vec<TickReport> {
        (0..ticks).map(|_| self.step()).collect()
    }

    fn step(&mut self) -> TickReport {
        let now = self.world.now() + 1;
        self.world.set_now(now);
        let mut report = TickReport::new(now);

        let dispatcher = Arc::clone(&self.dispatcher);
        let due = self.world.take_due_timers();
        {
            let mut env = CombatEnv::new(&mut self.world, &mut self.units, &mut self.rng);
            for cast in due {
                match dispatcher.resume(cast, &mut env) {
                    CastOutcome::Rejected {
                        error: DispatchError::SuspensionInvalidated { .. },
                        ..
                    } => report.invalidated += 1,
                    CastOutcome::Rejected { .. } => {}
                    _ => report.resumed += 1,
                }
            }

            report.pulsed = dispatcher.pulse_units(now, &mut env);
            report.units_expired = dispatcher.expire_units(now, &mut env).len();
        }
        report.statuses_ended = self.world.expire_statuses();
        self.clear_defeated_sources();

        if report != TickReport::new(now) {
            debug!(
                target: "runtime::simulation",
                tick = %now,
                resumed = report.resumed,
                invalidated = report.invalidated,
                pulsed = report.pulsed,
                units_expired = report.units_expired,
                statuses_ended = report.statuses_ended,
                "tick"
            );
        }
        report
    }

    /// Drops unit groups whose source has left the world.
    fn clear_defeated_sources(&mut self) {
        let gone: BTreeSet<EntityId> = self
            .units
            .iter()
            .map(|group| group.source)
            .filter(|&source| self.world.actor(source).is_none())
            .collect();
        for source in gone {
            for group in self.units.remove_source(source) {
                self.world.emit(CombatEvent::UnitExpired {
                    group: group.id,
                    skill: group.skill,
                    evicted: false,
                });
            }
        }
    }

    pub fn drain_events(&mut self) -> Vec<CombatEvent> {
        self.world.drain_events()
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            tick: self.world.now(),
            actors: self.world.snapshot(),
            units: self.units.iter().copied().collect(),
            pending_timers: self.world.pending_timers(),
        }
    }
}
