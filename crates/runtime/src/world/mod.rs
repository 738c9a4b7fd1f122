//! In-memory host world implementing every combat collaborator.
//!
//! The world owns actors, their statuses, the deferred-cast queue and the
//! event buffer. The damage model here is a reference host model for running
//! scenarios, not game balance:
//!
//! - effective hit chance = `hit_rate + caster.hit - target.flee`; 100 or
//!   more always hits, 0 or less always misses, anything between rolls d100
//! - immune targets report [`AttackResult::Immune`]
//! - damage = `attack * ratio / 100`, a critical doubles it
//! - an actor whose hp drops to 0 or below leaves the world
mod actor;
mod timers;

pub use actor::{Actor, ActorState};
pub use timers::TimerQueue;

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use combat_core::{
    AreaFilter, AreaQuery, AttackOutcome, AttackRequest, AttackResolver, AttackResult,
    CombatEvent, DamageClass, DeferredCast, EntityId, EventSink, PcgRandom, Position,
    RandomSource, Region, Relation, StatusChange, StatusEffectController, StatusEntry, StatusKind,
    Tick, TimerScheduler, WorldView, compute_seed,
};

/// Stream discriminators for [`compute_seed`].
const HIT_STREAM: u64 = 1;
const STATUS_STREAM: u64 = 2;

/// Weapon attacks that land roll this percentage for a critical.
pub const CRITICAL_CHANCE: u32 = 5;

#[derive(Clone, Debug)]
pub struct World {
    actors: BTreeMap<EntityId, Actor>,
    now: Tick,
    timers: TimerQueue,
    events: Vec<CombatEvent>,
    hit_rng: PcgRandom,
    status_rng: PcgRandom,
}

impl World {
    pub fn new(seed: u64, start: Tick) -> Self {
        Self {
            actors: BTreeMap::new(),
            now: start,
            timers: TimerQueue::new(),
            events: Vec::new(),
            hit_rng: PcgRandom::new(compute_seed(seed, HIT_STREAM, 0)),
            status_rng: PcgRandom::new(compute_seed(seed, STATUS_STREAM, 0)),
        }
    }

    pub fn now(&self) -> Tick {
        self.now
    }

    pub(crate) fn set_now(&mut self, now: Tick) {
        self.now = now;
    }

    /// Adds an actor. Returns false if the id is already taken.
    pub fn spawn(&mut self, actor: Actor) -> bool {
        if self.actors.contains_key(&actor.id) {
            return false;
        }
        debug!(target: "runtime::world", entity = %actor.id, name = %actor.name, at = %actor.position, "actor spawned");
        self.actors.insert(actor.id, actor);
        true
    }

    /// Takes an actor out of the simulation.
    pub fn remove(&mut self, entity: EntityId) -> Option<Actor> {
        self.actors.remove(&entity)
    }

    pub fn actor(&self, entity: EntityId) -> Option<&Actor> {
        self.actors.get(&entity)
    }

    pub fn actor_mut(&mut self, entity: EntityId) -> Option<&mut Actor> {
        self.actors.get_mut(&entity)
    }

    pub fn actors(&self) -> impl Iterator<Item = &Actor> {
        self.actors.values()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub(crate) fn take_due_timers(&mut self) -> Vec<DeferredCast> {
        self.timers.take_due(self.now)
    }

    /// Ends every status whose duration ran out and reports how many ended.
    pub(crate) fn expire_statuses(&mut self) -> usize {
        let now = self.now;
        let mut ended = 0;
        for actor in self.actors.values_mut() {
            for kind in actor.statuses.prune_expired(now) {
                self.events.push(CombatEvent::StatusEnded {
                    target: actor.id,
                    kind,
                });
                ended += 1;
            }
        }
        ended
    }

    pub fn drain_events(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> Vec<ActorState> {
        self.actors.values().map(|a| a.snapshot(self.now)).collect()
    }

    fn roll_hit(&mut self, chance: i32) -> bool {
        match chance {
            c if c >= 100 => true,
            c if c <= 0 => false,
            c => self.hit_rng.roll_d100() <= c as u32,
        }
    }

    fn defeat(&mut self, entity: EntityId, by: EntityId) {
        if let Some(actor) = self.actors.remove(&entity) {
            info!(target: "runtime::world", entity = %entity, name = %actor.name, by = %by, "actor defeated");
            self.events.push(CombatEvent::EntityDefeated { entity, by });
        }
    }
}

impl WorldView for World {
    fn is_alive(&self, entity: EntityId) -> bool {
        self.actors.get(&entity).is_some_and(|a| a.hp > 0)
    }

    fn position(&self, entity: EntityId) -> Option<Position> {
        self.actors.get(&entity).map(|a| a.position)
    }

    fn relation(&self, from: EntityId, to: EntityId) -> Relation {
        if from == to {
            return Relation::Same;
        }
        match (self.actors.get(&from), self.actors.get(&to)) {
            (Some(a), Some(b)) if a.faction == b.faction => Relation::Ally,
            (Some(_), Some(_)) => Relation::Enemy,
            _ => Relation::Neutral,
        }
    }
}

impl AreaQuery for World {
    fn find<'a>(
        &'a self,
        region: Region,
        filter: AreaFilter,
    ) -> Box<dyn Iterator<Item = EntityId> + 'a> {
        Box::new(
            self.actors
                .values()
                .filter(move |actor| region.contains(actor.position))
                .map(|actor| actor.id)
                .filter(move |&id| filter.accepts(self, &region, id)),
        )
    }
}

impl StatusEffectController for World {
    fn apply(&mut self, target: EntityId, change: StatusChange) -> bool {
        if !self.is_alive(target) || !self.status_rng.chance(change.chance) {
            return false;
        }
        let now = self.now;
        let Some(actor) = self.actors.get_mut(&target) else {
            return false;
        };

        let entry = StatusEntry::from_change(&change, now);
        if !actor.statuses.insert(entry) {
            warn!(target: "runtime::world", entity = %target, kind = %change.kind, "status set full, dropping status");
            return false;
        }
        self.events.push(CombatEvent::StatusApplied {
            target,
            kind: change.kind,
            level: change.level,
            expires_at: entry.expires_at,
        });
        true
    }

    fn query(&self, target: EntityId, kind: StatusKind) -> Option<StatusEntry> {
        self.actors
            .get(&target)
            .and_then(|a| a.statuses.get(kind, self.now))
            .copied()
    }

    fn end(&mut self, target: EntityId, kind: StatusKind) -> bool {
        let now = self.now;
        let was_active = self
            .actors
            .get_mut(&target)
            .is_some_and(|a| a.statuses.remove(kind, now));
        if was_active {
            self.events.push(CombatEvent::StatusEnded { target, kind });
        }
        was_active
    }
}

impl TimerScheduler for World {
    fn schedule(&mut self, delay: u64, cast: DeferredCast) {
        debug!(target: "runtime::world", skill = %cast.skill, delay, fire_at = %cast.fire_at, "timer scheduled");
        self.timers.push(cast);
    }
}

impl AttackResolver for World {
    fn resolve_attack(&mut self, request: &AttackRequest) -> AttackOutcome {
        let (Some(attacker), Some(defender)) = (
            self.actors.get(&request.source),
            self.actors.get(&request.target),
        ) else {
            return AttackOutcome::MISS;
        };
        if defender.immune {
            return AttackOutcome {
                result: AttackResult::Immune,
                damage: 0,
            };
        }

        let attack = attacker.attack;
        let chance = request.hit_rate + attacker.hit - defender.flee;
        if !self.roll_hit(chance) {
            return AttackOutcome::MISS;
        }

        let critical =
            request.class == DamageClass::Weapon && self.hit_rng.chance(CRITICAL_CHANCE);
        let mut damage = (attack * i64::from(request.ratio) / 100).max(0);
        let result = if critical {
            damage *= 2;
            AttackResult::Critical
        } else {
            AttackResult::Hit
        };

        let mut defeated = false;
        if let Some(defender) = self.actors.get_mut(&request.target) {
            defender.hp -= damage;
            defeated = defender.hp <= 0;
        }
        if defeated {
            self.defeat(request.target, request.caster);
        }

        AttackOutcome { result, damage }
    }
}

impl EventSink for World {
    fn emit(&mut self, event: CombatEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{CombatContext, ModeFlags, SkillId, Target};

    fn world() -> World {
        let mut world = World::new(7, Tick::ZERO);
        world.spawn(Actor::new(EntityId(1), "hero", Position::new(0, 0), 0).with_attack(50));
        world.spawn(Actor::new(EntityId(2), "ally", Position::new(1, 0), 0));
        world.spawn(Actor::new(EntityId(3), "wolf", Position::new(2, 0), 1).with_hp(60));
        world.spawn(Actor::new(EntityId(4), "far wolf", Position::new(9, 9), 1));
        world
    }

    fn request(target: u32, ratio: i32, hit_rate: i32) -> AttackRequest {
        AttackRequest {
            class: DamageClass::Magic,
            caster: EntityId(1),
            source: EntityId(1),
            target: EntityId(target),
            skill: SkillId(1),
            level: 1,
            tick: Tick::ZERO,
            flags: ModeFlags::empty(),
            ratio,
            hit_rate,
        }
    }

    #[test]
    fn relations_follow_faction() {
        let world = world();
        assert_eq!(world.relation(EntityId(1), EntityId(1)), Relation::Same);
        assert_eq!(world.relation(EntityId(1), EntityId(2)), Relation::Ally);
        assert_eq!(world.relation(EntityId(1), EntityId(3)), Relation::Enemy);
        assert_eq!(world.relation(EntityId(1), EntityId(99)), Relation::Neutral);
    }

    #[test]
    fn find_applies_region_and_filter() {
        let world = world();
        let region = Region::new(Position::new(1, 0), 2);
        let enemies: Vec<_> = world.find(region, AreaFilter::enemies_of(EntityId(1))).collect();
        assert_eq!(enemies, vec![EntityId(3)]);
    }

    #[test]
    fn guaranteed_hit_deals_scaled_damage_and_defeats() {
        let mut world = world();
        let outcome = world.resolve_attack(&request(3, 140, 100));
        assert_eq!(outcome, AttackOutcome::hit(70));
        assert!(!world.is_alive(EntityId(3)));
        assert!(matches!(
            world.drain_events().last(),
            Some(CombatEvent::EntityDefeated { entity: EntityId(3), by: EntityId(1) })
        ));
    }

    #[test]
    fn zero_hit_chance_misses_and_immune_is_reported() {
        let mut world = world();
        assert_eq!(world.resolve_attack(&request(3, 100, 0)), AttackOutcome::MISS);

        world.actor_mut(EntityId(3)).unwrap().immune = true;
        let outcome = world.resolve_attack(&request(3, 100, 100));
        assert_eq!(outcome.result, AttackResult::Immune);
        assert_eq!(world.actor(EntityId(3)).unwrap().hp, 60);
    }

    #[test]
    fn statuses_expire_with_time() {
        let mut world = world();
        assert!(world.apply(EntityId(3), StatusChange::new(StatusKind::Chilled, 1, 2)));
        assert!(world.has(EntityId(3), StatusKind::Chilled));

        world.set_now(Tick(2));
        assert!(!world.has(EntityId(3), StatusKind::Chilled));
        assert_eq!(world.expire_statuses(), 1);
        assert!(world.actor(EntityId(3)).unwrap().statuses.is_empty());
    }

    #[test]
    fn zero_chance_status_never_applies() {
        let mut world = world();
        let change = StatusChange::new(StatusKind::Frozen, 1, 5).with_chance(0);
        assert!(!world.apply(EntityId(3), change));
        assert!(!world.end(EntityId(3), StatusKind::Frozen));
    }

    #[test]
    fn scheduled_casts_fire_once_when_due() {
        let mut world = world();
        let ctx = CombatContext::new(EntityId(1), Target::Entity(EntityId(3)), 1, Tick::ZERO);
        world.schedule(
            2,
            DeferredCast {
                skill: SkillId(9),
                context: ctx,
                fire_at: Tick(2),
            },
        );
        world.set_now(Tick(1));
        assert!(world.take_due_timers().is_empty());
        world.set_now(Tick(2));
        assert_eq!(world.take_due_timers().len(), 1);
        assert_eq!(world.pending_timers(), 0);
    }
}
