use std::collections::BTreeMap;
use std::sync::Arc;

use super::*;
use crate::catalog::{self, FeatherRain, QuakeStomp, WildSurge, ids};
use crate::config::{CombatConfig, Ruleset};
use crate::env::{
    AreaFilter, AreaQuery, AttackOutcome, AttackRequest, AttackResolver, AttackResult,
    CombatEnv, CombatEvent, DeferredCast, EventSink, PcgRandom, Relation, StatusEffectController,
    TimerScheduler, WorldView,
};
use crate::error::{DispatchError, TargetFault};
use crate::skill::{CastEffect, CombatContext, ModeFlags, SkillBehavior, SkillId, SkillRegistry, Target};
use crate::state::{
    EntityId, Position, Region, StatusChange, StatusEffects, StatusEntry, StatusKind, Tick,
    UnitGroups,
};

struct MockActor {
    position: Position,
    faction: u8,
    alive: bool,
    statuses: StatusEffects,
}

/// In-memory host that records every call the dispatcher makes.
struct MockHost {
    actors: BTreeMap<EntityId, MockActor>,
    now: Tick,
    scheduled: Vec<(u64, DeferredCast)>,
    attacks: Vec<AttackRequest>,
    events: Vec<CombatEvent>,
    next_result: AttackResult,
}

impl MockHost {
    fn new() -> Self {
        Self {
            actors: BTreeMap::new(),
            now: Tick::ZERO,
            scheduled: Vec::new(),
            attacks: Vec::new(),
            events: Vec::new(),
            next_result: AttackResult::Hit,
        }
    }

    fn spawn(&mut self, id: u32, x: i32, y: i32, faction: u8) -> EntityId {
        let id = EntityId(id);
        self.actors.insert(
            id,
            MockActor {
                position: Position::new(x, y),
                faction,
                alive: true,
                statuses: StatusEffects::new(),
            },
        );
        id
    }

    fn kill(&mut self, id: EntityId) {
        if let Some(actor) = self.actors.get_mut(&id) {
            actor.alive = false;
        }
    }

    fn grant(&mut self, id: EntityId, kind: StatusKind, level: u8) {
        let change = StatusChange::new(kind, level, 100);
        self.apply(id, change);
    }

    fn status_count(&self) -> usize {
        self.actors.values().map(|a| a.statuses.len()).sum()
    }
}

impl WorldView for MockHost {
    fn is_alive(&self, entity: EntityId) -> bool {
        self.actors.get(&entity).is_some_and(|a| a.alive)
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

impl AreaQuery for MockHost {
    fn find<'a>(
        &'a self,
        region: Region,
        filter: AreaFilter,
    ) -> Box<dyn Iterator<Item = EntityId> + 'a> {
        // Reverse order so the dispatcher's own sorting is exercised.
        Box::new(
            self.actors
                .iter()
                .rev()
                .filter(move |(id, actor)| {
                    region.contains(actor.position) && filter.accepts(self, &region, **id)
                })
                .map(|(id, _)| *id),
        )
    }
}

impl StatusEffectController for MockHost {
    fn apply(&mut self, target: EntityId, change: StatusChange) -> bool {
        if change.chance < 100 {
            return false;
        }
        let now = self.now;
        match self.actors.get_mut(&target) {
            Some(actor) if actor.alive => actor
                .statuses
                .insert(StatusEntry::from_change(&change, now)),
            _ => false,
        }
    }

    fn query(&self, target: EntityId, kind: StatusKind) -> Option<StatusEntry> {
        self.actors
            .get(&target)
            .and_then(|a| a.statuses.get(kind, self.now).copied())
    }

    fn end(&mut self, target: EntityId, kind: StatusKind) -> bool {
        let now = self.now;
        self.actors
            .get_mut(&target)
            .is_some_and(|a| a.statuses.remove(kind, now))
    }
}

impl TimerScheduler for MockHost {
    fn schedule(&mut self, delay: u64, cast: DeferredCast) {
        self.scheduled.push((delay, cast));
    }
}

impl AttackResolver for MockHost {
    fn resolve_attack(&mut self, request: &AttackRequest) -> AttackOutcome {
        self.attacks.push(*request);
        AttackOutcome {
            result: self.next_result,
            damage: i64::from(request.ratio),
        }
    }
}

impl EventSink for MockHost {
    fn emit(&mut self, event: CombatEvent) {
        self.events.push(event);
    }
}

struct Fixture {
    dispatcher: CombatDispatcher,
    host: MockHost,
    units: UnitGroups,
    rng: PcgRandom,
}

impl Fixture {
    fn new() -> Self {
        Self::with_config(CombatConfig::default())
    }

    fn with_config(config: CombatConfig) -> Self {
        let mut builder = SkillRegistry::builder();
        catalog::register_all(&mut builder).unwrap();
        let dispatcher = CombatDispatcher::new(Arc::new(builder.build()), config);
        Self {
            dispatcher,
            host: MockHost::new(),
            units: UnitGroups::new(),
            rng: PcgRandom::new(0xC0FFEE),
        }
    }

    fn ctx(&self, caster: EntityId, target: Target, level: u8) -> CombatContext {
        self.dispatcher.context(caster, target, level, self.host.now)
    }

    fn cast(&mut self, skill: SkillId, ctx: CombatContext) -> CastOutcome {
        let mut env = CombatEnv::new(&mut self.host, &mut self.units, &mut self.rng);
        self.dispatcher.dispatch(skill, ctx, &mut env)
    }

    fn resume(&mut self, cast: DeferredCast) -> CastOutcome {
        let mut env = CombatEnv::new(&mut self.host, &mut self.units, &mut self.rng);
        self.dispatcher.resume(cast, &mut env)
    }

    fn pulse(&mut self, now: Tick) -> usize {
        self.host.now = now;
        let mut env = CombatEnv::new(&mut self.host, &mut self.units, &mut self.rng);
        self.dispatcher.pulse_units(now, &mut env)
    }
}

fn duel(fx: &mut Fixture) -> (EntityId, EntityId) {
    let caster = fx.host.spawn(1, 0, 0, 0);
    let target = fx.host.spawn(2, 1, 0, 1);
    (caster, target)
}

// ============================================================================
// Ratio resolution
// ============================================================================

#[test]
fn weapon_skill_ratio_at_level_five_is_140() {
    let mut fx = Fixture::new();
    let (caster, target) = duel(&mut fx);

    let ctx = fx.ctx(caster, Target::Entity(target), 5);
    let outcome = fx.cast(ids::RENDING_STRIKE, ctx);

    let report = outcome.report().expect("completed");
    assert_eq!(report.ratio, 140);
    assert_eq!(report.ratio - CombatContext::BASE_SKILL_RATIO, 40);
    assert_eq!(report.hit_rate, 125);
    assert_eq!(fx.host.attacks.len(), 1);
    assert_eq!(fx.host.attacks[0].ratio, 140);
    assert_eq!(fx.host.attacks[0].class, crate::env::DamageClass::Weapon);
}

#[test]
fn status_condition_doubles_whole_multiplier() {
    let mut fx = Fixture::new();
    let (caster, target) = duel(&mut fx);

    let plain = fx.cast(ids::TWIN_FANG, fx.ctx(caster, Target::Entity(target), 2));
    assert_eq!(plain.report().unwrap().ratio, 200);

    fx.host.grant(caster, StatusKind::FeralRage, 1);
    let enraged = fx.cast(ids::TWIN_FANG, fx.ctx(caster, Target::Entity(target), 2));
    assert_eq!(enraged.report().unwrap().ratio, 400);
}

#[test]
fn ruleset_selects_formula_at_runtime() {
    let mut classic = Fixture::new();
    let (caster, target) = duel(&mut classic);
    let outcome = classic.cast(ids::GALE_CUTTER, classic.ctx(caster, Target::Entity(target), 3));
    assert_eq!(outcome.report().unwrap().ratio, 160);

    let mut renewal = Fixture::with_config(CombatConfig::default().with_ruleset(Ruleset::Renewal));
    let (caster, target) = duel(&mut renewal);
    let ctx = renewal.ctx(caster, Target::Entity(target), 3);
    assert!(ctx.flags.contains(ModeFlags::RENEWAL));
    let outcome = renewal.cast(ids::GALE_CUTTER, ctx);
    assert_eq!(outcome.report().unwrap().ratio, 400);
}

#[test]
fn madness_stage_feeds_ratio() {
    let mut fx = Fixture::new();
    let (caster, target) = duel(&mut fx);
    fx.host.grant(caster, StatusKind::Madness2, 1);

    let outcome = fx.cast(ids::SAVAGE_BITE, fx.ctx(caster, Target::Entity(target), 1));
    assert_eq!(outcome.report().unwrap().ratio, 100 + 30 + 100);
}

#[test]
fn modify_hit_rate_is_pure() {
    let fx = Fixture::new();
    let behavior = fx.dispatcher.resolve(ids::RENDING_STRIKE).unwrap();
    let once = behavior.modify_hit_rate(80, EntityId(1), Some(EntityId(2)), 3);
    let twice = behavior.modify_hit_rate(80, EntityId(1), Some(EntityId(2)), 3);
    assert_eq!(once, twice);
    assert_eq!(once, 95);
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn unregistered_skill_is_not_found_without_mutation() {
    let mut fx = Fixture::new();
    let (caster, target) = duel(&mut fx);
    let statuses_before = fx.host.status_count();

    let outcome = fx.cast(SkillId(1), fx.ctx(caster, Target::Entity(target), 1));

    assert_eq!(
        outcome,
        CastOutcome::Rejected {
            skill: SkillId(1),
            phase: CastPhase::Requested,
            error: DispatchError::NotFound { skill: SkillId(1) },
        }
    );
    assert!(fx.host.attacks.is_empty());
    assert!(fx.host.scheduled.is_empty());
    assert!(fx.units.is_empty());
    assert_eq!(fx.host.status_count(), statuses_before);
    assert_eq!(outcome.code(), 0);
}

#[test]
fn level_outside_bounds_is_rejected() {
    let mut fx = Fixture::new();
    let (caster, target) = duel(&mut fx);

    for level in [0, 11] {
        let outcome = fx.cast(ids::RENDING_STRIKE, fx.ctx(caster, Target::Entity(target), level));
        assert!(matches!(
            outcome.error(),
            Some(DispatchError::InvalidLevel { max: 10, .. })
        ));
    }
    assert!(fx.host.attacks.is_empty());
}

#[test]
fn target_faults_are_rejected() {
    let mut fx = Fixture::new();
    let (caster, target) = duel(&mut fx);
    let far = fx.host.spawn(3, 20, 0, 1);

    let out_of_range = fx.cast(ids::RENDING_STRIKE, fx.ctx(caster, Target::Entity(far), 1));
    assert_eq!(
        out_of_range.error(),
        Some(&DispatchError::InvalidTarget {
            skill: ids::RENDING_STRIKE,
            reason: TargetFault::OutOfRange
        })
    );

    let wrong_kind = fx.cast(
        ids::RENDING_STRIKE,
        fx.ctx(caster, Target::Ground(Position::new(1, 0)), 1),
    );
    assert!(matches!(
        wrong_kind.error(),
        Some(DispatchError::InvalidTarget {
            reason: TargetFault::WrongTargetKind,
            ..
        })
    ));

    fx.host.kill(target);
    let gone = fx.cast(ids::RENDING_STRIKE, fx.ctx(caster, Target::Entity(target), 1));
    assert!(matches!(
        gone.error(),
        Some(DispatchError::InvalidTarget {
            reason: TargetFault::TargetGone,
            ..
        })
    ));
    assert!(fx.host.attacks.is_empty());
}

#[test]
fn excessive_depth_is_rejected() {
    let mut fx = Fixture::new();
    let (caster, target) = duel(&mut fx);
    let mut ctx = fx.ctx(caster, Target::Entity(target), 1);
    ctx.depth = CombatConfig::DEFAULT_MAX_CHAIN_DEPTH + 1;

    let outcome = fx.cast(ids::RENDING_STRIKE, ctx);
    assert!(matches!(
        outcome.error(),
        Some(DispatchError::ChainTooDeep { .. })
    ));
}

// ============================================================================
// Execution
// ============================================================================

#[test]
fn ground_skill_retains_ammo_and_places_one_group() {
    let mut fx = Fixture::new();
    let caster = fx.host.spawn(1, 0, 0, 0);
    let inside_b = fx.host.spawn(4, 6, 6, 1);
    let inside_a = fx.host.spawn(3, 5, 4, 1);
    let ally = fx.host.spawn(5, 5, 5, 0);
    fx.host.spawn(6, 9, 9, 1);

    let at = Position::new(5, 5);
    let outcome = fx.cast(ids::FEATHER_RAIN, fx.ctx(caster, Target::Ground(at), 3));

    let report = outcome.report().expect("completed");
    assert!(report.flags.contains(ModeFlags::RETAIN_AMMO));
    assert_eq!(report.flags.bits() & 0x1, 0x1);

    assert_eq!(fx.units.len(), 1);
    let group = fx.units.iter().next().unwrap();
    assert_eq!(group.origin, at);
    assert_eq!(group.radius, FeatherRain.splash_radius(3));
    assert_eq!(group.source, caster);

    let hit: Vec<_> = fx.host.attacks.iter().map(|a| a.target).collect();
    assert_eq!(hit, vec![inside_a, inside_b]);
    assert!(!hit.contains(&ally));
    assert!(matches!(
        report.effect,
        CastEffect::Unit { report, .. } if report.targets == 2 && report.landed == 2
    ));
}

#[test]
fn unit_cap_evicts_oldest_group() {
    let config = CombatConfig {
        max_units_per_source: 2,
        ..CombatConfig::default()
    };
    let mut fx = Fixture::with_config(config);
    let caster = fx.host.spawn(1, 0, 0, 0);

    for x in 0..3 {
        fx.cast(
            ids::FEATHER_RAIN,
            fx.ctx(caster, Target::Ground(Position::new(x, 3)), 1),
        );
    }

    assert_eq!(fx.units.len(), 2);
    assert!(fx.host.events.iter().any(|e| matches!(
        e,
        CombatEvent::UnitExpired { evicted: true, .. }
    )));
    assert!(fx.units.iter().all(|g| g.origin.x != 0));
}

#[test]
fn interval_unit_reapplies_status_on_pulse() {
    let mut fx = Fixture::new();
    let caster = fx.host.spawn(1, 0, 0, 0);
    let victim = fx.host.spawn(2, 3, 3, 1);

    let outcome = fx.cast(
        ids::FROST_MIST,
        fx.ctx(caster, Target::Ground(Position::new(3, 3)), 1),
    );
    assert!(outcome.is_completed());
    assert!(fx.host.has(victim, StatusKind::Chilled));

    fx.host.end(victim, StatusKind::Chilled);
    assert_eq!(fx.pulse(Tick(1)), 0);
    assert_eq!(fx.pulse(Tick(2)), 1);
    assert!(fx.host.has(victim, StatusKind::Chilled));
}

/// Interval damage field used to observe what a pulse carries.
struct BrambleField;

impl BrambleField {
    const ID: SkillId = SkillId(9100);
}

impl SkillBehavior for BrambleField {
    fn id(&self) -> SkillId {
        Self::ID
    }

    fn name(&self) -> &'static str {
        "bramble_field"
    }

    fn target_kind(&self) -> crate::skill::TargetKind {
        crate::skill::TargetKind::Ground
    }

    fn attack_type(&self) -> Option<crate::env::DamageClass> {
        Some(crate::env::DamageClass::Weapon)
    }

    fn splash_radius(&self, _level: u8) -> u32 {
        1
    }

    fn castend_pos2(
        &self,
        ctx: &mut CombatContext,
        _at: Position,
        _env: &mut CombatEnv<'_>,
    ) -> CastEffect {
        ctx.flags |= ModeFlags::RETAIN_AMMO;
        CastEffect::PlaceUnit(crate::state::UnitSpec::new(1, 6).with_interval(2))
    }
}

#[test]
fn unit_pulse_keeps_placing_cast_flags() {
    let mut fx = Fixture::new();
    let mut builder = SkillRegistry::builder();
    builder.register(BrambleField::ID, BrambleField).unwrap();
    fx.dispatcher = CombatDispatcher::new(Arc::new(builder.build()), CombatConfig::default());

    let caster = fx.host.spawn(1, 0, 0, 0);
    let victim = fx.host.spawn(2, 3, 3, 1);
    let ctx = fx
        .ctx(caster, Target::Ground(Position::new(3, 3)), 1)
        .with_flags(ModeFlags::PREAMBLE);
    assert!(fx.cast(BrambleField::ID, ctx).is_completed());

    let group = fx.units.iter().next().unwrap();
    assert_eq!(group.flags, ModeFlags::PREAMBLE | ModeFlags::RETAIN_AMMO);

    fx.host.attacks.clear();
    assert_eq!(fx.pulse(Tick(2)), 1);
    assert_eq!(fx.host.attacks.len(), 1);
    let pulse = fx.host.attacks[0];
    assert_eq!(pulse.target, victim);
    assert!(pulse.flags.contains(ModeFlags::PREAMBLE | ModeFlags::RETAIN_AMMO));
    assert!(pulse.flags.contains(ModeFlags::SPLASH_CHILD));
}

#[test]
fn splash_decorator_hits_each_enemy_repeatedly_in_id_order() {
    let mut fx = Fixture::new();
    let caster = fx.host.spawn(1, 0, 0, 0);
    let primary = fx.host.spawn(2, 4, 0, 1);
    let neighbour = fx.host.spawn(7, 5, 1, 1);
    fx.host.spawn(3, 4, 1, 0);
    fx.host.spawn(8, 8, 8, 1);

    let outcome = fx.cast(ids::HAIL_VOLLEY, fx.ctx(caster, Target::Entity(primary), 1));
    let report = outcome.report().unwrap();

    assert_eq!(
        report.effect,
        CastEffect::Area(crate::skill::AreaReport {
            targets: 2,
            landed: 6
        })
    );
    let order: Vec<_> = fx.host.attacks.iter().map(|a| a.target).collect();
    assert_eq!(
        order,
        vec![primary, primary, primary, neighbour, neighbour, neighbour]
    );
    assert!(fx
        .host
        .attacks
        .iter()
        .all(|a| a.flags.contains(ModeFlags::SPLASH_CHILD) && a.ratio == 50));
}

#[test]
fn outer_splash_spares_dead_zone_and_strikes_primary_once() {
    let mut fx = Fixture::new();
    let caster = fx.host.spawn(1, 0, 0, 0);
    let primary = fx.host.spawn(2, 2, 0, 1);
    let on_boundary = fx.host.spawn(3, 1, 1, 1);
    let outer = fx.host.spawn(4, 0, 3, 1);
    let ally = fx.host.spawn(5, 2, 2, 0);
    fx.host.spawn(6, 5, 0, 1);

    let outcome = fx.cast(ids::THORN_BURST, fx.ctx(caster, Target::Entity(primary), 1));
    let report = outcome.report().unwrap();

    assert_eq!(
        report.effect,
        CastEffect::Area(crate::skill::AreaReport {
            targets: 2,
            landed: 2
        })
    );
    let order: Vec<_> = fx.host.attacks.iter().map(|a| a.target).collect();
    assert_eq!(order, vec![primary, outer]);
    assert!(!order.contains(&on_boundary));
    assert!(!order.contains(&ally));

    assert!(!fx.host.attacks[0].flags.contains(ModeFlags::SPLASH_CHILD));
    assert!(fx.host.attacks[1].flags.contains(ModeFlags::SPLASH_CHILD));
    assert!(fx.host.attacks.iter().all(|a| a.ratio == 120));
}

#[test]
fn area_filter_dead_zone_includes_its_boundary() {
    let mut host = MockHost::new();
    let caster = host.spawn(1, 0, 0, 0);
    let inside = host.spawn(2, 1, 0, 1);
    let outside = host.spawn(3, 2, 0, 1);
    let region = Region::new(Position::ORIGIN, 3);

    let ring = AreaFilter::enemies_of(caster).with_min_distance(1);
    assert!(!ring.accepts(&host, &region, inside));
    assert!(ring.accepts(&host, &region, outside));

    let origin_only = AreaFilter::enemies_of(caster).with_min_distance(0);
    assert!(origin_only.accepts(&host, &region, inside));
    assert!(AreaFilter::enemies_of(caster).accepts(&host, &region, inside));
    assert!(!AreaFilter::enemies_of(caster).excluding(outside).accepts(&host, &region, outside));
}

#[test]
fn additional_effect_only_after_landed_hit() {
    let mut fx = Fixture::new();
    let (caster, target) = duel(&mut fx);

    fx.host.next_result = AttackResult::Miss;
    fx.cast(ids::SAVAGE_BITE, fx.ctx(caster, Target::Entity(target), 1));
    assert!(!fx.host.has(target, StatusKind::Bleeding));

    fx.host.next_result = AttackResult::Immune;
    fx.cast(ids::SAVAGE_BITE, fx.ctx(caster, Target::Entity(target), 1));
    assert!(!fx.host.has(target, StatusKind::Bleeding));

    fx.host.next_result = AttackResult::Hit;
    fx.cast(ids::SAVAGE_BITE, fx.ctx(caster, Target::Entity(target), 1));
    assert!(fx.host.has(target, StatusKind::Bleeding));
}

#[test]
fn status_skill_applies_to_caster() {
    let mut fx = Fixture::new();
    let (caster, target) = duel(&mut fx);

    let outcome = fx.cast(ids::PULSE_OF_FRENZY, fx.ctx(caster, Target::Entity(target), 2));
    assert_eq!(outcome.code(), 1);
    assert!(fx.host.has(caster, StatusKind::Frenzy));
    assert!(!fx.host.has(target, StatusKind::Frenzy));
    assert!(fx.host.attacks.is_empty());
}

#[test]
fn storm_charges_convert_and_are_spent() {
    let mut fx = Fixture::new();
    let (caster, target) = duel(&mut fx);

    for _ in 0..5 {
        fx.cast(ids::STORM_LANCE, fx.ctx(caster, Target::Entity(target), 1));
    }
    assert_eq!(
        fx.host.query(caster, StatusKind::StormCharge).map(|e| e.values[0]),
        Some(5)
    );

    fx.cast(ids::STORM_LANCE, fx.ctx(caster, Target::Entity(target), 1));
    assert!(fx.host.has(caster, StatusKind::StormChargeMax));
    assert!(!fx.host.has(caster, StatusKind::StormCharge));

    let charged = fx.cast(ids::STORM_LANCE, fx.ctx(caster, Target::Entity(target), 1));
    assert_eq!(charged.report().unwrap().ratio, 280);
    assert!(!fx.host.has(caster, StatusKind::StormChargeMax));
}

// ============================================================================
// Deferral and forwarding
// ============================================================================

#[test]
fn deferred_cast_keeps_original_flags() {
    let mut fx = Fixture::new();
    let (caster, target) = duel(&mut fx);
    let ctx = fx
        .ctx(caster, Target::Entity(target), 2)
        .with_flags(ModeFlags::PREAMBLE);

    let outcome = fx.cast(ids::QUAKE_STOMP, ctx);
    assert!(outcome.is_deferred());
    assert_eq!(outcome.report().unwrap().deferrals, 2);
    assert!(fx.host.attacks.is_empty());

    let delays: Vec<_> = fx.host.scheduled.iter().map(|(d, _)| *d).collect();
    assert_eq!(delays, QuakeStomp::IMPACT_DELAYS.to_vec());
    for (_, cast) in &fx.host.scheduled {
        assert!(cast.context.flags.contains(ModeFlags::PREAMBLE | ModeFlags::RESUMED));
        assert_eq!(cast.context.accumulated_ratio, 220);
    }

    let pending: Vec<_> = fx.host.scheduled.drain(..).map(|(_, c)| c).collect();
    for cast in pending {
        let resumed = fx.resume(cast);
        let report = resumed.report().unwrap();
        assert_eq!(report.tick, cast.fire_at);
        assert!(matches!(report.effect, CastEffect::Attack(_)));
    }
    assert_eq!(fx.host.attacks.len(), 2);
}

#[test]
fn deferred_cast_with_removed_target_is_rejected() {
    let mut fx = Fixture::new();
    let (caster, target) = duel(&mut fx);

    fx.cast(ids::QUAKE_STOMP, fx.ctx(caster, Target::Entity(target), 1));
    fx.host.kill(target);
    let statuses_before = fx.host.status_count();

    let pending: Vec<_> = fx.host.scheduled.drain(..).map(|(_, c)| c).collect();
    assert_eq!(pending.len(), 2);
    for cast in pending {
        let outcome = fx.resume(cast);
        assert_eq!(
            outcome,
            CastOutcome::Rejected {
                skill: ids::QUAKE_STOMP,
                phase: CastPhase::Deferred,
                error: DispatchError::SuspensionInvalidated {
                    skill: ids::QUAKE_STOMP
                },
            }
        );
    }
    assert!(fx.host.attacks.is_empty());
    assert!(fx.host.scheduled.is_empty());
    assert_eq!(fx.host.status_count(), statuses_before);
}

#[test]
fn forward_carries_level_and_flags() {
    let mut fx = Fixture::new();
    let (caster, target) = duel(&mut fx);
    let ctx = fx
        .ctx(caster, Target::Entity(target), 3)
        .with_flags(ModeFlags::ANIMATION);

    let outcome = fx.cast(ids::WILD_SURGE, ctx);
    let report = outcome.report().unwrap();

    assert_eq!(report.via, Some(ids::WILD_SURGE));
    assert!(WildSurge::CANDIDATES.contains(&report.skill));
    assert_eq!(report.level, 3);
    assert!(report.flags.contains(ModeFlags::ANIMATION | ModeFlags::FORWARDED));
    assert!(fx.host.events.iter().any(|e| matches!(
        e,
        CombatEvent::Forwarded { from, .. } if *from == ids::WILD_SURGE
    )));
}

#[test]
fn random_forward_is_uniform() {
    let mut fx = Fixture::new();
    let (caster, target) = duel(&mut fx);
    let mut counts = BTreeMap::new();

    for _ in 0..1000 {
        let outcome = fx.cast(ids::WILD_SURGE, fx.ctx(caster, Target::Entity(target), 1));
        let chosen = outcome.report().expect("forward completes").skill;
        *counts.entry(chosen).or_insert(0u32) += 1;
    }

    assert_eq!(counts.len(), WildSurge::CANDIDATES.len());
    for candidate in WildSurge::CANDIDATES {
        let seen = counts[&candidate];
        assert!((190..=310).contains(&seen), "{candidate}: {seen}");
    }
}

#[test]
fn identical_seed_and_state_reproduce_choices() {
    let run = || {
        let mut fx = Fixture::new();
        let (caster, target) = duel(&mut fx);
        (0..50)
            .map(|_| {
                let outcome = fx.cast(ids::WILD_SURGE, fx.ctx(caster, Target::Entity(target), 2));
                let report = outcome.report().unwrap();
                (report.skill, report.ratio)
            })
            .collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
}
