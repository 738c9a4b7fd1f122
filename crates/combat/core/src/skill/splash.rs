use crate::env::{AreaFilter, AttackOutcome, CombatEnv, DamageClass, RelationFilter};
use crate::skill::{
    AreaReport, CastEffect, CombatContext, ModeFlags, SkillBehavior, SkillId, TargetKind,
};
use crate::state::{EntityId, Position, Region};

/// Turns a single-target damage skill into a splash of repeated sub-hits.
///
/// The wrapper owns the inner behavior and re-invokes its damage entry once
/// per hit for every entity in the area. Every other step is forwarded
/// unchanged, so the wrapped skill keeps its ratio and hit rules.
///
/// By default the area is centered on the primary target and includes it.
/// An outer splash is built with [`around_caster`](Self::around_caster),
/// [`with_min_distance`](Self::with_min_distance) and
/// [`sparing_primary`](Self::sparing_primary).
pub struct RecursiveDamageSplash<B> {
    inner: B,
    hits: u8,
    relation: RelationFilter,
    min_distance: Option<u32>,
    around_caster: bool,
    spare_primary: bool,
}

impl<B: SkillBehavior> RecursiveDamageSplash<B> {
    pub fn new(inner: B) -> Self {
        Self {
            inner,
            hits: 1,
            relation: RelationFilter::Enemies,
            min_distance: None,
            around_caster: false,
            spare_primary: false,
        }
    }

    /// Sub-hits dealt to each member of the area.
    pub fn with_hits(mut self, hits: u8) -> Self {
        self.hits = hits.max(1);
        self
    }

    pub fn with_relation(mut self, relation: RelationFilter) -> Self {
        self.relation = relation;
        self
    }

    /// Skips members at or within `min_distance` of the area center.
    pub fn with_min_distance(mut self, min_distance: u32) -> Self {
        self.min_distance = Some(min_distance);
        self
    }

    /// Centers the area on the caster instead of the primary target.
    pub fn around_caster(mut self) -> Self {
        self.around_caster = true;
        self
    }

    /// The primary target takes one direct hit and is left out of the area.
    pub fn sparing_primary(mut self) -> Self {
        self.spare_primary = true;
        self
    }

    pub fn inner(&self) -> &B {
        &self.inner
    }

    fn area_members(
        &self,
        ctx: &CombatContext,
        primary: EntityId,
        env: &CombatEnv<'_>,
    ) -> Vec<EntityId> {
        let center = if self.around_caster {
            ctx.caster
        } else {
            primary
        };
        let Some(origin) = env.host.position(center) else {
            return Vec::new();
        };
        let region = Region::new(origin, self.inner.splash_radius(ctx.level));

        let mut filter = AreaFilter::enemies_of(ctx.caster).with_relation(self.relation);
        if let Some(min_distance) = self.min_distance {
            filter = filter.with_min_distance(min_distance);
        }
        if self.spare_primary {
            filter = filter.excluding(primary);
        }

        let mut members: Vec<EntityId> = env.host.find(region, filter).collect();
        members.sort_unstable();
        members.dedup();
        members
    }
}

impl<B: SkillBehavior> SkillBehavior for RecursiveDamageSplash<B> {
    fn id(&self) -> SkillId {
        self.inner.id()
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn target_kind(&self) -> TargetKind {
        self.inner.target_kind()
    }

    fn max_level(&self) -> u8 {
        self.inner.max_level()
    }

    fn attack_type(&self) -> Option<DamageClass> {
        self.inner.attack_type()
    }

    fn range(&self, level: u8) -> Option<u32> {
        self.inner.range(level)
    }

    fn splash_radius(&self, level: u8) -> u32 {
        self.inner.splash_radius(level)
    }

    fn area_relation(&self) -> RelationFilter {
        self.inner.area_relation()
    }

    fn modify_hit_rate(
        &self,
        rate: i32,
        caster: EntityId,
        target: Option<EntityId>,
        level: u8,
    ) -> i32 {
        self.inner.modify_hit_rate(rate, caster, target, level)
    }

    fn calculate_skill_ratio(&self, ctx: &CombatContext, env: &CombatEnv<'_>) -> i32 {
        self.inner.calculate_skill_ratio(ctx, env)
    }

    fn castend_damage_id(
        &self,
        ctx: &mut CombatContext,
        target: EntityId,
        env: &mut CombatEnv<'_>,
    ) -> CastEffect {
        // Already one member of an area resolution: hit only this entity.
        if ctx.flags.contains(ModeFlags::SPLASH_CHILD) {
            return self.inner.castend_damage_id(ctx, target, env);
        }

        let mut report = AreaReport {
            targets: 0,
            landed: 0,
        };
        if self.spare_primary {
            report.targets += 1;
            let mut direct = *ctx;
            if self.inner.castend_damage_id(&mut direct, target, env).code() != 0 {
                report.landed += 1;
            }
        }

        let members = self.area_members(ctx, target, env);
        report.targets += members.len() as u32;

        for member in members {
            for _ in 0..self.hits {
                if !env.host.is_alive(member) {
                    break;
                }
                let mut child = ctx.child_for(member, ModeFlags::SPLASH_CHILD | ModeFlags::SPLASH);
                if self.inner.castend_damage_id(&mut child, member, env).code() != 0 {
                    report.landed += 1;
                }
            }
        }

        CastEffect::Area(report)
    }

    fn castend_nodamage_id(
        &self,
        ctx: &mut CombatContext,
        target: EntityId,
        env: &mut CombatEnv<'_>,
    ) -> CastEffect {
        self.inner.castend_nodamage_id(ctx, target, env)
    }

    fn castend_pos2(
        &self,
        ctx: &mut CombatContext,
        at: Position,
        env: &mut CombatEnv<'_>,
    ) -> CastEffect {
        self.inner.castend_pos2(ctx, at, env)
    }

    fn apply_additional_effects(
        &self,
        ctx: &CombatContext,
        target: EntityId,
        outcome: &AttackOutcome,
        env: &mut CombatEnv<'_>,
    ) {
        self.inner.apply_additional_effects(ctx, target, outcome, env);
    }
}
