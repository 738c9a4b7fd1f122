use crate::env::{Relation, WorldView};
use crate::state::{EntityId, Region};

/// Which relationships to the caster an area member may have.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RelationFilter {
    Enemies,
    Allies,
    /// Anyone except the caster.
    Others,
}

impl RelationFilter {
    pub fn admits(self, relation: Relation) -> bool {
        match self {
            Self::Enemies => relation == Relation::Enemy,
            Self::Allies => relation == Relation::Ally,
            Self::Others => relation != Relation::Same,
        }
    }
}

/// Predicate applied by [`AreaQuery::find`] to every entity inside a region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AreaFilter {
    pub caster: EntityId,
    pub relation: RelationFilter,
    pub exclude: Option<EntityId>,
    /// Entities at or within this distance of the region origin are skipped.
    pub min_distance: Option<u32>,
}

impl AreaFilter {
    pub const fn enemies_of(caster: EntityId) -> Self {
        Self {
            caster,
            relation: RelationFilter::Enemies,
            exclude: None,
            min_distance: None,
        }
    }

    pub const fn with_relation(mut self, relation: RelationFilter) -> Self {
        self.relation = relation;
        self
    }

    pub const fn excluding(mut self, entity: EntityId) -> Self {
        self.exclude = Some(entity);
        self
    }

    pub const fn with_min_distance(mut self, min_distance: u32) -> Self {
        self.min_distance = Some(min_distance);
        self
    }

    /// Full admission check for a candidate already known to be inside `region`.
    pub fn accepts(&self, world: &(impl WorldView + ?Sized), region: &Region, candidate: EntityId) -> bool {
        if self.exclude == Some(candidate) || !world.is_alive(candidate) {
            return false;
        }
        if !self.relation.admits(world.relation(self.caster, candidate)) {
            return false;
        }
        if let Some(min_distance) = self.min_distance {
            match world.position(candidate) {
                Some(at) if region.origin.distance(at) > min_distance => {}
                _ => return false,
            }
        }
        true
    }
}

/// Enumerates entities inside a region.
///
/// The returned iterator is consumed once per area resolution. Hosts may
/// yield in any order; the dispatcher sorts before acting.
pub trait AreaQuery {
    fn find<'a>(
        &'a self,
        region: Region,
        filter: AreaFilter,
    ) -> Box<dyn Iterator<Item = EntityId> + 'a>;
}
