use crate::state::{EntityId, Position};

/// How one entity regards another.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Relation {
    /// The same entity.
    Same,
    Ally,
    Enemy,
    Neutral,
}

/// Read-only liveness and placement queries against the host world.
pub trait WorldView {
    /// True while the entity is present in the simulation and not dead.
    fn is_alive(&self, entity: EntityId) -> bool;

    fn position(&self, entity: EntityId) -> Option<Position>;

    fn relation(&self, from: EntityId, to: EntityId) -> Relation;
}
