use crate::state::{EntityId, StatusChange, StatusEntry, StatusKind};

/// Applies and inspects timed statuses on entities.
pub trait StatusEffectController {
    /// Attempts to start `change` on `target`. Returns whether it took hold.
    ///
    /// `change.chance` below 100 is resolved by the controller itself.
    fn apply(&mut self, target: EntityId, change: StatusChange) -> bool;

    fn query(&self, target: EntityId, kind: StatusKind) -> Option<StatusEntry>;

    /// Ends a status. Returns whether it was active.
    fn end(&mut self, target: EntityId, kind: StatusKind) -> bool;

    fn has(&self, target: EntityId, kind: StatusKind) -> bool {
        self.query(target, kind).is_some()
    }
}
