//! Plain data shared by the dispatcher, skills and hosts.
mod common;
mod status;
mod unit;

pub use common::{EntityId, Position, Region, Tick};
pub use status::{StatusChange, StatusEffects, StatusEntry, StatusKind};
pub use unit::{Placement, SkillUnitGroup, UnitGroupId, UnitGroups, UnitSpec};
