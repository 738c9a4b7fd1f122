//! Ground-anchored area effects spawned by position-targeted skills.
//!
//! A [`SkillUnitGroup`] owns a region and a lifetime. It never owns the
//! entities standing inside it; those are discovered through
//! [`crate::env::AreaQuery`] each time the group resolves.

use std::collections::BTreeMap;
use std::fmt;

use crate::skill::{ModeFlags, SkillId};
use crate::state::{EntityId, Position, Region, Tick};

/// Identifier of a placed unit group, unique within one [`UnitGroups`] store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitGroupId(pub u32);

impl fmt::Display for UnitGroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit#{}", self.0)
    }
}

/// Shape and lifetime a ground skill asks the dispatcher to place.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitSpec {
    pub radius: u32,
    /// Lifetime in ticks.
    pub duration: u64,
    /// Ticks between area re-resolutions; 0 resolves once on placement.
    pub interval: u64,
}

impl UnitSpec {
    pub const fn new(radius: u32, duration: u64) -> Self {
        Self {
            radius,
            duration,
            interval: 0,
        }
    }

    pub const fn with_interval(mut self, interval: u64) -> Self {
        self.interval = interval;
        self
    }
}

/// A live ground effect instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillUnitGroup {
    pub id: UnitGroupId,
    pub source: EntityId,
    pub skill: SkillId,
    pub level: u8,
    /// Flags of the placing cast, carried into every pulse.
    pub flags: ModeFlags,
    pub origin: Position,
    pub radius: u32,
    pub placed_at: Tick,
    pub expires_at: Tick,
    pub interval: u64,
    pub next_pulse: Option<Tick>,
}

impl SkillUnitGroup {
    pub fn region(&self) -> Region {
        Region::new(self.origin, self.radius)
    }

    pub fn is_expired(&self, now: Tick) -> bool {
        now >= self.expires_at
    }
}

/// Store of every live unit group, iterated in placement order.
#[derive(Clone, Debug, Default)]
pub struct UnitGroups {
    groups: BTreeMap<UnitGroupId, SkillUnitGroup>,
    next_id: u32,
}

/// Result of placing a group.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub group: SkillUnitGroup,
    /// Oldest group of the same source removed to stay under the cap.
    pub evicted: Option<SkillUnitGroup>,
}

impl UnitGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places a new group, evicting the source's oldest group when it already
    /// owns `cap` of them.
    #[allow(clippy::too_many_arguments)]
    pub fn place(
        &mut self,
        source: EntityId,
        skill: SkillId,
        level: u8,
        flags: ModeFlags,
        origin: Position,
        spec: UnitSpec,
        now: Tick,
        cap: usize,
    ) -> Placement {
        let evicted = if cap > 0 && self.count_for(source) >= cap {
            self.oldest_for(source).and_then(|id| self.groups.remove(&id))
        } else {
            None
        };

        let id = UnitGroupId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);

        let group = SkillUnitGroup {
            id,
            source,
            skill,
            level,
            flags,
            origin,
            radius: spec.radius,
            placed_at: now,
            expires_at: now + spec.duration,
            interval: spec.interval,
            next_pulse: (spec.interval > 0).then(|| now + spec.interval),
        };
        self.groups.insert(id, group);

        Placement { group, evicted }
    }

    pub fn get(&self, id: UnitGroupId) -> Option<&SkillUnitGroup> {
        self.groups.get(&id)
    }

    pub fn remove(&mut self, id: UnitGroupId) -> Option<SkillUnitGroup> {
        self.groups.remove(&id)
    }

    /// Removes every group owned by `source`, e.g. when it leaves the world.
    pub fn remove_source(&mut self, source: EntityId) -> Vec<SkillUnitGroup> {
        let ids: Vec<_> = self
            .groups
            .values()
            .filter(|g| g.source == source)
            .map(|g| g.id)
            .collect();
        ids.into_iter()
            .filter_map(|id| self.groups.remove(&id))
            .collect()
    }

    /// Removes and returns the groups whose lifetime ended at or before `now`.
    pub fn expire(&mut self, now: Tick) -> Vec<SkillUnitGroup> {
        let ids: Vec<_> = self
            .groups
            .values()
            .filter(|g| g.is_expired(now))
            .map(|g| g.id)
            .collect();
        ids.into_iter()
            .filter_map(|id| self.groups.remove(&id))
            .collect()
    }

    /// Groups due for an interval pulse at `now`, in placement order.
    ///
    /// Each returned group has its next pulse advanced by one interval.
    pub fn take_due_pulses(&mut self, now: Tick) -> Vec<SkillUnitGroup> {
        let mut due = Vec::new();
        for group in self.groups.values_mut() {
            if group.is_expired(now) {
                continue;
            }
            if let Some(next) = group.next_pulse
                && next <= now
            {
                group.next_pulse = Some(now + group.interval);
                due.push(*group);
            }
        }
        due
    }

    pub fn count_for(&self, source: EntityId) -> usize {
        self.groups.values().filter(|g| g.source == source).count()
    }

    fn oldest_for(&self, source: EntityId) -> Option<UnitGroupId> {
        self.groups
            .values()
            .filter(|g| g.source == source)
            .min_by_key(|g| (g.placed_at, g.id))
            .map(|g| g.id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SkillUnitGroup> {
        self.groups.values()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SKILL: SkillId = SkillId(9000);

    fn place(units: &mut UnitGroups, source: u32, now: u64, cap: usize) -> Placement {
        units.place(
            EntityId(source),
            SKILL,
            1,
            ModeFlags::empty(),
            Position::new(4, 4),
            UnitSpec::new(2, 10),
            Tick(now),
            cap,
        )
    }

    #[test]
    fn cap_evicts_oldest_group_of_same_source() {
        let mut units = UnitGroups::new();
        let first = place(&mut units, 1, 0, 2);
        place(&mut units, 1, 1, 2);
        place(&mut units, 2, 1, 2);

        let third = place(&mut units, 1, 2, 2);
        assert_eq!(third.evicted.map(|g| g.id), Some(first.group.id));
        assert_eq!(units.count_for(EntityId(1)), 2);
        assert_eq!(units.count_for(EntityId(2)), 1);
    }

    #[test]
    fn expire_removes_groups_at_deadline() {
        let mut units = UnitGroups::new();
        place(&mut units, 1, 0, 0);
        place(&mut units, 1, 5, 0);

        assert!(units.expire(Tick(9)).is_empty());
        let expired = units.expire(Tick(10));
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].placed_at, Tick(0));
        assert_eq!(units.len(), 1);
    }

    #[test]
    fn interval_groups_pulse_until_expiry() {
        let mut units = UnitGroups::new();
        units.place(
            EntityId(1),
            SKILL,
            1,
            ModeFlags::empty(),
            Position::ORIGIN,
            UnitSpec::new(1, 6).with_interval(2),
            Tick(0),
            0,
        );

        assert!(units.take_due_pulses(Tick(1)).is_empty());
        assert_eq!(units.take_due_pulses(Tick(2)).len(), 1);
        assert!(units.take_due_pulses(Tick(3)).is_empty());
        assert_eq!(units.take_due_pulses(Tick(4)).len(), 1);
        assert!(units.take_due_pulses(Tick(6)).is_empty());
    }
}
