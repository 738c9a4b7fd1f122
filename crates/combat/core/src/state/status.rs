//! Status effect data carried between skills and the status controller.
//!
//! Status effects are timed conditions on an entity. Besides plain buffs and
//! debuffs they double as small per-entity counters: a skill can stash charge
//! counts or stage numbers in [`StatusEntry::values`] and read them back on a
//! later cast.
//!
//! # Tick-based Duration
//!
//! Entries store `expires_at: Tick`. An entry is active while
//! `current_tick < expires_at`.

use arrayvec::ArrayVec;

use crate::config::CombatConfig;
use crate::state::Tick;

/// Types of status effects.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StatusKind {
    // ========================================================================
    // Debuffs
    // ========================================================================
    /// Loses health over time.
    Bleeding,
    /// Cannot act; broken by the next hit.
    Frozen,
    /// Slowed by cold.
    Chilled,
    /// Cannot move.
    Rooted,
    /// Cannot act.
    Stunned,

    // ========================================================================
    // Buffs
    // ========================================================================
    /// Hits may raise the madness stage.
    Frenzy,
    /// Doubles the ratio of fang skills.
    FeralRage,
    /// Damage reduction.
    IronHide,

    // ========================================================================
    // Counters and stages
    // ========================================================================
    Madness1,
    Madness2,
    Madness3,
    /// Storm charge count lives in `values[0]`.
    StormCharge,
    /// Fully charged; the next storm skill consumes it.
    StormChargeMax,
}

impl StatusKind {
    /// Returns true for conditions that hinder the affected entity.
    pub const fn is_debuff(self) -> bool {
        matches!(
            self,
            Self::Bleeding | Self::Frozen | Self::Chilled | Self::Rooted | Self::Stunned
        )
    }
}

/// Request to start (or refresh) a status on an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusChange {
    pub kind: StatusKind,
    /// Success chance in percent; 100 or more always applies.
    pub chance: u32,
    pub level: u8,
    /// Duration in ticks.
    pub duration: u64,
    pub values: [i32; 3],
}

impl StatusChange {
    /// Creates a guaranteed status change.
    pub const fn new(kind: StatusKind, level: u8, duration: u64) -> Self {
        Self {
            kind,
            chance: 100,
            level,
            duration,
            values: [0; 3],
        }
    }

    pub const fn with_chance(mut self, chance: u32) -> Self {
        self.chance = chance;
        self
    }

    pub const fn with_values(mut self, values: [i32; 3]) -> Self {
        self.values = values;
        self
    }
}

/// An active status with its metadata.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEntry {
    pub kind: StatusKind,
    pub level: u8,
    pub values: [i32; 3],
    /// Tick at which this effect expires.
    pub expires_at: Tick,
}

impl StatusEntry {
    pub fn from_change(change: &StatusChange, now: Tick) -> Self {
        Self {
            kind: change.kind,
            level: change.level,
            values: change.values,
            expires_at: now + change.duration,
        }
    }

    pub fn is_active(&self, now: Tick) -> bool {
        self.expires_at > now
    }
}

/// Bounded set of statuses on one entity.
///
/// At most one entry per [`StatusKind`]; starting a status that is already
/// present replaces its level, values and expiry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    entries: ArrayVec<StatusEntry, { CombatConfig::MAX_STATUS_EFFECTS }>,
}

impl StatusEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entry for `kind` if it is active at `now`.
    pub fn get(&self, kind: StatusKind, now: Tick) -> Option<&StatusEntry> {
        self.entries
            .iter()
            .find(|entry| entry.kind == kind && entry.is_active(now))
    }

    pub fn has(&self, kind: StatusKind, now: Tick) -> bool {
        self.get(kind, now).is_some()
    }

    /// Starts or refreshes a status. Returns false when the set is full.
    pub fn insert(&mut self, entry: StatusEntry) -> bool {
        if let Some(existing) = self.entries.iter_mut().find(|e| e.kind == entry.kind) {
            *existing = entry;
            return true;
        }
        self.entries.try_push(entry).is_ok()
    }

    /// Removes a status immediately. Returns true if it was active at `now`.
    pub fn remove(&mut self, kind: StatusKind, now: Tick) -> bool {
        let was_active = self.has(kind, now);
        self.entries.retain(|entry| entry.kind != kind);
        was_active
    }

    /// Drops every entry that is no longer active and returns their kinds.
    pub fn prune_expired(&mut self, now: Tick) -> Vec<StatusKind> {
        let expired = self
            .entries
            .iter()
            .filter(|entry| !entry.is_active(now))
            .map(|entry| entry.kind)
            .collect();
        self.entries.retain(|entry| entry.is_active(now));
        expired
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
