//! Process-wide table of skill behaviors.
//!
//! Built once at startup through [`SkillRegistryBuilder`], then frozen. The
//! frozen [`SkillRegistry`] is read-only and shared behind an `Arc`, so it is
//! safe to read from any number of threads.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, error};

use crate::config::CombatConfig;
use crate::error::{DispatchError, RegistryError};
use crate::skill::{SkillBehavior, SkillId};

/// Data-driven override of one skill's availability.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillLimit {
    pub id: SkillId,
    /// Informational label from the data file.
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: Option<String>,
    pub max_level: u8,
    #[cfg_attr(feature = "serde", serde(default = "enabled_by_default"))]
    pub enabled: bool,
}

#[cfg(feature = "serde")]
fn enabled_by_default() -> bool {
    true
}

/// A registered behavior with its effective level cap.
#[derive(Clone)]
pub struct RegisteredSkill {
    behavior: Arc<dyn SkillBehavior>,
    max_level: u8,
}

impl RegisteredSkill {
    pub fn behavior(&self) -> &dyn SkillBehavior {
        self.behavior.as_ref()
    }

    pub fn max_level(&self) -> u8 {
        self.max_level
    }
}

impl std::fmt::Debug for RegisteredSkill {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredSkill")
            .field("id", &self.behavior.id())
            .field("name", &self.behavior.name())
            .field("max_level", &self.max_level)
            .finish()
    }
}

/// Startup-time builder. Every error it returns is fatal for initialization.
#[derive(Debug, Default)]
pub struct SkillRegistryBuilder {
    entries: BTreeMap<SkillId, RegisteredSkill>,
}

impl SkillRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `behavior` to `id`.
    ///
    /// Fails if `id` is already bound or the behavior reports another id.
    pub fn register<B>(&mut self, id: SkillId, behavior: B) -> Result<&mut Self, RegistryError>
    where
        B: SkillBehavior + 'static,
    {
        self.register_shared(id, Arc::new(behavior))
    }

    pub fn register_shared(
        &mut self,
        id: SkillId,
        behavior: Arc<dyn SkillBehavior>,
    ) -> Result<&mut Self, RegistryError> {
        if behavior.id() != id {
            let err = RegistryError::IdMismatch {
                registered: id,
                reported: behavior.id(),
                name: behavior.name(),
            };
            error!(target: "combat::registry", skill = %id, error = %err, "registration failed");
            return Err(err);
        }
        if let Some(existing) = self.entries.get(&id) {
            let err = RegistryError::DuplicateRegistration {
                skill: id,
                existing: existing.behavior.name(),
            };
            error!(target: "combat::registry", skill = %id, error = %err, "registration failed");
            return Err(err);
        }

        let max_level = behavior.max_level().clamp(1, CombatConfig::MAX_SKILL_LEVEL);
        debug!(
            target: "combat::registry",
            skill = %id,
            name = behavior.name(),
            max_level,
            "skill registered"
        );
        self.entries.insert(id, RegisteredSkill { behavior, max_level });
        Ok(self)
    }

    /// Lowers a skill's level cap or removes it from the table.
    ///
    /// A limit may not raise the cap above what the behavior declares.
    pub fn apply_limit(&mut self, limit: &SkillLimit) -> Result<&mut Self, RegistryError> {
        let Some(entry) = self.entries.get_mut(&limit.id) else {
            let err = RegistryError::UnknownSkill { skill: limit.id };
            error!(target: "combat::registry", skill = %limit.id, error = %err, "invalid skill limit");
            return Err(err);
        };

        let cap = entry.behavior.max_level().min(CombatConfig::MAX_SKILL_LEVEL);
        if limit.max_level == 0 || limit.max_level > cap {
            let err = RegistryError::InvalidLimit {
                skill: limit.id,
                max_level: limit.max_level,
                cap,
            };
            error!(target: "combat::registry", skill = %limit.id, error = %err, "invalid skill limit");
            return Err(err);
        }

        if limit.enabled {
            entry.max_level = limit.max_level;
        } else {
            self.entries.remove(&limit.id);
            debug!(target: "combat::registry", skill = %limit.id, "skill disabled");
        }
        Ok(self)
    }

    pub fn apply_limits<'a>(
        &mut self,
        limits: impl IntoIterator<Item = &'a SkillLimit>,
    ) -> Result<&mut Self, RegistryError> {
        for limit in limits {
            self.apply_limit(limit)?;
        }
        Ok(self)
    }

    pub fn build(self) -> SkillRegistry {
        debug!(target: "combat::registry", skills = self.entries.len(), "registry frozen");
        SkillRegistry {
            entries: self.entries,
        }
    }
}

/// Frozen id → behavior table.
#[derive(Debug, Default)]
pub struct SkillRegistry {
    entries: BTreeMap<SkillId, RegisteredSkill>,
}

impl SkillRegistry {
    pub fn builder() -> SkillRegistryBuilder {
        SkillRegistryBuilder::new()
    }

    pub fn lookup(&self, id: SkillId) -> Option<&RegisteredSkill> {
        self.entries.get(&id)
    }

    /// Like [`Self::lookup`] but reports a miss as [`DispatchError::NotFound`].
    pub fn resolve(&self, id: SkillId) -> Result<&RegisteredSkill, DispatchError> {
        self.lookup(id).ok_or(DispatchError::NotFound { skill: id })
    }

    pub fn contains(&self, id: SkillId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Registered ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = SkillId> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
