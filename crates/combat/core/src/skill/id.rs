use std::fmt;

/// Opaque, stable key of a skill.
///
/// Ids arrive from commands and data files, so an unknown id is ordinary
/// input: registry lookups return `None` instead of panicking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SkillId(pub u16);

impl SkillId {
    pub const fn raw(self) -> u16 {
        self.0
    }
}

impl fmt::Display for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for SkillId {
    fn from(value: u16) -> Self {
        Self(value)
    }
}
