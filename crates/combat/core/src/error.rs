//! Error taxonomy for skill registration and cast dispatch.
//!
//! Two classes exist:
//!
//! - [`RegistryError`] is raised while the skill table is built. It is the only
//!   fatal class and aborts startup before any tick runs.
//! - [`DispatchError`] describes why a single cast was rejected. The dispatcher
//!   absorbs it into [`crate::dispatch::CastOutcome::Rejected`] plus a log line;
//!   it never escapes to the tick loop.

use crate::skill::SkillId;

/// Severity level of an error, used for logging priority and recovery.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Transient condition; the same cast may succeed later.
    ///
    /// Examples: target out of range
    Recoverable,

    /// Malformed input; retrying unchanged will fail again.
    ///
    /// Examples: unknown skill id, level above the cap
    Validation,

    /// Unexpected inconsistency worth investigating.
    Internal,

    /// Startup cannot continue.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal)
    }
}

/// Uniform classification shared by every error type in the workspace.
pub trait ClassifiedError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier for the variant, suitable for metrics and tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Why a target failed the liveness or shape checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum TargetFault {
    CasterGone,
    TargetGone,
    OutOfRange,
    /// Entity target supplied to a ground skill or the reverse.
    WrongTargetKind,
}

/// Reasons a cast is rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DispatchError {
    #[error("skill {skill} is not registered")]
    NotFound { skill: SkillId },

    #[error("skill {skill} cast at level {level}, valid range is 1..={max}")]
    InvalidLevel { skill: SkillId, level: u8, max: u8 },

    #[error("skill {skill} has an invalid target: {reason}")]
    InvalidTarget { skill: SkillId, reason: TargetFault },

    #[error("deferred cast of skill {skill} lost its target before resuming")]
    SuspensionInvalidated { skill: SkillId },

    #[error("skill {skill} exceeded the forwarding depth limit ({depth})")]
    ChainTooDeep { skill: SkillId, depth: u8 },
}

impl DispatchError {
    pub fn skill(&self) -> SkillId {
        match *self {
            Self::NotFound { skill }
            | Self::InvalidLevel { skill, .. }
            | Self::InvalidTarget { skill, .. }
            | Self::SuspensionInvalidated { skill }
            | Self::ChainTooDeep { skill, .. } => skill,
        }
    }
}

impl ClassifiedError for DispatchError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotFound { .. } | Self::InvalidLevel { .. } => ErrorSeverity::Validation,
            Self::InvalidTarget { reason, .. } => match reason {
                TargetFault::OutOfRange => ErrorSeverity::Recoverable,
                _ => ErrorSeverity::Validation,
            },
            Self::SuspensionInvalidated { .. } => ErrorSeverity::Recoverable,
            Self::ChainTooDeep { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "DISPATCH_NOT_FOUND",
            Self::InvalidLevel { .. } => "DISPATCH_INVALID_LEVEL",
            Self::InvalidTarget { .. } => "DISPATCH_INVALID_TARGET",
            Self::SuspensionInvalidated { .. } => "DISPATCH_SUSPENSION_INVALIDATED",
            Self::ChainTooDeep { .. } => "DISPATCH_CHAIN_TOO_DEEP",
        }
    }
}

/// Errors raised while building the skill registry.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("skill {skill} is already registered as `{existing}`")]
    DuplicateRegistration { skill: SkillId, existing: &'static str },

    #[error("behavior `{name}` reports id {reported} but was registered under {registered}")]
    IdMismatch {
        registered: SkillId,
        reported: SkillId,
        name: &'static str,
    },

    #[error("skill limit refers to unregistered skill {skill}")]
    UnknownSkill { skill: SkillId },

    #[error("skill {skill} limit {max_level} is outside 1..={cap}")]
    InvalidLimit { skill: SkillId, max_level: u8, cap: u8 },
}

impl ClassifiedError for RegistryError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateRegistration { .. } => "REGISTRY_DUPLICATE",
            Self::IdMismatch { .. } => "REGISTRY_ID_MISMATCH",
            Self::UnknownSkill { .. } => "REGISTRY_UNKNOWN_SKILL",
            Self::InvalidLimit { .. } => "REGISTRY_INVALID_LIMIT",
        }
    }
}
