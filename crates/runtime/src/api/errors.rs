//! Unified error types surfaced by the runtime API.
//!
//! Cast failures never appear here: they are carried inside
//! [`combat_core::CastOutcome`]. These errors cover worker coordination and
//! startup.
use thiserror::Error;
use tokio::sync::oneshot;

use combat_core::{ClassifiedError, EntityId, ErrorSeverity, RegistryError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("simulation worker command channel closed")]
    CommandChannelClosed,

    #[error("simulation worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("simulation worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("actor {id} already exists")]
    DuplicateActor { id: EntityId },

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Content(#[from] anyhow::Error),
}

impl ClassifiedError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::CommandChannelClosed | Self::ReplyChannelClosed(_) | Self::WorkerJoin(_) => {
                ErrorSeverity::Internal
            }
            Self::DuplicateActor { .. } => ErrorSeverity::Validation,
            Self::Registry(_) | Self::Content(_) => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::CommandChannelClosed => "RUNTIME_COMMAND_CHANNEL_CLOSED",
            Self::ReplyChannelClosed(_) => "RUNTIME_REPLY_CHANNEL_CLOSED",
            Self::WorkerJoin(_) => "RUNTIME_WORKER_JOIN",
            Self::DuplicateActor { .. } => "RUNTIME_DUPLICATE_ACTOR",
            Self::Registry(err) => err.error_code(),
            Self::Content(_) => "RUNTIME_CONTENT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::SkillId;

    #[test]
    fn registry_failures_stay_fatal_and_keep_their_code() {
        let err = RuntimeError::from(RegistryError::UnknownSkill { skill: SkillId(9) });
        assert!(err.severity().is_fatal());
        assert_eq!(err.error_code(), "REGISTRY_UNKNOWN_SKILL");
    }

    #[test]
    fn duplicate_actor_is_a_validation_error() {
        let err = RuntimeError::DuplicateActor { id: EntityId(4) };
        assert_eq!(err.severity(), ErrorSeverity::Validation);
        assert_eq!(err.to_string(), "actor #4 already exists");
    }
}
