use crate::error::DispatchError;
use crate::skill::{CastEffect, ModeFlags, SkillId};
use crate::state::{EntityId, Tick};

/// Stage of the cast-resolution state machine.
///
/// ```text
/// Requested → Validated → RatioResolved → Executed → Completed
///     │           │                          │
///     └───────────┴──────→ Rejected          └──→ Deferred → Executed ...
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CastPhase {
    Requested,
    Validated,
    RatioResolved,
    Executed,
    Deferred,
    Completed,
    Rejected,
}

impl CastPhase {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Requested => "requested",
            Self::Validated => "validated",
            Self::RatioResolved => "ratio_resolved",
            Self::Executed => "executed",
            Self::Deferred => "deferred",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
        }
    }

    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Rejected)
    }

    /// Whether the pipeline may move from `self` to `next`.
    pub const fn can_transition_to(&self, next: CastPhase) -> bool {
        use CastPhase::*;
        matches!(
            (self, next),
            (Requested, Validated)
                | (Requested, Rejected)
                | (Validated, RatioResolved)
                | (Validated, Rejected)
                | (RatioResolved, Executed)
                | (Executed, Deferred)
                | (Executed, Completed)
                | (Deferred, Executed)
                | (Deferred, Rejected)
        )
    }
}

/// What a completed or deferred cast did.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CastReport {
    pub skill: SkillId,
    pub caster: EntityId,
    pub level: u8,
    pub tick: Tick,
    pub flags: ModeFlags,
    /// Final accumulated ratio in percentage points.
    pub ratio: i32,
    pub hit_rate: i32,
    pub effect: CastEffect,
    /// Number of re-entries scheduled by this execution.
    pub deferrals: usize,
    /// Skill that forwarded into this one, if any.
    pub via: Option<SkillId>,
}

/// Terminal result of [`super::CombatDispatcher::dispatch`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CastOutcome {
    Completed(CastReport),
    Deferred(CastReport),
    Rejected {
        skill: SkillId,
        phase: CastPhase,
        error: DispatchError,
    },
}

impl CastOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, Self::Deferred(_))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }

    pub fn report(&self) -> Option<&CastReport> {
        match self {
            Self::Completed(report) | Self::Deferred(report) => Some(report),
            Self::Rejected { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&DispatchError> {
        match self {
            Self::Rejected { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Integer success signal of the executed step; 0 when rejected.
    pub fn code(&self) -> i32 {
        self.report().map_or(0, |report| report.effect.code())
    }

    pub(crate) fn forwarded_from(mut self, origin: SkillId) -> Self {
        if let Self::Completed(report) | Self::Deferred(report) = &mut self {
            report.via.get_or_insert(origin);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_transitions_are_legal() {
        let path = [
            CastPhase::Requested,
            CastPhase::Validated,
            CastPhase::RatioResolved,
            CastPhase::Executed,
            CastPhase::Deferred,
            CastPhase::Executed,
            CastPhase::Completed,
        ];
        for pair in path.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]), "{:?}", pair);
        }
    }

    #[test]
    fn terminal_phases_do_not_advance() {
        for next in [CastPhase::Executed, CastPhase::Validated, CastPhase::Completed] {
            assert!(!CastPhase::Completed.can_transition_to(next));
            assert!(!CastPhase::Rejected.can_transition_to(next));
        }
        assert!(CastPhase::Rejected.is_terminal());
        assert!(!CastPhase::Deferred.is_terminal());
    }

    #[test]
    fn ratio_stage_cannot_reject() {
        assert!(!CastPhase::RatioResolved.can_transition_to(CastPhase::Rejected));
        assert_eq!(CastPhase::RatioResolved.as_str(), "ratio_resolved");
    }
}
