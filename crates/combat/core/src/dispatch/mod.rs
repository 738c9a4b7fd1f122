//! Cast-resolution pipeline.
//!
//! [`CombatDispatcher`] is the single entry the tick loop calls. It resolves
//! the skill, validates the cast, folds hit-rate and ratio adjustments into
//! the context, executes the skill's entry for its target kind and handles
//! what the skill asks for next: placing a unit group, deferring to a later
//! tick or forwarding into another skill.
mod dispatcher;
mod phase;

#[cfg(test)]
mod tests;

pub use dispatcher::CombatDispatcher;
pub use phase::{CastOutcome, CastPhase, CastReport};
