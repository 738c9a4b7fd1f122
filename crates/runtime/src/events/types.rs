//! Payloads published on each topic.

use serde::{Deserialize, Serialize};

use combat_core::Tick;

/// Summary of one simulated tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    pub tick: Tick,
    /// Deferred casts that resumed and executed.
    pub resumed: usize,
    /// Deferred casts rejected on resumption (caster or target gone).
    pub invalidated: usize,
    /// Unit groups that re-resolved their area.
    pub pulsed: usize,
    pub units_expired: usize,
    pub statuses_ended: usize,
}

impl TickReport {
    pub fn new(tick: Tick) -> Self {
        Self {
            tick,
            ..Self::default()
        }
    }
}
