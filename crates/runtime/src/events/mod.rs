//! Event bus carrying combat events and tick reports to subscribers.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::TickReport;
