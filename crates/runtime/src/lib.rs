//! Host runtime for the skill-dispatch core.
//!
//! This crate supplies what `combat-core` leaves to its host: an in-memory
//! [`World`] implementing every collaborator trait, a synchronous
//! [`Simulation`] tick loop, and an async [`Runtime`] that owns the
//! simulation inside a single worker task.
//!
//! Modules are organized by responsibility:
//! - [`world`] holds actors, statuses, the timer queue and the damage model
//! - [`simulation`] runs casts and advances time
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`logging`] installs the tracing subscriber
pub mod api;
pub mod events;
pub mod logging;
pub mod runtime;
pub mod simulation;
pub mod world;

mod workers;

pub use api::{Result, RuntimeError, RuntimeHandle};
pub use events::{Event, EventBus, TickReport, Topic};
pub use logging::{LogConfig, LogGuard};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use simulation::{CastRequest, Simulation, WorldSnapshot};
pub use world::{Actor, ActorState, World};
