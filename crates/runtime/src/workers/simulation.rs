//! Simulation worker that owns the authoritative [`Simulation`].
//!
//! Receives commands from [`crate::RuntimeHandle`], runs them one at a time
//! in arrival order, and publishes the resulting events to the EventBus.

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use combat_core::CastOutcome;

use crate::api::Result;
use crate::events::{Event, EventBus, TickReport};
use crate::simulation::{CastRequest, Simulation, WorldSnapshot};
use crate::world::Actor;

/// Commands that can be sent to the simulation worker
pub enum Command {
    /// Run one cast at the current tick.
    Cast {
        request: CastRequest,
        reply: oneshot::Sender<CastOutcome>,
    },
    /// Advance simulated time.
    Advance {
        ticks: u64,
        reply: oneshot::Sender<Vec<TickReport>>,
    },
    /// Add an actor to the world.
    Spawn {
        actor: Actor,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Query the current world (read-only).
    QueryWorld {
        reply: oneshot::Sender<WorldSnapshot>,
    },
}

/// Background task that processes combat commands.
///
/// Owning the simulation inside a single task is what gives casts their
/// exclusive access to entity state; nothing in here takes a lock.
pub struct SimulationWorker {
    simulation: Simulation,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
}

impl SimulationWorker {
    pub fn new(
        simulation: Simulation,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
    ) -> Self {
        info!(
            target: "runtime::worker",
            actors = simulation.world().actors().count(),
            skills = simulation.dispatcher().registry().len(),
            tick = %simulation.now(),
            "simulation worker initialized"
        );

        Self {
            simulation,
            command_rx,
            event_bus,
        }
    }

    /// Main worker loop. Ends once every handle is dropped.
    pub async fn run(mut self) {
        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd);
        }
        info!(target: "runtime::worker", tick = %self.simulation.now(), "simulation worker stopped");
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Cast { request, reply } => {
                let outcome = self.simulation.cast(request);
                self.publish_events();
                if reply.send(outcome).is_err() {
                    debug!(target: "runtime::worker", "Cast reply channel closed (caller dropped)");
                }
            }
            Command::Advance { ticks, reply } => {
                let reports = self.simulation.advance(ticks);
                self.publish_events();
                for report in &reports {
                    self.event_bus.publish(Event::Tick(*report));
                }
                if reply.send(reports).is_err() {
                    debug!(target: "runtime::worker", "Advance reply channel closed (caller dropped)");
                }
            }
            Command::Spawn { actor, reply } => {
                let result = self.simulation.spawn(actor);
                if reply.send(result).is_err() {
                    debug!(target: "runtime::worker", "Spawn reply channel closed (caller dropped)");
                }
            }
            Command::QueryWorld { reply } => {
                if reply.send(self.simulation.snapshot()).is_err() {
                    debug!(target: "runtime::worker", "QueryWorld reply channel closed (caller dropped)");
                }
            }
        }
    }

    fn publish_events(&mut self) {
        for event in self.simulation.drain_events() {
            self.event_bus.publish(Event::Combat(event));
        }
    }
}
