//! High-level runtime orchestrator.
//!
//! The runtime owns the simulation worker, wires up command/event channels,
//! and exposes a builder-based API for clients to drive combat.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

use combat_core::{CombatConfig, CombatDispatcher, SkillLimit, SkillRegistry, Tick};

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::events::EventBus;
use crate::simulation::Simulation;
use crate::workers::{Command, SimulationWorker};
use crate::world::Actor;

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub combat: CombatConfig,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Tick the world starts at.
    pub start_tick: Tick,
}

impl RuntimeConfig {
    pub fn new(combat: CombatConfig) -> Self {
        Self {
            combat,
            ..Self::default()
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            combat: CombatConfig::default(),
            event_buffer_size: 256,
            command_buffer_size: 32,
            start_tick: Tick::ZERO,
        }
    }
}

/// Main runtime that orchestrates the combat simulation
///
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    worker: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Shutdown the runtime gracefully
    ///
    /// The worker stops once every outstanding handle clone is dropped.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);
        self.worker.await.map_err(RuntimeError::WorkerJoin)
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    registry: Option<Arc<SkillRegistry>>,
    limits: Vec<SkillLimit>,
    actors: Vec<Actor>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            registry: None,
            limits: Vec::new(),
            actors: Vec::new(),
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a prebuilt registry instead of the built-in catalog
    pub fn registry(mut self, registry: Arc<SkillRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Level caps applied to the built-in catalog
    ///
    /// Ignored when a prebuilt registry is supplied.
    pub fn skill_limits(mut self, limits: impl IntoIterator<Item = SkillLimit>) -> Self {
        self.limits.extend(limits);
        self
    }

    /// Actors present when the worker starts
    pub fn actors(mut self, actors: impl IntoIterator<Item = Actor>) -> Self {
        self.actors.extend(actors);
        self
    }

    /// Build the simulation synchronously, without spawning a worker.
    ///
    /// Registry problems and duplicate actors are reported here, before any
    /// tick runs.
    pub fn build_simulation(self) -> Result<(RuntimeConfig, Simulation)> {
        let registry = match self.registry {
            Some(registry) => registry,
            None => Arc::new(combat_core::builtin_registry(&self.limits)?),
        };
        let dispatcher = Arc::new(CombatDispatcher::new(registry, self.config.combat.clone()));

        let mut simulation = Simulation::new(dispatcher, self.config.start_tick);
        for actor in self.actors {
            simulation.spawn(actor)?;
        }
        Ok((self.config, simulation))
    }

    /// Build the runtime and spawn its worker on the current tokio runtime.
    pub async fn build(self) -> Result<Runtime> {
        let (config, simulation) = self.build_simulation()?;

        let (command_tx, command_rx) = mpsc::channel::<Command>(config.command_buffer_size);
        let event_bus = EventBus::with_capacity(config.event_buffer_size);

        let worker = SimulationWorker::new(simulation, command_rx, event_bus.clone());
        let worker = tokio::spawn(worker.run());

        info!(
            target: "runtime::worker",
            ruleset = %config.combat.ruleset,
            seed = config.combat.rng_seed,
            "runtime started"
        );

        Ok(Runtime {
            handle: RuntimeHandle::new(command_tx, event_bus),
            worker,
        })
    }
}
