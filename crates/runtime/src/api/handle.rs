//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! casting, advancing time, or streaming events from specific topics.
use tokio::sync::{broadcast, mpsc, oneshot};

use combat_core::CastOutcome;

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, TickReport, Topic};
use crate::simulation::{CastRequest, WorldSnapshot};
use crate::workers::Command;
use crate::world::Actor;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(build(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Run one cast at the current tick.
    ///
    /// A rejected cast is a normal outcome, not an error.
    pub async fn cast(&self, request: CastRequest) -> Result<CastOutcome> {
        self.request(|reply| Command::Cast { request, reply }).await
    }

    /// Advance the simulation by `ticks` ticks
    pub async fn advance(&self, ticks: u64) -> Result<Vec<TickReport>> {
        self.request(|reply| Command::Advance { ticks, reply }).await
    }

    /// Add an actor to the world
    pub async fn spawn(&self, actor: Actor) -> Result<()> {
        self.request(|reply| Command::Spawn { actor, reply }).await?
    }

    /// Query the current world (read-only snapshot)
    pub async fn query_world(&self) -> Result<WorldSnapshot> {
        self.request(|reply| Command::QueryWorld { reply }).await
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Combat` - Every combat event emitted while resolving casts
    /// - `Topic::Tick` - One report per advanced tick
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use combat_runtime::Topic;
    ///
    /// let mut ticks = handle.subscribe(Topic::Tick);
    /// while let Ok(event) = ticks.recv().await {
    ///     // Handle tick reports
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> std::collections::HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
