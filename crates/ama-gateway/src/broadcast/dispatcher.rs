//! Event dispatcher
//!
//! Receives committed events from services and fans them out to the
//! subscribers of each event's scope.

use crate::connection::ConnectionRegistry;
use crate::protocol::Frame;
use ama_core::{EventEnvelope, EventPublisher};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Configuration for the event dispatcher
#[derive(Debug, Clone)]
pub struct EventDispatcherConfig {
    /// Events queued for fan-out before new ones are dropped
    pub queue_capacity: usize,
}

impl Default for EventDispatcherConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 1024,
        }
    }
}

/// Outcome of fanning one event out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Subscribers that accepted the frame
    pub delivered: usize,
    /// Subscribers evicted because their buffer was full or closed
    pub evicted: usize,
}

/// Event dispatcher that routes published events to WebSocket connections
///
/// A single worker drains the queue, so every subscriber observes events in
/// publish order.
pub struct EventDispatcher {
    /// Registry of live subscribers
    registry: Arc<ConnectionRegistry>,
    /// Intake side of the queue
    sender: mpsc::Sender<EventEnvelope>,
    /// Drain side, taken by the worker on start
    receiver: Mutex<Option<mpsc::Receiver<EventEnvelope>>>,
    /// Whether the dispatcher is running
    running: AtomicBool,
    /// Whether publish still accepts events
    accepting: AtomicBool,
    /// Stops the worker
    shutdown: CancellationToken,
    /// Worker task
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl EventDispatcher {
    /// Create a new event dispatcher
    pub fn new(config: EventDispatcherConfig, registry: Arc<ConnectionRegistry>) -> Self {
        let (sender, receiver) = mpsc::channel(config.queue_capacity.max(1));

        Self {
            registry,
            sender,
            receiver: Mutex::new(Some(receiver)),
            running: AtomicBool::new(false),
            accepting: AtomicBool::new(true),
            shutdown: CancellationToken::new(),
            worker: Mutex::new(None),
        }
    }

    /// Start the event dispatcher
    ///
    /// This spawns the background task that drains the queue.
    pub fn start(self: Arc<Self>) {
        if self.running.swap(true, Ordering::SeqCst) {
            tracing::warn!("Event dispatcher is already running");
            return;
        }

        let Some(receiver) = self.receiver.lock().take() else {
            tracing::warn!("Event dispatcher cannot be restarted");
            self.running.store(false, Ordering::SeqCst);
            return;
        };

        let dispatcher = self.clone();
        let handle = tokio::spawn(async move {
            dispatcher.run(receiver).await;
        });
        *self.worker.lock() = Some(handle);

        tracing::info!("Event dispatcher started");
    }

    /// Stop the event dispatcher
    ///
    /// Stops intake, delivers what is already queued, and waits for the worker.
    pub async fn stop(&self) {
        self.accepting.store(false, Ordering::SeqCst);
        self.shutdown.cancel();

        let worker = self.worker.lock().take();
        if let Some(worker) = worker {
            if let Err(e) = worker.await {
                tracing::error!(error = %e, "Event dispatcher worker failed");
            }
        }

        self.running.store(false, Ordering::SeqCst);
        tracing::info!("Event dispatcher stopped");
    }

    /// Run the event dispatcher loop
    async fn run(&self, mut receiver: mpsc::Receiver<EventEnvelope>) {
        loop {
            tokio::select! {
                biased;
                envelope = receiver.recv() => match envelope {
                    Some(envelope) => {
                        self.deliver(&envelope);
                    }
                    None => break,
                },
                () = self.shutdown.cancelled() => {
                    receiver.close();
                    while let Ok(envelope) = receiver.try_recv() {
                        self.deliver(&envelope);
                    }
                    break;
                }
            }
        }

        tracing::info!("Event dispatcher loop ended");
    }

    /// Fan one event out to the current subscribers of its scope.
    ///
    /// The event is serialized once. A subscriber that cannot take the frame
    /// right away is evicted; the remaining subscribers still receive it.
    pub fn deliver(&self, envelope: &EventEnvelope) -> DeliveryReport {
        let scope = envelope.scope();
        let subscribers = self.registry.snapshot(scope);
        let mut report = DeliveryReport::default();

        if subscribers.is_empty() {
            tracing::trace!(scope = %scope, kind = envelope.kind(), "No subscribers for event");
            return report;
        }

        let frame: Frame = match envelope.to_json() {
            Ok(json) => Frame::from(json),
            Err(e) => {
                tracing::error!(error = %e, kind = envelope.kind(), "Failed to serialize event");
                return report;
            }
        };

        for subscriber in subscribers {
            match subscriber.try_send(frame.clone()) {
                Ok(()) => report.delivered += 1,
                Err(TrySendError::Full(_)) => {
                    tracing::warn!(
                        connection_id = %subscriber.id(),
                        scope = %scope,
                        "Subscriber buffer full, evicting slow consumer"
                    );
                    subscriber.evict();
                    self.registry.unsubscribe(scope, subscriber.id());
                    report.evicted += 1;
                }
                Err(TrySendError::Closed(_)) => {
                    tracing::debug!(
                        connection_id = %subscriber.id(),
                        scope = %scope,
                        "Subscriber channel closed, removing"
                    );
                    subscriber.evict();
                    self.registry.unsubscribe(scope, subscriber.id());
                    report.evicted += 1;
                }
            }
        }

        tracing::trace!(
            scope = %scope,
            kind = envelope.kind(),
            delivered = report.delivered,
            evicted = report.evicted,
            "Event dispatched"
        );

        report
    }

    /// Check if the dispatcher is running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl EventPublisher for EventDispatcher {
    fn publish(&self, envelope: EventEnvelope) {
        if !self.accepting.load(Ordering::SeqCst) {
            tracing::debug!(kind = envelope.kind(), "Dispatcher stopped, dropping event");
            return;
        }

        match self.sender.try_send(envelope) {
            Ok(()) => {}
            Err(TrySendError::Full(envelope)) => {
                tracing::warn!(
                    kind = envelope.kind(),
                    scope = %envelope.scope(),
                    "Publish queue full, dropping event"
                );
            }
            Err(TrySendError::Closed(envelope)) => {
                tracing::debug!(kind = envelope.kind(), "Publish queue closed, dropping event");
            }
        }
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("running", &self.is_running())
            .field("accepting", &self.accepting.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}
