//! Real-time hub
//!
//! Owns the connection registry, the event dispatcher and the root
//! cancellation token every connection derives its own token from.

use crate::broadcast::{EventDispatcher, EventDispatcherConfig};
use crate::connection::ConnectionRegistry;
use ama_common::HubConfig;
use ama_core::EventPublisher;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// The real-time hub
pub struct Hub {
    config: HubConfig,
    registry: Arc<ConnectionRegistry>,
    dispatcher: Arc<EventDispatcher>,
    root: CancellationToken,
}

impl Hub {
    /// Create a hub; call [`Hub::start`] before publishing
    pub fn new(config: HubConfig) -> Self {
        let registry = ConnectionRegistry::new_shared();
        let dispatcher = Arc::new(EventDispatcher::new(
            EventDispatcherConfig {
                queue_capacity: config.publish_queue_capacity,
            },
            registry.clone(),
        ));

        Self {
            config,
            registry,
            dispatcher,
            root: CancellationToken::new(),
        }
    }

    /// Create and start a hub wrapped in Arc
    pub fn new_shared(config: HubConfig) -> Arc<Self> {
        let hub = Arc::new(Self::new(config));
        hub.start();
        hub
    }

    /// Start the dispatcher worker
    pub fn start(&self) {
        self.dispatcher.clone().start();
    }

    /// Publisher handed to the service layer
    pub fn publisher(&self) -> Arc<dyn EventPublisher> {
        self.dispatcher.clone()
    }

    /// Get the connection registry
    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Get the event dispatcher
    pub fn dispatcher(&self) -> &Arc<EventDispatcher> {
        &self.dispatcher
    }

    /// Token for a new connection; cancelled when the hub shuts down
    pub fn child_token(&self) -> CancellationToken {
        self.root.child_token()
    }

    /// Check if shutdown has begun
    pub fn is_shutting_down(&self) -> bool {
        self.root.is_cancelled()
    }

    /// Outbound frames buffered per connection
    pub fn connection_buffer(&self) -> usize {
        self.config.connection_buffer.max(1)
    }

    /// Shut the hub down.
    ///
    /// Every connection is cancelled, the dispatcher delivers what it has
    /// queued and stops, then this waits for connections to unregister,
    /// bounded by the configured shutdown timeout.
    pub async fn shutdown(&self) {
        tracing::info!(
            connections = self.registry.connection_count(),
            "Shutting down hub"
        );

        self.root.cancel();
        self.dispatcher.stop().await;

        let timeout = Duration::from_secs(self.config.shutdown_timeout_secs);
        if tokio::time::timeout(timeout, self.registry.wait_drained())
            .await
            .is_err()
        {
            tracing::warn!(
                remaining = self.registry.connection_count(),
                "Hub shutdown timed out waiting for connections"
            );
        } else {
            tracing::info!("Hub shut down");
        }
    }
}

impl std::fmt::Debug for Hub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hub")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}
