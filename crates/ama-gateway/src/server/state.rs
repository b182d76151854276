//! Gateway state
//!
//! Application state for the subscribe endpoints.

use super::OriginPolicy;
use crate::hub::Hub;
use ama_service::ServiceContext;
use std::sync::Arc;

/// Gateway application state
///
/// Holds all shared dependencies for the subscribe endpoints.
#[derive(Clone)]
pub struct GatewayState {
    /// Service context with repositories and services
    service_context: Arc<ServiceContext>,
    /// Real-time hub
    hub: Arc<Hub>,
    /// Origin policy for upgrades
    origin_policy: Arc<OriginPolicy>,
}

impl GatewayState {
    /// Create a new gateway state
    pub fn new(
        service_context: Arc<ServiceContext>,
        hub: Arc<Hub>,
        origin_policy: OriginPolicy,
    ) -> Self {
        Self {
            service_context,
            hub,
            origin_policy: Arc::new(origin_policy),
        }
    }

    /// Get the service context
    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    /// Get the hub
    pub fn hub(&self) -> &Arc<Hub> {
        &self.hub
    }

    /// Get the origin policy
    pub fn origin_policy(&self) -> &OriginPolicy {
        &self.origin_policy
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("hub", &self.hub)
            .field("origin_policy", &self.origin_policy)
            .finish_non_exhaustive()
    }
}
