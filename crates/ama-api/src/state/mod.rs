//! Application state
//!
//! Holds the shared state for the Axum application including
//! the service context, the real-time hub and configuration.

use std::sync::Arc;

use ama_common::{AppConfig, JwtService};
use ama_gateway::{GatewayState, Hub, OriginPolicy};
use ama_service::ServiceContext;
use axum::extract::FromRef;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Service context and hub, shared with the subscribe routes
    gateway: GatewayState,
    /// Token validation
    jwt_service: Arc<JwtService>,
    /// Application configuration
    config: Arc<AppConfig>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(
        service_context: ServiceContext,
        hub: Arc<Hub>,
        jwt_service: JwtService,
        config: AppConfig,
    ) -> Self {
        let origin_policy = OriginPolicy::from_config(&config);
        Self {
            gateway: GatewayState::new(Arc::new(service_context), hub, origin_policy),
            jwt_service: Arc::new(jwt_service),
            config: Arc::new(config),
        }
    }

    /// Get the service context
    pub fn service_context(&self) -> &ServiceContext {
        self.gateway.service_context()
    }

    /// Get the real-time hub
    pub fn hub(&self) -> &Arc<Hub> {
        self.gateway.hub()
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get the JWT service
    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }
}

impl FromRef<AppState> for GatewayState {
    fn from_ref(state: &AppState) -> Self {
        state.gateway.clone()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("gateway", &self.gateway)
            .field("config", &"AppConfig")
            .finish()
    }
}
