//! Origin policy for subscribe upgrades

use super::GatewayError;
use ama_common::AppConfig;
use axum::http::{header, HeaderMap};

/// Which `Origin` headers may open a subscription
#[derive(Debug, Clone, Default)]
pub struct OriginPolicy {
    enforce: bool,
    allowed: Vec<String>,
}

impl OriginPolicy {
    /// Accept every origin
    pub fn permissive() -> Self {
        Self::default()
    }

    /// Accept only the listed origins
    pub fn restricted<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            enforce: true,
            allowed: allowed
                .into_iter()
                .map(|origin| normalize(origin.as_ref()).to_string())
                .collect(),
        }
    }

    /// Restricted in production, permissive elsewhere
    pub fn from_config(config: &AppConfig) -> Self {
        if config.app.env.is_production() {
            Self::restricted(config.allowed_origins())
        } else {
            Self::permissive()
        }
    }

    /// Check the request's `Origin` header
    pub fn check(&self, headers: &HeaderMap) -> Result<(), GatewayError> {
        if !self.enforce {
            return Ok(());
        }

        let origin = headers
            .get(header::ORIGIN)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        if self.allowed.iter().any(|allowed| allowed == normalize(origin)) {
            Ok(())
        } else {
            Err(GatewayError::ForbiddenOrigin(origin.to_string()))
        }
    }
}

fn normalize(origin: &str) -> &str {
    origin.trim().trim_end_matches('/')
}
