//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::middleware::Middleware;
use crate::routing::Entrypoint;

/// Root configuration for the edge router.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// Listener bind addresses, one per entrypoint.
    pub entrypoints: EntrypointsConfig,

    /// Routing rule definitions.
    pub routes: Vec<RouteConfig>,

    /// Named middleware definitions referenced by routes.
    pub middlewares: Vec<MiddlewareConfig>,

    /// Upstream service definitions.
    pub services: Vec<ServiceConfig>,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Bind addresses for the fixed entrypoint set.
///
/// An entrypoint left unset is not served. The usual hub layout binds the
/// public listeners on 80/443 and the LAN listeners on 7080/7443.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct EntrypointsConfig {
    pub web: Option<String>,
    pub websecure: Option<String>,
    pub lanweb: Option<String>,
    pub lanwebsecure: Option<String>,
}

impl EntrypointsConfig {
    /// Iterate over configured (entrypoint, bind address) pairs.
    pub fn bindings(&self) -> impl Iterator<Item = (Entrypoint, &str)> {
        [
            (Entrypoint::Web, self.web.as_deref()),
            (Entrypoint::Websecure, self.websecure.as_deref()),
            (Entrypoint::Lanweb, self.lanweb.as_deref()),
            (Entrypoint::Lanwebsecure, self.lanwebsecure.as_deref()),
        ]
        .into_iter()
        .filter_map(|(ep, addr)| addr.map(|a| (ep, a)))
    }
}

/// A single routing rule.
///
/// Exactly one of `host` (exact hostname) or `host_rule` (platform-injected
/// predicate expression) must be set; `path_prefix` further narrows the
/// match.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Unique rule identifier for logging/metrics and header templates.
    pub id: String,

    /// Entrypoint this rule listens on.
    pub entrypoint: Entrypoint,

    /// Exact hostname to match (case-insensitive).
    #[serde(default)]
    pub host: Option<String>,

    /// Host-rule expression, e.g. `` Host(`a.example.com`) || Host(`b.example.com`) ``.
    #[serde(default)]
    pub host_rule: Option<String>,

    /// Path prefix to match, at a segment boundary.
    #[serde(default)]
    pub path_prefix: Option<String>,

    /// Middleware ids applied in order before dispatch.
    #[serde(default)]
    pub middlewares: Vec<String>,

    /// Target service name.
    pub service: String,
}

/// A named middleware definition.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MiddlewareConfig {
    /// Unique middleware identifier.
    pub id: String,

    /// The transformation itself.
    #[serde(flatten)]
    pub middleware: Middleware,
}

/// Upstream service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    /// Unique service name referenced by routes.
    pub name: String,

    /// Reachable address (e.g., "127.0.0.1:3000").
    pub address: String,
}

/// Timeout configuration for dispatch.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Per-request deadline (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
