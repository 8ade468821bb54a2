//! Router error taxonomy.
//!
//! # Design Decisions
//! - Load-time errors (config, duplicate ids, missing variables) are fatal
//!   and abort startup
//! - Request-time errors map to an HTTP status and never crash the process
//! - No retry logic lives here; surfacing the error is the contract

use axum::http::StatusCode;
use thiserror::Error;

/// All errors produced by the router.
#[derive(Debug, Error)]
pub enum RouterError {
    /// Two rules were declared with the same id.
    #[error("duplicate rule id: {0}")]
    DuplicateRuleId(String),

    /// No rule matched the request. Yields a 404 response.
    #[error("no route for entrypoint={entrypoint} host={host} path={path}")]
    NoRoute {
        entrypoint: String,
        host: String,
        path: String,
    },

    /// The target service refused or dropped the connection.
    #[error("upstream {service} unavailable: {reason}")]
    UpstreamUnavailable { service: String, reason: String },

    /// The target service did not answer within the request deadline.
    #[error("upstream {service} timed out after {timeout_secs}s")]
    UpstreamTimeout { service: String, timeout_secs: u64 },

    /// A required configuration variable was unset at startup.
    #[error("required configuration variable {0} is not set")]
    MissingVariable(String),

    /// A host-rule expression could not be parsed.
    #[error("invalid host rule expression {expr:?}: {reason}")]
    InvalidHostRule { expr: String, reason: String },

    /// A route referenced a middleware id that was never declared.
    #[error("route {route} references undeclared middleware {middleware}")]
    UnknownMiddleware { route: String, middleware: String },
}

impl RouterError {
    /// HTTP status a request-time error is converted to.
    ///
    /// Load-time variants never reach a response; they abort startup before
    /// the server accepts connections.
    pub fn status(&self) -> StatusCode {
        match self {
            RouterError::NoRoute { .. } => StatusCode::NOT_FOUND,
            RouterError::UpstreamUnavailable { .. } => StatusCode::BAD_GATEWAY,
            RouterError::UpstreamTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
