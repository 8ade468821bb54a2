//! Rule-Based HTTP Edge Router
//!
//! A small edge router in the reverse-proxy mould: requests arrive on one
//! of four fixed entrypoints (public/LAN × HTTP/HTTPS), are matched against
//! an ordered rule table, transformed by the matched rule's middleware
//! chain, and forwarded to a registered upstream service.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client Request ──▶ http (listener per entrypoint)
//!                          │
//!                          ▼
//!                      routing (rule table + matcher)
//!                          │ no match → 404
//!                          ▼
//!                      middleware (strip prefix, inject headers)
//!                          │
//!                          ▼
//!                      upstream (registry + dispatcher) ──▶ Backend
//!                          │ unavailable → 502, deadline → 504
//!                          ▼
//!   Client Response ◀── response relayed unchanged
//!
//!   Cross-cutting: config (interpolation, validation, hot reload),
//!   observability (tracing, metrics), lifecycle (graceful shutdown)
//! ```

// Core subsystems
pub mod config;
pub mod http;
pub mod middleware;
pub mod routing;
pub mod upstream;

// Cross-cutting concerns
pub mod error;
pub mod lifecycle;
pub mod observability;

pub use config::RouterConfig;
pub use error::RouterError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
