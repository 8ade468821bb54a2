//! Upstream subsystem: service registry and dispatch.
//!
//! # Data Flow
//! ```text
//! Matched rule (service name)
//!     → service.rs (registry lookup, health gate)
//!     → dispatcher.rs (rewrite authority, forward, enforce deadline)
//!     → Response relayed to the caller unchanged
//! ```
//!
//! # Design Decisions
//! - Services are registered at startup and never mutated by the router
//!   itself; health flips come from an external collaborator
//! - The dispatcher never retries; surfacing the failure is its contract
//! - Every dispatch carries a deadline derived from config

pub mod dispatcher;
pub mod service;

pub use dispatcher::Dispatcher;
pub use service::{Service, ServiceRegistry};
