//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection (one listener per entrypoint)
//!     → server.rs (Axum setup, layers)
//!     → request.rs (assign request ID)
//!     → rule table lookup
//!     → middleware pipeline
//!     → dispatcher (upstream)
//!     → response relayed to client
//! ```

pub mod request;
pub mod server;

pub use request::{RequestIdLayer, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
