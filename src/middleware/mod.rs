//! Request middleware subsystem.
//!
//! # Data Flow
//! ```text
//! Matched rule (ordered middleware chain)
//!     → pipeline.rs (apply each step in declared order)
//!     → transformed RequestContext
//!     → handed to the dispatcher unchanged from here on
//! ```
//!
//! # Design Decisions
//! - Middleware kinds form a closed, enumerable set (tagged enum), not an
//!   open trait hierarchy; the config surface is declarative labels
//! - Steps are pure transformations over an in-memory context; no I/O
//! - No step may roll back an earlier step

use serde::{Deserialize, Serialize};

pub mod pipeline;

pub use pipeline::{Pipeline, RequestContext, RouteInfo};

/// A single request transformation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Middleware {
    /// Remove a literal prefix from the request path before forwarding.
    ///
    /// A path that does not start with the prefix is left untouched; a path
    /// exactly equal to the prefix becomes "/".
    StripPrefix { prefix: String },

    /// Set (or overwrite) an outgoing request header.
    ///
    /// The value is a template; `{entrypoint}` and `{router}` are replaced
    /// with the identifiers the matcher resolved for this request.
    AddRequestHeader { name: String, value: String },
}
