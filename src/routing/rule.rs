//! Rule and entrypoint definitions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::middleware::Middleware;
use crate::routing::matcher::HostPredicate;

/// A named network listener through which a request arrives.
///
/// The set is fixed at process start; entrypoints are never created or
/// destroyed dynamically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Entrypoint {
    /// Public HTTP.
    Web,
    /// Public HTTPS.
    Websecure,
    /// Private LAN HTTP.
    Lanweb,
    /// Private LAN HTTPS.
    Lanwebsecure,
}

impl Entrypoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Entrypoint::Web => "web",
            Entrypoint::Websecure => "websecure",
            Entrypoint::Lanweb => "lanweb",
            Entrypoint::Lanwebsecure => "lanwebsecure",
        }
    }

    /// All entrypoints, in a stable order.
    pub fn all() -> [Entrypoint; 4] {
        [
            Entrypoint::Web,
            Entrypoint::Websecure,
            Entrypoint::Lanweb,
            Entrypoint::Lanwebsecure,
        ]
    }
}

impl fmt::Display for Entrypoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A compiled routing rule: matcher, middleware chain and target service.
///
/// Rules own their middleware chains; the target service is referenced by
/// name and resolved against the registry at dispatch time.
#[derive(Debug, Clone)]
pub struct Rule {
    /// Unique rule identifier.
    pub id: String,

    /// Entrypoint this rule applies to.
    pub entrypoint: Entrypoint,

    /// Host predicate (exact hostname or parsed host-rule expression).
    pub host: HostPredicate,

    /// Optional path prefix, matched at a segment boundary.
    pub path_prefix: Option<String>,

    /// Middleware chain, applied in order after a match.
    pub middlewares: Vec<Middleware>,

    /// Target service name.
    pub service: String,
}
