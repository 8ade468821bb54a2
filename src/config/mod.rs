//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML with ${VAR} references)
//!     → interpolate.rs (expand variables from env + overrides)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RouterConfig (validated, immutable)
//!     → compiled into RuleTable + ServiceRegistry
//!
//! On reload signal:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → atomic swap of the rule table snapshot
//!     → in-flight requests keep the snapshot they loaded
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All sections have defaults to allow minimal configs
//! - Variable interpolation happens before parsing, so host-rule
//!   expressions injected by the platform stay opaque strings

pub mod interpolate;
pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use interpolate::Interpolator;
pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    EntrypointsConfig, MiddlewareConfig, ObservabilityConfig, RouteConfig, RouterConfig,
    ServiceConfig, TimeoutConfig,
};
pub use watcher::ConfigWatcher;
