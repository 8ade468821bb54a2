//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (entrypoint, host, path)
//!     → table.rs (rule lookup over the current snapshot)
//!     → matcher.rs (evaluate host/path predicates, pick the winner)
//!     → Return: matched Rule or NoRoute
//!
//! Rule Compilation (at startup / reload):
//!     RouteConfig[] + MiddlewareConfig[]
//!     → Parse host predicates, resolve middleware chains
//!     → Freeze as immutable RuleTable
//!     → Published via atomic pointer swap
//! ```
//!
//! # Design Decisions
//! - Rules compiled at startup, immutable at runtime
//! - No regex in the hot path (exact hosts and literal prefixes only)
//! - Deterministic: same input always matches same rule
//! - Specificity wins: exact host beats host expression, longest path
//!   prefix beats shorter, declaration order breaks remaining ties

pub mod matcher;
pub mod rule;
pub mod table;

pub use rule::{Entrypoint, Rule};
pub use table::RuleTable;
