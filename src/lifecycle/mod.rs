//! Process lifecycle.
//!
//! # Design Decisions
//! - One broadcast channel fans the shutdown signal out to every
//!   long-running task (entrypoint servers, config watcher)
//! - Tasks drain in-flight work after receiving the signal

pub mod shutdown;

pub use shutdown::Shutdown;
