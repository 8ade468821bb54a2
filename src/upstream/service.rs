//! Upstream service registry.
//!
//! # Responsibilities
//! - Represent a single network-reachable target service
//! - Track health state (up/down) via lock-free atomics
//! - Resolve service names referenced by rules
//!
//! # Design Decisions
//! - The registry owns the services; rules hold names, not references
//! - Health flips are reported from outside (`mark_up` / `mark_down`);
//!   nothing in the request path writes shared state

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use url::Url;

use crate::config::schema::ServiceConfig;

/// Health state of a service.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthState {
    /// No report yet; treated as dispatchable.
    Unknown = 0,
    Up = 1,
    Down = 2,
}

impl From<u8> for HealthState {
    fn from(val: u8) -> Self {
        match val {
            1 => HealthState::Up,
            2 => HealthState::Down,
            _ => HealthState::Unknown,
        }
    }
}

/// A single upstream target.
#[derive(Debug)]
pub struct Service {
    /// Unique name referenced by rules.
    pub name: String,
    /// Authority used when rewriting upstream URIs (host:port).
    pub authority: String,
    /// Pre-parsed base URL, for logs and collaborators.
    pub base_url: Url,
    state: AtomicU8,
}

impl Service {
    /// Create a service. The address must already be validated as an
    /// authority by configuration validation.
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Option<Self> {
        let name = name.into();
        let authority = address.into();
        let base_url = Url::parse(&format!("http://{authority}")).ok()?;
        base_url.host_str()?;
        Some(Self {
            name,
            authority,
            base_url,
            state: AtomicU8::new(HealthState::Unknown as u8),
        })
    }

    /// True unless the service was explicitly marked down.
    pub fn is_up(&self) -> bool {
        self.state.load(Ordering::Relaxed) != HealthState::Down as u8
    }

    pub fn health(&self) -> HealthState {
        self.state.load(Ordering::Relaxed).into()
    }

    /// Report the service reachable. Called by an external health collaborator.
    pub fn mark_up(&self) {
        self.state.store(HealthState::Up as u8, Ordering::Relaxed);
    }

    /// Report the service unreachable. Called by an external health collaborator.
    pub fn mark_down(&self) {
        self.state.store(HealthState::Down as u8, Ordering::Relaxed);
    }
}

/// Name-indexed collection of services, shared across entrypoints.
#[derive(Debug, Default)]
pub struct ServiceRegistry {
    services: DashMap<String, Arc<Service>>,
}

impl ServiceRegistry {
    /// Build the registry from validated configuration. Entries whose
    /// address fails to parse were already rejected by validation and are
    /// skipped here.
    pub fn from_config(configs: &[ServiceConfig]) -> Self {
        let registry = Self::default();
        for config in configs {
            if let Some(service) = Service::new(&config.name, &config.address) {
                registry
                    .services
                    .insert(service.name.clone(), Arc::new(service));
            } else {
                tracing::warn!(service = %config.name, address = %config.address, "Skipping service with unparseable address");
            }
        }
        registry
    }

    pub fn get(&self, name: &str) -> Option<Arc<Service>> {
        self.services.get(name).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}
