//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (routes reference declared middlewares
//!   and services)
//! - Detect duplicate identifiers across routes, middlewares, services
//! - Validate path prefixes and service addresses
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::fmt;

use url::Url;

use crate::config::schema::RouterConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    DuplicateRouteId(String),
    DuplicateMiddlewareId(String),
    DuplicateServiceName(String),
    /// A route declared neither `host` nor `host_rule`.
    MissingHostPredicate(String),
    /// A route declared both `host` and `host_rule`.
    ConflictingHostPredicates(String),
    InvalidPathPrefix { route: String, prefix: String },
    UnknownMiddleware { route: String, middleware: String },
    UnknownService { route: String, service: String },
    InvalidServiceAddress { service: String, address: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::DuplicateRouteId(id) => {
                write!(f, "route id {:?} declared more than once", id)
            }
            ValidationError::DuplicateMiddlewareId(id) => {
                write!(f, "middleware id {:?} declared more than once", id)
            }
            ValidationError::DuplicateServiceName(name) => {
                write!(f, "service {:?} declared more than once", name)
            }
            ValidationError::MissingHostPredicate(route) => {
                write!(f, "route {:?} needs either host or host_rule", route)
            }
            ValidationError::ConflictingHostPredicates(route) => {
                write!(f, "route {:?} sets both host and host_rule", route)
            }
            ValidationError::InvalidPathPrefix { route, prefix } => {
                write!(f, "route {:?} path_prefix {:?} must start with '/'", route, prefix)
            }
            ValidationError::UnknownMiddleware { route, middleware } => {
                write!(f, "route {:?} references undeclared middleware {:?}", route, middleware)
            }
            ValidationError::UnknownService { route, service } => {
                write!(f, "route {:?} references undeclared service {:?}", route, service)
            }
            ValidationError::InvalidServiceAddress { service, address } => {
                write!(f, "service {:?} address {:?} is not a valid authority", service, address)
            }
        }
    }
}

/// Validate a parsed configuration, collecting every problem found.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let mut middleware_ids = HashSet::new();
    for mw in &config.middlewares {
        if !middleware_ids.insert(mw.id.as_str()) {
            errors.push(ValidationError::DuplicateMiddlewareId(mw.id.clone()));
        }
    }

    let mut service_names = HashSet::new();
    for service in &config.services {
        if !service_names.insert(service.name.as_str()) {
            errors.push(ValidationError::DuplicateServiceName(service.name.clone()));
        }
        let parsed = Url::parse(&format!("http://{}", service.address));
        if !matches!(&parsed, Ok(url) if url.host_str().is_some()) {
            errors.push(ValidationError::InvalidServiceAddress {
                service: service.name.clone(),
                address: service.address.clone(),
            });
        }
    }

    let mut route_ids = HashSet::new();
    for route in &config.routes {
        if !route_ids.insert(route.id.as_str()) {
            errors.push(ValidationError::DuplicateRouteId(route.id.clone()));
        }
        match (&route.host, &route.host_rule) {
            (None, None) => errors.push(ValidationError::MissingHostPredicate(route.id.clone())),
            (Some(_), Some(_)) => {
                errors.push(ValidationError::ConflictingHostPredicates(route.id.clone()))
            }
            _ => {}
        }
        if let Some(prefix) = &route.path_prefix {
            if !prefix.starts_with('/') {
                errors.push(ValidationError::InvalidPathPrefix {
                    route: route.id.clone(),
                    prefix: prefix.clone(),
                });
            }
        }
        for mw in &route.middlewares {
            if !middleware_ids.contains(mw.as_str()) {
                errors.push(ValidationError::UnknownMiddleware {
                    route: route.id.clone(),
                    middleware: mw.clone(),
                });
            }
        }
        if !service_names.contains(route.service.as_str()) {
            errors.push(ValidationError::UnknownService {
                route: route.id.clone(),
                service: route.service.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
