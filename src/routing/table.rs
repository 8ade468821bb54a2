//! The rule table: ordered, immutable collection of compiled rules.
//!
//! # Responsibilities
//! - Compile RouteConfig entries into Rules (parse host predicates,
//!   resolve middleware chains)
//! - Reject duplicate rule ids at insert time
//! - Answer lookups over the frozen rule sequence
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks); reload
//!   builds a fresh table and swaps the pointer
//! - Declaration order is preserved; it is the final tie-breaker

use std::collections::HashSet;

use crate::config::schema::{MiddlewareConfig, RouteConfig};
use crate::error::RouterError;
use crate::routing::matcher::{self, HostPredicate};
use crate::routing::rule::{Entrypoint, Rule};

/// Ordered collection of routing rules.
#[derive(Debug, Default)]
pub struct RuleTable {
    rules: Vec<Rule>,
    ids: HashSet<String>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile a table from validated configuration.
    pub fn from_config(
        routes: &[RouteConfig],
        middlewares: &[MiddlewareConfig],
    ) -> Result<Self, RouterError> {
        let mut table = Self::new();
        for route in routes {
            let host = match (&route.host, &route.host_rule) {
                (Some(host), _) => HostPredicate::exact(host),
                (None, Some(expr)) => HostPredicate::expr(expr)?,
                (None, None) => {
                    // Validation rejects this; an empty expression error is
                    // the closest load-time diagnostic if reached anyway.
                    return Err(RouterError::InvalidHostRule {
                        expr: String::new(),
                        reason: format!("route {} has no host predicate", route.id),
                    });
                }
            };

            let mut chain = Vec::with_capacity(route.middlewares.len());
            for id in &route.middlewares {
                let declared = middlewares
                    .iter()
                    .find(|mw| &mw.id == id)
                    .ok_or_else(|| RouterError::UnknownMiddleware {
                        route: route.id.clone(),
                        middleware: id.clone(),
                    })?;
                chain.push(declared.middleware.clone());
            }

            table.insert(Rule {
                id: route.id.clone(),
                entrypoint: route.entrypoint,
                host,
                path_prefix: route.path_prefix.clone(),
                middlewares: chain,
                service: route.service.clone(),
            })?;
        }
        Ok(table)
    }

    /// Insert a rule, preserving declaration order.
    pub fn insert(&mut self, rule: Rule) -> Result<(), RouterError> {
        if !self.ids.insert(rule.id.clone()) {
            return Err(RouterError::DuplicateRuleId(rule.id));
        }
        self.rules.push(rule);
        Ok(())
    }

    /// Rules in declaration order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Evaluate the table against a request.
    pub fn find(
        &self,
        entrypoint: Entrypoint,
        host: &str,
        path: &str,
    ) -> Result<&Rule, RouterError> {
        matcher::find(&self.rules, entrypoint, host, path).ok_or_else(|| RouterError::NoRoute {
            entrypoint: entrypoint.to_string(),
            host: host.to_string(),
            path: path.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::Middleware;

    fn rule(id: &str) -> Rule {
        Rule {
            id: id.into(),
            entrypoint: Entrypoint::Web,
            host: HostPredicate::exact("www.example.com"),
            path_prefix: None,
            middlewares: Vec::new(),
            service: "www".into(),
        }
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let mut table = RuleTable::new();
        table.insert(rule("r1")).unwrap();
        let err = table.insert(rule("r1")).unwrap_err();
        assert!(matches!(err, RouterError::DuplicateRuleId(id) if id == "r1"));
        assert_eq!(table.rules().len(), 1);
    }

    #[test]
    fn lookup_miss_reports_no_route() {
        let table = RuleTable::new();
        let err = table.find(Entrypoint::Lanweb, "nowhere.test", "/").unwrap_err();
        assert!(matches!(err, RouterError::NoRoute { .. }));
    }

    #[test]
    fn from_config_resolves_middleware_chains_in_order() {
        let middlewares = vec![
            MiddlewareConfig {
                id: "strip".into(),
                middleware: Middleware::StripPrefix {
                    prefix: "/www".into(),
                },
            },
            MiddlewareConfig {
                id: "mark".into(),
                middleware: Middleware::AddRequestHeader {
                    name: "X-Route-Info".into(),
                    value: "router={router}".into(),
                },
            },
        ];
        let routes = vec![RouteConfig {
            id: "shared".into(),
            entrypoint: Entrypoint::Web,
            host: None,
            host_rule: Some("Host(`hub.example.com`)".into()),
            path_prefix: Some("/www".into()),
            middlewares: vec!["mark".into(), "strip".into()],
            service: "www".into(),
        }];

        let table = RuleTable::from_config(&routes, &middlewares).unwrap();
        let rule = table.find(Entrypoint::Web, "hub.example.com", "/www/x").unwrap();
        assert_eq!(rule.middlewares.len(), 2);
        assert!(matches!(
            rule.middlewares[0],
            Middleware::AddRequestHeader { .. }
        ));
        assert!(matches!(rule.middlewares[1], Middleware::StripPrefix { .. }));
    }

    #[test]
    fn from_config_rejects_unknown_middleware() {
        let routes = vec![RouteConfig {
            id: "r1".into(),
            entrypoint: Entrypoint::Web,
            host: Some("www.example.com".into()),
            host_rule: None,
            path_prefix: None,
            middlewares: vec!["ghost".into()],
            service: "www".into(),
        }];
        let err = RuleTable::from_config(&routes, &[]).unwrap_err();
        assert!(matches!(err, RouterError::UnknownMiddleware { .. }));
    }
}
