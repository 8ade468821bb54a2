//! Rule matching logic.
//!
//! # Responsibilities
//! - Match host header (exact match, case-insensitive, port ignored)
//! - Evaluate host-rule expressions injected by the host platform
//! - Match path prefix at a segment boundary (case-sensitive)
//! - Pick the most specific rule among concurrent matches
//!
//! # Design Decisions
//! - Host matching is case-insensitive (per HTTP spec)
//! - Path matching is case-sensitive
//! - Host-rule grammar is limited to `` Host(`x`) `` terms joined by `||`;
//!   that is the whole family the platform injects
//! - No regex to guarantee O(n) matching

use crate::error::RouterError;
use crate::routing::rule::{Entrypoint, Rule};

/// Predicate over the request's Host header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostPredicate {
    /// Exact hostname equality.
    Exact(String),
    /// Parsed host-rule expression (any listed host matches).
    Expr(HostExpr),
}

impl HostPredicate {
    /// Exact-host predicate. The host is normalized to lowercase.
    pub fn exact(host: impl Into<String>) -> Self {
        HostPredicate::Exact(host.into().to_lowercase())
    }

    /// Parse a host-rule expression into a predicate.
    pub fn expr(raw: &str) -> Result<Self, RouterError> {
        HostExpr::parse(raw).map(HostPredicate::Expr)
    }

    /// True if the (already normalized) request host satisfies the predicate.
    pub fn matches(&self, host: &str) -> bool {
        match self {
            HostPredicate::Exact(expected) => host == expected,
            HostPredicate::Expr(expr) => expr.matches(host),
        }
    }

    /// Exact-host predicates outrank expression matches during selection.
    pub fn is_exact(&self) -> bool {
        matches!(self, HostPredicate::Exact(_))
    }
}

/// A parsed `` Host(`a`) || Host(`b`) `` expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostExpr {
    hosts: Vec<String>,
}

impl HostExpr {
    /// Parse an expression of one or more backquoted `Host(...)` terms
    /// joined by `||`.
    pub fn parse(raw: &str) -> Result<Self, RouterError> {
        let invalid = |reason: &str| RouterError::InvalidHostRule {
            expr: raw.to_string(),
            reason: reason.to_string(),
        };

        let mut hosts = Vec::new();
        for term in raw.split("||") {
            let term = term.trim();
            let inner = term
                .strip_prefix("Host(")
                .and_then(|t| t.strip_suffix(')'))
                .ok_or_else(|| invalid("expected Host(...) term"))?;
            let literal = inner
                .trim()
                .strip_prefix('`')
                .and_then(|t| t.strip_suffix('`'))
                .ok_or_else(|| invalid("hostname must be backquoted"))?;
            if literal.is_empty() {
                return Err(invalid("empty hostname"));
            }
            hosts.push(literal.to_lowercase());
        }
        Ok(Self { hosts })
    }

    /// True if the (already normalized) host equals any listed hostname.
    pub fn matches(&self, host: &str) -> bool {
        self.hosts.iter().any(|h| h == host)
    }
}

/// Normalize a Host header value: lowercase, port stripped.
pub fn normalize_host(raw: &str) -> String {
    let hostport = raw.trim();
    // Bracketed IPv6 literals keep their brackets, lose the port.
    let host = if let Some(end) = hostport.strip_prefix('[').and(hostport.find(']')) {
        &hostport[..=end]
    } else {
        hostport.split(':').next().unwrap_or(hostport)
    };
    host.to_lowercase()
}

/// True if `path` starts with `prefix` at a segment boundary.
pub fn path_matches_prefix(path: &str, prefix: &str) -> bool {
    if prefix == "/" {
        return path.starts_with('/');
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Select the highest-priority rule matching the request.
///
/// Specificity order: exact host beats host expression; among path-prefix
/// matches the longest prefix wins; remaining ties go to the earliest
/// declared rule. The choice is deterministic and stable.
pub fn find<'a>(
    rules: &'a [Rule],
    entrypoint: Entrypoint,
    host: &str,
    path: &str,
) -> Option<&'a Rule> {
    let host = normalize_host(host);
    let mut best: Option<(&Rule, (bool, usize))> = None;

    for rule in rules {
        if rule.entrypoint != entrypoint || !rule.host.matches(&host) {
            continue;
        }
        let prefix_len = match &rule.path_prefix {
            Some(prefix) => {
                if !path_matches_prefix(path, prefix) {
                    continue;
                }
                prefix.len()
            }
            None => 0,
        };
        let specificity = (rule.host.is_exact(), prefix_len);
        // Strictly-greater keeps the earliest declared rule on ties.
        if best.map_or(true, |(_, s)| specificity > s) {
            best = Some((rule, specificity));
        }
    }

    best.map(|(rule, _)| rule)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(id: &str, ep: Entrypoint, host: HostPredicate, prefix: Option<&str>) -> Rule {
        Rule {
            id: id.into(),
            entrypoint: ep,
            host,
            path_prefix: prefix.map(Into::into),
            middlewares: Vec::new(),
            service: "www".into(),
        }
    }

    #[test]
    fn exact_host_is_case_insensitive_and_ignores_port() {
        let predicate = HostPredicate::exact("WWW.Example.COM");
        assert!(predicate.matches(&normalize_host("www.example.com:7080")));
        assert!(predicate.matches(&normalize_host("WWW.EXAMPLE.COM")));
        assert!(!predicate.matches(&normalize_host("other.example.com")));
    }

    #[test]
    fn host_expr_parses_traefik_style_rules() {
        let expr = HostExpr::parse("Host(`hub.example.com`) || Host(`lan.example.com`)").unwrap();
        assert!(expr.matches("hub.example.com"));
        assert!(expr.matches("lan.example.com"));
        assert!(!expr.matches("www.example.com"));
    }

    #[test]
    fn host_expr_rejects_malformed_terms() {
        assert!(HostExpr::parse("Host(hub.example.com)").is_err());
        assert!(HostExpr::parse("PathPrefix(`/www`)").is_err());
        assert!(HostExpr::parse("Host(``)").is_err());
    }

    #[test]
    fn prefix_requires_segment_boundary() {
        assert!(path_matches_prefix("/www/index.html", "/www"));
        assert!(path_matches_prefix("/www", "/www"));
        assert!(!path_matches_prefix("/wwwroot/index.html", "/www"));
        assert!(path_matches_prefix("/anything", "/"));
    }

    #[test]
    fn entrypoint_filter_applies_first() {
        let rules = vec![rule(
            "r1",
            Entrypoint::Web,
            HostPredicate::exact("www.example.com"),
            None,
        )];
        assert!(find(&rules, Entrypoint::Lanweb, "www.example.com", "/").is_none());
        assert!(find(&rules, Entrypoint::Web, "www.example.com", "/").is_some());
    }

    #[test]
    fn exact_host_beats_shared_expression() {
        let expr = HostPredicate::expr("Host(`www.example.com`)").unwrap();
        let rules = vec![
            rule("shared", Entrypoint::Web, expr, Some("/www")),
            rule(
                "exact",
                Entrypoint::Web,
                HostPredicate::exact("www.example.com"),
                None,
            ),
        ];
        let matched = find(&rules, Entrypoint::Web, "www.example.com", "/www/x").unwrap();
        assert_eq!(matched.id, "exact");
    }

    #[test]
    fn longest_prefix_wins_among_expression_matches() {
        let expr = || HostPredicate::expr("Host(`hub.example.com`)").unwrap();
        let rules = vec![
            rule("short", Entrypoint::Web, expr(), Some("/www")),
            rule("long", Entrypoint::Web, expr(), Some("/www/static")),
        ];
        let matched = find(&rules, Entrypoint::Web, "hub.example.com", "/www/static/a.css").unwrap();
        assert_eq!(matched.id, "long");

        let matched = find(&rules, Entrypoint::Web, "hub.example.com", "/www/index.html").unwrap();
        assert_eq!(matched.id, "short");
    }

    #[test]
    fn declaration_order_breaks_ties_stably() {
        let rules = vec![
            rule(
                "first",
                Entrypoint::Web,
                HostPredicate::exact("www.example.com"),
                Some("/www"),
            ),
            rule(
                "second",
                Entrypoint::Web,
                HostPredicate::exact("www.example.com"),
                Some("/www"),
            ),
        ];
        for _ in 0..16 {
            let matched = find(&rules, Entrypoint::Web, "www.example.com", "/www/a").unwrap();
            assert_eq!(matched.id, "first");
        }
    }
}
