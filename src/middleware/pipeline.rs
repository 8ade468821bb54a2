//! Ordered application of a middleware chain.

use axum::http::header::{HeaderMap, HeaderName, HeaderValue};

use crate::middleware::Middleware;
use crate::routing::Entrypoint;

/// The mutable request state a middleware chain operates on.
///
/// Method and body are not part of the context; middleware never touches
/// them and the dispatcher forwards them verbatim.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
}

impl RequestContext {
    pub fn new(path: impl Into<String>, query: Option<String>, headers: HeaderMap) -> Self {
        Self {
            path: path.into(),
            query,
            headers,
        }
    }

    /// Path plus query, as sent upstream.
    pub fn path_and_query(&self) -> String {
        match &self.query {
            Some(query) => format!("{}?{}", self.path, query),
            None => self.path.clone(),
        }
    }
}

/// Identifiers the matcher resolved, available to header value templates.
#[derive(Debug, Clone, Copy)]
pub struct RouteInfo<'a> {
    pub entrypoint: Entrypoint,
    pub router: &'a str,
}

/// Applies middleware chains to request contexts.
pub struct Pipeline;

impl Pipeline {
    /// Apply `chain` to `ctx` in declared order.
    ///
    /// Application is infallible: a strip prefix that does not match is a
    /// no-op, and a header whose rendered name/value is not representable
    /// is skipped with a warning rather than failing the request.
    pub fn apply(chain: &[Middleware], ctx: &mut RequestContext, info: &RouteInfo<'_>) {
        for step in chain {
            match step {
                Middleware::StripPrefix { prefix } => Self::strip_prefix(ctx, prefix),
                Middleware::AddRequestHeader { name, value } => {
                    Self::add_request_header(ctx, name, value, info)
                }
            }
        }
    }

    fn strip_prefix(ctx: &mut RequestContext, prefix: &str) {
        let Some(rest) = ctx.path.strip_prefix(prefix) else {
            // Documented no-op: second application of an already-stripped
            // chain lands here.
            return;
        };
        ctx.path = if rest.is_empty() {
            // Path was exactly the prefix; forward the root, not an empty path.
            "/".to_string()
        } else if rest.starts_with('/') {
            rest.to_string()
        } else {
            format!("/{rest}")
        };
    }

    fn add_request_header(ctx: &mut RequestContext, name: &str, value: &str, info: &RouteInfo<'_>) {
        let rendered = render_template(value, info);
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(&rendered),
        ) {
            (Ok(name), Ok(value)) => {
                ctx.headers.insert(name, value);
            }
            _ => {
                tracing::warn!(header = %name, value = %rendered, "Skipping unrepresentable header");
            }
        }
    }
}

/// Substitute `{entrypoint}` and `{router}` references in a header template.
fn render_template(template: &str, info: &RouteInfo<'_>) -> String {
    template
        .replace("{entrypoint}", info.entrypoint.as_str())
        .replace("{router}", info.router)
}
