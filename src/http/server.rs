//! HTTP server setup and request handling.
//!
//! # Responsibilities
//! - Create one Axum router per configured entrypoint
//! - Wire up middleware (tracing, timeout, request ID)
//! - Drive the linear request pipeline: match → middleware → dispatch → relay
//! - Swap the rule table atomically on configuration reload
//! - Convert request-time errors to HTTP error responses

use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::schema::RouterConfig;
use crate::error::RouterError;
use crate::http::request::{RequestIdLayer, X_REQUEST_ID};
use crate::middleware::{Pipeline, RequestContext, RouteInfo};
use crate::observability::metrics;
use crate::routing::{Entrypoint, RuleTable};
use crate::upstream::{Dispatcher, ServiceRegistry};

/// Application state shared by every entrypoint listener.
#[derive(Clone)]
pub struct AppState {
    pub table: Arc<ArcSwap<RuleTable>>,
    pub services: Arc<ServiceRegistry>,
    pub dispatcher: Dispatcher,
}

/// Per-listener state: which entrypoint this listener serves.
#[derive(Clone)]
struct EntrypointState {
    entrypoint: Entrypoint,
    shared: AppState,
}

/// HTTP server for the edge router.
pub struct HttpServer {
    state: AppState,
    config: RouterConfig,
}

impl HttpServer {
    /// Compile the rule table and service registry from configuration.
    pub fn new(config: RouterConfig) -> Result<Self, RouterError> {
        let table = RuleTable::from_config(&config.routes, &config.middlewares)?;
        let state = AppState {
            table: Arc::new(ArcSwap::from_pointee(table)),
            services: Arc::new(ServiceRegistry::from_config(&config.services)),
            dispatcher: Dispatcher::new(config.timeouts.clone()),
        };
        Ok(Self { state, config })
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Build the Axum router for one entrypoint.
    fn build_router(&self, entrypoint: Entrypoint) -> Router {
        Router::new()
            .route("/{*path}", any(route_handler))
            .route("/", any(route_handler))
            .with_state(EntrypointState {
                entrypoint,
                shared: self.state.clone(),
            })
            .layer(TimeoutLayer::new(Duration::from_secs(
                self.config.timeouts.request_secs.saturating_add(1),
            )))
            .layer(RequestIdLayer)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server over the given entrypoint listeners.
    ///
    /// `config_updates` carries validated reloaded configurations; only the
    /// rule table is swapped, services are fixed at startup. All listeners
    /// drain on the shutdown signal.
    pub async fn run(
        self,
        listeners: Vec<(Entrypoint, TcpListener)>,
        mut config_updates: mpsc::UnboundedReceiver<RouterConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let mut handles = Vec::with_capacity(listeners.len());
        for (entrypoint, listener) in listeners {
            let addr = listener.local_addr()?;
            tracing::info!(entrypoint = %entrypoint, address = %addr, "Entrypoint listening");

            let app = self.build_router(entrypoint);
            let mut rx = shutdown.resubscribe();
            handles.push(tokio::spawn(async move {
                let result = axum::serve(listener, app)
                    .with_graceful_shutdown(async move {
                        let _ = rx.recv().await;
                    })
                    .await;
                if let Err(e) = result {
                    tracing::error!(entrypoint = %entrypoint, error = %e, "Entrypoint server failed");
                }
            }));
        }

        let state = self.state.clone();
        loop {
            tokio::select! {
                update = config_updates.recv() => match update {
                    Some(new_config) => apply_reload(&state, &new_config),
                    None => break,
                },
                _ = shutdown.recv() => break,
            }
        }

        for handle in handles {
            let _ = handle.await;
        }
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Swap in a freshly compiled rule table; in-flight requests keep the
/// snapshot they loaded.
fn apply_reload(state: &AppState, config: &RouterConfig) {
    match RuleTable::from_config(&config.routes, &config.middlewares) {
        Ok(table) => {
            let rules = table.rules().len();
            state.table.store(Arc::new(table));
            tracing::info!(rules, "Rule table reloaded");
        }
        Err(e) => {
            tracing::error!(error = %e, "Rejected reloaded rule table, keeping current");
        }
    }
}

/// Main routing handler: no-match → 404; match → middleware → dispatch → relay.
async fn route_handler(
    State(state): State<EntrypointState>,
    request: Request<Body>,
) -> Response {
    let start = Instant::now();
    let entrypoint = state.entrypoint;
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .or_else(|| request.uri().authority().map(|a| a.to_string()))
        .unwrap_or_default();
    let path = request.uri().path().to_string();

    tracing::debug!(
        request_id = %request_id,
        entrypoint = %entrypoint,
        host = %host,
        path = %path,
        "Routing request"
    );

    let snapshot = state.shared.table.load_full();
    let rule = match snapshot.find(entrypoint, &host, &path) {
        Ok(rule) => rule,
        Err(e) => {
            tracing::warn!(request_id = %request_id, entrypoint = %entrypoint, host = %host, path = %path, "No rule matched");
            metrics::record_request(entrypoint.as_str(), "none", 404, start);
            return (e.status(), "No matching route found").into_response();
        }
    };

    let (parts, body) = request.into_parts();
    let query = parts.uri.query().map(str::to_string);
    let mut ctx = RequestContext::new(path, query, parts.headers.clone());
    Pipeline::apply(
        &rule.middlewares,
        &mut ctx,
        &RouteInfo {
            entrypoint,
            router: &rule.id,
        },
    );

    let service = match state.shared.services.get(&rule.service) {
        Some(service) => service,
        None => {
            tracing::error!(request_id = %request_id, rule = %rule.id, service = %rule.service, "Rule targets unregistered service");
            metrics::record_request(entrypoint.as_str(), &rule.id, 502, start);
            return (StatusCode::BAD_GATEWAY, "Upstream not registered").into_response();
        }
    };

    match state
        .shared
        .dispatcher
        .dispatch(&service, parts.method.clone(), parts.version, ctx, body)
        .await
    {
        Ok(response) => {
            let status = response.status();
            tracing::debug!(request_id = %request_id, rule = %rule.id, status = %status, "Relaying upstream response");
            metrics::record_request(entrypoint.as_str(), &rule.id, status.as_u16(), start);
            response
        }
        Err(e) => {
            let status = e.status();
            tracing::warn!(request_id = %request_id, rule = %rule.id, error = %e, "Dispatch failed");
            metrics::record_request(entrypoint.as_str(), &rule.id, status.as_u16(), start);
            let message = match status {
                StatusCode::GATEWAY_TIMEOUT => "Upstream request timed out",
                _ => "Upstream request failed",
            };
            (status, message).into_response()
        }
    }
}
