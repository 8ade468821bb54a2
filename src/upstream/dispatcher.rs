//! Request dispatch to upstream services.
//!
//! # Responsibilities
//! - Rewrite the request URI authority to the target service
//! - Forward method, headers and body unchanged past middleware
//! - Enforce the per-request deadline
//! - Surface connection failures and timeouts as typed errors
//!
//! # Design Decisions
//! - No retries here; retry policy belongs to an outer collaborator
//! - A service marked down short-circuits without a connection attempt
//! - Response status, headers and body are relayed verbatim

use std::time::Duration;

use axum::body::Body;
use axum::http::uri::Scheme;
use axum::http::{Method, Request, Response, Uri, Version};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use tokio::time;

use crate::config::schema::TimeoutConfig;
use crate::error::RouterError;
use crate::middleware::RequestContext;
use crate::upstream::service::Service;

/// Forwards transformed requests to upstream services.
#[derive(Clone)]
pub struct Dispatcher {
    client: Client<HttpConnector, Body>,
    timeouts: TimeoutConfig,
}

impl Dispatcher {
    pub fn new(timeouts: TimeoutConfig) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(timeouts.connect_secs)));
        let client = Client::builder(TokioExecutor::new()).build(connector);
        Self { client, timeouts }
    }

    /// Forward the request to `service` and relay its response.
    pub async fn dispatch(
        &self,
        service: &Service,
        method: Method,
        version: Version,
        ctx: RequestContext,
        body: Body,
    ) -> Result<Response<Body>, RouterError> {
        if !service.is_up() {
            return Err(RouterError::UpstreamUnavailable {
                service: service.name.clone(),
                reason: "marked down by health collaborator".to_string(),
            });
        }

        let uri = Uri::builder()
            .scheme(Scheme::HTTP)
            .authority(service.authority.as_str())
            .path_and_query(ctx.path_and_query())
            .build()
            .map_err(|e| RouterError::UpstreamUnavailable {
                service: service.name.clone(),
                reason: format!("invalid upstream uri: {e}"),
            })?;

        let mut request = Request::builder()
            .method(method)
            .uri(uri)
            .version(version)
            .body(body)
            .map_err(|e| RouterError::UpstreamUnavailable {
                service: service.name.clone(),
                reason: format!("invalid upstream request: {e}"),
            })?;
        *request.headers_mut() = ctx.headers;

        let deadline = Duration::from_secs(self.timeouts.request_secs);
        match time::timeout(deadline, self.client.request(request)).await {
            Ok(Ok(response)) => {
                let (parts, body) = response.into_parts();
                Ok(Response::from_parts(parts, Body::new(body)))
            }
            Ok(Err(e)) => Err(RouterError::UpstreamUnavailable {
                service: service.name.clone(),
                reason: e.to_string(),
            }),
            Err(_) => Err(RouterError::UpstreamTimeout {
                service: service.name.clone(),
                timeout_secs: self.timeouts.request_secs,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::HeaderMap;

    fn context(path: &str) -> RequestContext {
        RequestContext::new(path, None, HeaderMap::new())
    }

    #[tokio::test]
    async fn downed_service_short_circuits() {
        let dispatcher = Dispatcher::new(TimeoutConfig::default());
        let service = Service::new("www", "127.0.0.1:1").unwrap();
        service.mark_down();

        let err = dispatcher
            .dispatch(
                &service,
                Method::GET,
                Version::HTTP_11,
                context("/"),
                Body::empty(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RouterError::UpstreamUnavailable { .. }));
    }

    #[tokio::test]
    async fn connection_refusal_is_unavailable_not_panic() {
        let dispatcher = Dispatcher::new(TimeoutConfig {
            connect_secs: 1,
            request_secs: 2,
        });
        // Port 1 on loopback is essentially never listening.
        let service = Service::new("www", "127.0.0.1:1").unwrap();

        let err = dispatcher
            .dispatch(
                &service,
                Method::GET,
                Version::HTTP_11,
                context("/"),
                Body::empty(),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RouterError::UpstreamUnavailable { service, .. } if service == "www"
        ));
    }
}
