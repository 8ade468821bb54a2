//! Request identification.
//!
//! # Responsibilities
//! - Ensure every request carries an `x-request-id` header
//! - Generate a UUID v4 when the client did not send one
//!
//! # Design Decisions
//! - Applied as the outermost routing-relevant layer so the id is present
//!   in every log line and propagates to the upstream verbatim

use std::task::{Context, Poll};

use axum::http::{HeaderValue, Request};
use tower::{Layer, Service};
use uuid::Uuid;

/// Header carrying the per-request correlation id.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Tower layer that assigns request ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestIdLayer;

impl<S> Layer<S> for RequestIdLayer {
    type Service = RequestIdService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestIdService { inner }
    }
}

/// Service wrapper that inserts `x-request-id` when absent.
#[derive(Debug, Clone)]
pub struct RequestIdService<S> {
    inner: S,
}

impl<S, B> Service<Request<B>> for RequestIdService<S>
where
    S: Service<Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<B>) -> Self::Future {
        if !req.headers().contains_key(X_REQUEST_ID) {
            if let Ok(value) = HeaderValue::from_str(&Uuid::new_v4().to_string()) {
                req.headers_mut().insert(X_REQUEST_ID, value);
            }
        }
        self.inner.call(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use std::convert::Infallible;
    use tower::{service_fn, ServiceExt};

    #[tokio::test]
    async fn generates_id_when_absent() {
        let svc = RequestIdLayer.layer(service_fn(|req: Request<Body>| async move {
            let id = req.headers().get(X_REQUEST_ID).cloned();
            Ok::<_, Infallible>(id)
        }));
        let id = svc
            .oneshot(Request::builder().body(Body::empty()).unwrap())
            .await
            .unwrap()
            .expect("id should be generated");
        assert!(Uuid::parse_str(id.to_str().unwrap()).is_ok());
    }

    #[tokio::test]
    async fn preserves_client_supplied_id() {
        let svc = RequestIdLayer.layer(service_fn(|req: Request<Body>| async move {
            let id = req.headers().get(X_REQUEST_ID).cloned();
            Ok::<_, Infallible>(id)
        }));
        let id = svc
            .oneshot(
                Request::builder()
                    .header(X_REQUEST_ID, "client-chosen")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
            .expect("id should be present");
        assert_eq!(id, "client-chosen");
    }
}
