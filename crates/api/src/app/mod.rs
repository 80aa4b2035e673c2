//! HTTP application wiring (Axum router + middleware stack).
//!
//! Layout:
//! - `versioning.rs`: `ApiVersion` and the declarative route table
//! - `routes/`: handlers (one file per area) and the table itself
//! - `validation.rs`: request-body schemas and the validating extractor
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{
    body::Body,
    http::{HeaderValue, Request},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

use crate::config::ApiConfig;
use crate::middleware::{self, OriginPolicy};

pub mod dto;
pub mod errors;
pub mod routes;
pub mod validation;
pub mod versioning;

/// Tags each request with a time-ordered `x-request-id` unless the caller sent one.
#[derive(Debug, Clone, Copy, Default)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let value = HeaderValue::from_str(&Uuid::now_v7().to_string()).ok()?;
        Some(RequestId::new(value))
    }
}

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: ApiConfig) -> Router {
    let policy = Arc::new(OriginPolicy::from_config(&config));

    let table = routes::route_table(config.default_version);

    let trace = TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
        let request_id = req
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");
        tracing::info_span!(
            "http_request",
            method = %req.method(),
            path = %req.uri().path(),
            request_id,
        )
    });

    // Outermost first: request id, tracing, then CORS rejection before routing.
    table.into_router().fallback(errors::not_found).layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
            .layer(trace)
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(axum::middleware::from_fn_with_state(
                policy.clone(),
                middleware::origin_guard,
            ))
            .layer(middleware::cors_layer(&policy)),
    )
}
