//! Cross-origin policy.
//!
//! Two pieces work together: [`origin_guard`] refuses requests whose
//! `Origin` is not on the allowlist (preflights included), and
//! [`cors_layer`] decorates the surviving responses with the CORS headers
//! browsers need. Requests without an `Origin` header (curl, mobile apps,
//! server-to-server) pass straight through.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header::ORIGIN, HeaderValue, Method},
    middleware::Next,
    response::Response,
};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};

use crate::app::errors::ApiError;
use crate::config::ApiConfig;

pub const ALLOWED_METHODS: [Method; 6] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::PATCH,
    Method::DELETE,
    Method::OPTIONS,
];

/// Exact-match origin allowlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginPolicy {
    allowed: Vec<String>,
}

impl OriginPolicy {
    pub fn new<I, O>(allowed: I) -> Self
    where
        I: IntoIterator<Item = O>,
        O: Into<String>,
    {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(config.allowed_origins.iter().cloned())
    }

    pub fn allows(&self, origin: &str) -> bool {
        self.allowed.iter().any(|o| o == origin)
    }

    fn header_values(&self) -> Vec<HeaderValue> {
        self.allowed
            .iter()
            .filter_map(|o| HeaderValue::from_str(o).ok())
            .collect()
    }
}

pub async fn origin_guard(
    State(policy): State<Arc<OriginPolicy>>,
    req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    // An empty Origin carries no more information than an absent one.
    let rejected = match req.headers().get(ORIGIN) {
        None => None,
        Some(value) if value.is_empty() => None,
        Some(value) => match value.to_str() {
            Ok(origin) if policy.allows(origin) => None,
            Ok(origin) => Some(origin.to_string()),
            Err(_) => Some(String::from_utf8_lossy(value.as_bytes()).into_owned()),
        },
    };

    if let Some(origin) = rejected {
        tracing::warn!(%origin, method = %req.method(), path = %req.uri().path(), "rejected cross-origin request");
        return Err(ApiError::cors_rejected(origin));
    }

    Ok(next.run(req).await)
}

/// CORS response headers for allowlisted origins.
///
/// Credentials are allowed, so origins are echoed individually (never `*`)
/// and request headers are mirrored from the preflight.
pub fn cors_layer(policy: &OriginPolicy) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(policy.header_values()))
        .allow_credentials(true)
        .allow_methods(ALLOWED_METHODS)
        .allow_headers(AllowHeaders::mirror_request())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allowlist_is_exact_match() {
        let policy = OriginPolicy::new(["http://localhost:3000"]);
        assert!(policy.allows("http://localhost:3000"));
        assert!(!policy.allows("http://localhost:3000/"));
        assert!(!policy.allows("http://localhost:30001"));
        assert!(!policy.allows("https://localhost:3000"));
        assert!(!policy.allows("http://evil.example"));
    }

    #[test]
    fn from_config_uses_configured_origins() {
        let config = ApiConfig::default();
        let policy = OriginPolicy::from_config(&config);
        for origin in &config.allowed_origins {
            assert!(policy.allows(origin));
        }
        assert_eq!(policy.header_values().len(), config.allowed_origins.len());
    }
}
