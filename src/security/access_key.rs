//! Access key gate.
//!
//! When a secret is configured, every request must present it in the `key`
//! query parameter or, failing that, the `x-api-key` header.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::GatewayError;

pub const API_KEY_HEADER: &str = "x-api-key";

/// State required by the gate.
#[derive(Clone, Default)]
pub struct AccessKeyState {
    secret: Option<Arc<str>>,
}

impl AccessKeyState {
    /// An empty secret disables the gate.
    pub fn new(secret: Option<&str>) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_empty()).map(Arc::from),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.secret.is_some()
    }

    /// Check the key a request presented.
    pub fn permits(&self, presented: Option<&str>) -> bool {
        match &self.secret {
            None => true,
            Some(secret) => presented.is_some_and(|key| key == secret.as_ref()),
        }
    }
}

/// The key presented by a request: a non-empty `key` query parameter wins over the header.
pub fn presented_key(query: Option<&str>, headers: &HeaderMap) -> Option<String> {
    let from_query = query.and_then(|q| {
        url::form_urlencoded::parse(q.as_bytes())
            .find(|(name, _)| name == "key")
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty())
    });
    from_query.or_else(|| {
        headers
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    })
}

pub async fn access_key_middleware(
    State(state): State<AccessKeyState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if !state.is_enabled() {
        return next.run(req).await;
    }

    let key = presented_key(req.uri().query(), req.headers());
    if state.permits(key.as_deref()) {
        next.run(req).await
    } else {
        tracing::warn!(
            path = %req.uri().path(),
            key_present = key.is_some(),
            "Rejected request with missing or invalid proxy key"
        );
        GatewayError::Unauthorized.into_response()
    }
}
