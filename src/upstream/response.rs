//! Upstream response wrapper.

use axum::body::Body;
use axum::http::{header::CONTENT_TYPE, HeaderMap, StatusCode};
use url::Url;

use crate::error::GatewayError;

/// A fetched upstream response, owned by exactly one request.
#[derive(Debug)]
pub struct UpstreamResponse {
    final_url: Url,
    status: StatusCode,
    headers: HeaderMap,
    inner: reqwest::Response,
}

impl UpstreamResponse {
    pub(crate) fn new(inner: reqwest::Response) -> Self {
        Self {
            final_url: inner.url().clone(),
            status: inner.status(),
            headers: inner.headers().clone(),
            inner,
        }
    }

    /// URL after redirects; the base for resolving relative references.
    pub fn final_url(&self) -> &Url {
        &self.final_url
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Declared content type, empty when absent or not visible ASCII.
    pub fn content_type(&self) -> &str {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
    }

    /// Buffer the body as text, failing once it exceeds `limit` bytes.
    ///
    /// The body is always decoded as UTF-8 (lossily), whatever charset the
    /// upstream declared.
    pub async fn text_bounded(mut self, limit: usize) -> Result<String, GatewayError> {
        if self
            .inner
            .content_length()
            .is_some_and(|len| len > limit as u64)
        {
            return Err(GatewayError::BodyTooLarge { limit });
        }

        let mut body = Vec::new();
        while let Some(chunk) = self.inner.chunk().await? {
            if body.len() + chunk.len() > limit {
                return Err(GatewayError::BodyTooLarge { limit });
            }
            body.extend_from_slice(&chunk);
        }
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    /// Convert the body into a streaming response body; nothing is buffered.
    pub fn into_body(self) -> Body {
        Body::from_stream(self.inner.bytes_stream())
    }
}
