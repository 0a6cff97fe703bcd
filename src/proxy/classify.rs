//! Content classification and pass-through streaming.
//!
//! # Design Decisions
//! - HTML detection is a case-insensitive substring match on `text/html`, so
//!   `text/html; charset=iso-8859-1` still counts
//! - Rewritten HTML is always declared as UTF-8; the upstream charset is not honored
//! - Pass-through bodies are streamed chunk by chunk, never buffered

use axum::{
    body::Body,
    http::{
        header::{CACHE_CONTROL, CONTENT_ENCODING, CONTENT_LENGTH, CONTENT_TYPE, LAST_MODIFIED},
        HeaderMap, HeaderName, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
};

use crate::upstream::UpstreamResponse;

/// Content type of every rewritten HTML response.
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Upstream headers copied onto pass-through responses.
pub const PASS_THROUGH_HEADERS: [HeaderName; 5] = [
    CONTENT_TYPE,
    CONTENT_LENGTH,
    CACHE_CONTROL,
    CONTENT_ENCODING,
    LAST_MODIFIED,
];

/// How an upstream body is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Html,
    PassThrough,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Html => "html",
            ContentKind::PassThrough => "passthrough",
        }
    }
}

/// Classify by declared content type.
pub fn classify(content_type: &str) -> ContentKind {
    if content_type.to_ascii_lowercase().contains("text/html") {
        ContentKind::Html
    } else {
        ContentKind::PassThrough
    }
}

/// Copy the allow-listed headers; everything else (set-cookie, location, ...) is dropped.
pub fn pass_through_headers(upstream: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for name in PASS_THROUGH_HEADERS {
        if let Some(value) = upstream.get(&name) {
            headers.insert(name, value.clone());
        }
    }
    headers
}

/// Stream a non-HTML upstream body to the client unmodified.
pub fn stream_through(upstream: UpstreamResponse) -> Response {
    let status = upstream.status();
    let headers = pass_through_headers(upstream.headers());
    let mut response = Response::new(upstream.into_body());
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}

/// Build the response for a rewritten document.
pub fn html_response(status: StatusCode, html: String) -> Response {
    (
        status,
        [(CONTENT_TYPE, HeaderValue::from_static(HTML_CONTENT_TYPE))],
        Body::from(html),
    )
        .into_response()
}
