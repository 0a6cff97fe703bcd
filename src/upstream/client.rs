//! Outbound fetch client.
//!
//! # Responsibilities
//! - Forward the narrow inbound header set (user-agent, accept, cookie)
//! - Follow redirects and record the final URL
//! - Bound connect time, time to the response head and idle time between reads
//!
//! # Design Decisions
//! - One `reqwest::Client` per process; its connection pool is the only state
//!   shared between requests
//! - No transparent decompression: content-encoding passes through untouched
//! - No deadline on the whole body: a slow but steady download is never cut off,
//!   only a stalled one

use std::time::Duration;

use axum::http::{
    header::{ACCEPT, COOKIE, USER_AGENT},
    HeaderMap, HeaderValue,
};
use reqwest::redirect::Policy;
use url::Url;

use crate::config::{TimeoutConfig, UpstreamConfig};
use crate::error::GatewayError;
use crate::upstream::response::UpstreamResponse;

/// HTTP client used for every upstream fetch.
#[derive(Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    default_user_agent: HeaderValue,
    default_accept: HeaderValue,
    max_html_bytes: usize,
    head_timeout: Duration,
}

impl UpstreamClient {
    /// Build the client from validated configuration.
    pub fn new(upstream: &UpstreamConfig, timeouts: &TimeoutConfig) -> Result<Self, GatewayError> {
        let idle = Duration::from_secs(timeouts.upstream_secs);
        let http = reqwest::Client::builder()
            .redirect(Policy::limited(upstream.max_redirects))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .read_timeout(idle)
            .build()?;

        Ok(Self {
            http,
            default_user_agent: header_or_static(&upstream.user_agent, "navproxy"),
            default_accept: header_or_static(&upstream.accept, "*/*"),
            max_html_bytes: upstream.max_html_bytes,
            head_timeout: idle,
        })
    }

    /// Upper bound for buffered HTML bodies.
    pub fn max_html_bytes(&self) -> usize {
        self.max_html_bytes
    }

    /// Headers sent upstream for a given inbound request.
    ///
    /// Only user-agent, accept and cookie cross the gateway; everything else
    /// (authorization, host, x-api-key, ...) stays behind.
    pub fn forwarded_headers(&self, inbound: &HeaderMap) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            inbound
                .get(USER_AGENT)
                .cloned()
                .unwrap_or_else(|| self.default_user_agent.clone()),
        );
        headers.insert(
            ACCEPT,
            inbound
                .get(ACCEPT)
                .cloned()
                .unwrap_or_else(|| self.default_accept.clone()),
        );
        for cookie in inbound.get_all(COOKIE) {
            headers.append(COOKIE, cookie.clone());
        }
        headers
    }

    /// Fetch `target`, following redirects.
    ///
    /// The response head must arrive within the upstream timeout; dropping the
    /// pending request on expiry cancels the fetch.
    pub async fn fetch(
        &self,
        target: &Url,
        inbound: &HeaderMap,
    ) -> Result<UpstreamResponse, GatewayError> {
        let request = self
            .http
            .get(target.clone())
            .headers(self.forwarded_headers(inbound))
            .send();
        let response = tokio::time::timeout(self.head_timeout, request)
            .await
            .map_err(|_| GatewayError::UpstreamTimeout)??;

        let upstream = UpstreamResponse::new(response);
        if upstream.final_url() != target {
            tracing::debug!(
                requested = %target,
                final_url = %upstream.final_url(),
                "Upstream redirected"
            );
        }
        Ok(upstream)
    }
}

fn header_or_static(value: &str, fallback: &'static str) -> HeaderValue {
    HeaderValue::from_str(value).unwrap_or_else(|_| HeaderValue::from_static(fallback))
}
