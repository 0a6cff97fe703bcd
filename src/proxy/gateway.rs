//! Proxy orchestration.
//!
//! # Responsibilities
//! - Fetch a validated target with the narrow forwarded header set
//! - Route the upstream body to the rewriter or the pass-through streamer
//! - Turn every failure into a short diagnostic without emitting partial HTML

use axum::{http::HeaderMap, response::Response};

use crate::error::GatewayError;
use crate::observability::metrics;
use crate::proxy::classify::{classify, html_response, stream_through, ContentKind};
use crate::proxy::target::TargetRequest;
use crate::rewrite::{rewrite_document, LinkEncoder};
use crate::upstream::{UpstreamClient, UpstreamResponse};

/// Composes fetch, classification and rewriting for one request at a time.
#[derive(Clone)]
pub struct Gateway {
    client: UpstreamClient,
}

impl Gateway {
    pub fn new(client: UpstreamClient) -> Self {
        Self { client }
    }

    /// Serve one validated target.
    pub async fn handle(
        &self,
        target: &TargetRequest,
        inbound: &HeaderMap,
    ) -> Result<Response, GatewayError> {
        let upstream = match self.client.fetch(&target.url, inbound).await {
            Ok(upstream) => upstream,
            Err(e) => {
                metrics::record_fetch("none", "error");
                tracing::error!(target = %target.url, error = %e, "Upstream fetch failed");
                return Err(e);
            }
        };

        let kind = classify(upstream.content_type());
        tracing::debug!(
            target = %target.url,
            final_url = %upstream.final_url(),
            status = %upstream.status(),
            content_type = %upstream.content_type(),
            kind = kind.as_str(),
            "Upstream responded"
        );

        match kind {
            ContentKind::Html => self.render_html(upstream, target.access_key.as_deref()).await,
            ContentKind::PassThrough => {
                metrics::record_fetch(kind.as_str(), "ok");
                Ok(stream_through(upstream))
            }
        }
    }

    async fn render_html(
        &self,
        upstream: UpstreamResponse,
        access_key: Option<&str>,
    ) -> Result<Response, GatewayError> {
        let status = upstream.status();
        let base = upstream.final_url().clone();

        let result = async {
            let text = upstream.text_bounded(self.client.max_html_bytes()).await?;
            let links = LinkEncoder::new(access_key);
            Ok::<_, GatewayError>(rewrite_document(&text, &base, &links)?)
        }
        .await;

        match result {
            Ok(document) => {
                metrics::record_fetch(ContentKind::Html.as_str(), "ok");
                metrics::record_rewritten_links(document.links_rewritten);
                tracing::debug!(
                    final_url = %base,
                    links_rewritten = document.links_rewritten,
                    "Document rewritten"
                );
                Ok(html_response(status, document.html))
            }
            Err(e) => {
                metrics::record_fetch(ContentKind::Html.as_str(), "error");
                tracing::error!(final_url = %base, error = %e, "Failed to rewrite document");
                Err(e)
            }
        }
    }
}
