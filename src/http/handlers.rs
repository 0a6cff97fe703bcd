//! Route handlers.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::{Html, Response},
};
use serde::Deserialize;

use crate::error::GatewayError;
use crate::http::server::AppState;
use crate::proxy::{ProxyParams, TargetRequest};

/// Query parameters of `/`.
#[derive(Debug, Default, Deserialize)]
pub struct HomeParams {
    pub key: Option<String>,
}

/// `GET /`: a form for entering a target URL and key.
pub async fn home(Query(params): Query<HomeParams>) -> Html<String> {
    Html(home_page(params.key.as_deref()))
}

/// `GET /proxy`: fetch, rewrite or stream the target.
pub async fn proxy(
    State(state): State<AppState>,
    Query(params): Query<ProxyParams>,
    headers: HeaderMap,
) -> Result<Response, GatewayError> {
    let target = TargetRequest::from_params(params)?;
    tracing::info!(target = %target.url, "Proxying request");
    state.gateway.handle(&target, &headers).await
}

/// `GET /_health`: liveness.
pub async fn health() -> &'static str {
    "ok"
}

pub fn home_page(key: Option<&str>) -> String {
    let key_value = key
        .map(html_escape::encode_double_quoted_attribute)
        .unwrap_or_default();
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>navproxy</title></head>
<body>
  <h2>navproxy</h2>
  <form method="get" action="/proxy">
    <input type="text" name="url" placeholder="https://example.com" size="60" />
    <input type="text" name="key" placeholder="API key (if required)" size="30" value="{key_value}" />
    <button type="submit">Go</button>
  </form>
</body>
</html>
"#
    )
}
