//! Gateway error type and its mapping to HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Every way a gateway request can fail.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Missing ?url=...")]
    MissingUrl,

    #[error("Invalid URL")]
    InvalidUrl(#[source] url::ParseError),

    #[error("Only http/https URLs supported")]
    UnsupportedScheme(String),

    #[error("Unauthorized: missing or invalid proxy key")]
    Unauthorized,

    #[error("Error fetching target: {0}")]
    Upstream(#[source] reqwest::Error),

    #[error("Error fetching target: upstream timed out")]
    UpstreamTimeout,

    #[error("Error fetching target: HTML body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },

    #[error("Error rewriting document: {0}")]
    Rewrite(#[from] lol_html::errors::RewritingError),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            tracing::debug!(error = %err, "Upstream fetch timed out");
            Self::UpstreamTimeout
        } else {
            Self::Upstream(err)
        }
    }
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingUrl | Self::InvalidUrl(_) | Self::UnsupportedScheme(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
            Self::BodyTooLarge { .. } => StatusCode::BAD_GATEWAY,
            Self::Upstream(_) | Self::Rewrite(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the failure was the client's fault.
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_client_error() {
            tracing::debug!(error = %self, status = %status, "Request rejected");
        }
        (status, self.to_string()).into_response()
    }
}
