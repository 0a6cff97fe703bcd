//! Target request validation.

use serde::Deserialize;
use url::Url;

use crate::error::GatewayError;

/// Query parameters of `/proxy`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProxyParams {
    pub url: Option<String>,
    pub key: Option<String>,
}

/// A validated proxy target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetRequest {
    pub url: Url,
    /// Key to propagate into generated links; never empty.
    pub access_key: Option<String>,
}

impl TargetRequest {
    /// Validate the raw parameters. No network activity happens before this succeeds.
    pub fn from_params(params: ProxyParams) -> Result<Self, GatewayError> {
        let raw = params
            .url
            .filter(|u| !u.is_empty())
            .ok_or(GatewayError::MissingUrl)?;
        let url = Url::parse(&raw).map_err(GatewayError::InvalidUrl)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(GatewayError::UnsupportedScheme(url.scheme().to_string()));
        }

        Ok(Self {
            url,
            access_key: params.key.filter(|k| !k.is_empty()),
        })
    }
}
