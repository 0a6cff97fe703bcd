//! Gateway link encoding.

use url::Url;

/// Route that serves proxied resources.
pub const GATEWAY_PATH: &str = "/proxy";

/// Builds gateway-relative links that carry the caller's access key.
#[derive(Debug, Clone, Default)]
pub struct LinkEncoder {
    /// Pre-encoded `&key=...` suffix, empty when no key was supplied.
    key_param: String,
    key: Option<String>,
}

impl LinkEncoder {
    /// An empty key is treated the same as no key.
    pub fn new(key: Option<&str>) -> Self {
        let key = key.filter(|k| !k.is_empty()).map(str::to_string);
        let key_param = key
            .as_deref()
            .map(|k| format!("&key={}", urlencoding::encode(k)))
            .unwrap_or_default();
        Self { key_param, key }
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// `/proxy?url=<encoded target>[&key=<encoded key>]`
    pub fn link(&self, target: &Url) -> String {
        format!(
            "{}?url={}{}",
            GATEWAY_PATH,
            urlencoding::encode(target.as_str()),
            self.key_param
        )
    }

    /// Link back to the gateway's home page.
    pub fn home_link(&self) -> String {
        match &self.key {
            Some(key) => format!("/?key={}", urlencoding::encode(key)),
            None => "/".to_string(),
        }
    }
}
