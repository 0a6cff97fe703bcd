//! Navigation-preserving forwarding gateway.
//!
//! Fetches a remote resource on behalf of a client. HTML is rewritten so that
//! links, media, forms and responsive image sets keep flowing through the
//! gateway; everything else is streamed through untouched.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod proxy;
pub mod rewrite;
pub mod security;
pub mod upstream;

pub use config::GatewayConfig;
pub use error::GatewayError;
pub use http::GatewayServer;
pub use lifecycle::Shutdown;
