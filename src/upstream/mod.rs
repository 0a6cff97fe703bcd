//! Upstream fetch subsystem.
//!
//! # Data Flow
//! ```text
//! validated target URL + inbound headers
//!     → client.rs (narrow header set, redirects, timeouts)
//!     → response.rs (final URL, status, headers, body as text or stream)
//! ```

pub mod client;
pub mod response;

pub use client::UpstreamClient;
pub use response::UpstreamResponse;
