//! Proxy core.
//!
//! # Data Flow
//! ```text
//! /proxy?url=...&key=...
//!     → target.rs (must parse, scheme http/https; rejected before any fetch)
//!     → gateway.rs (fetch via upstream client)
//!     → classify.rs (text/html?)
//!         html  → rewrite subsystem → text/html; charset=utf-8
//!         other → byte stream + allow-listed headers
//! ```
//!
//! # Design Decisions
//! - No state crosses requests apart from the upstream client's pool
//! - Upstream status is preserved on both paths

pub mod classify;
pub mod gateway;
pub mod target;

pub use classify::{classify, ContentKind, HTML_CONTENT_TYPE, PASS_THROUGH_HEADERS};
pub use gateway::Gateway;
pub use target::{ProxyParams, TargetRequest};
