//! HTML link-rewriting subsystem.
//!
//! # Data Flow
//! ```text
//! HTML text + final URL + caller's key
//!     → html.rs (walk elements selected by the rule table)
//!     → rules.rs (which attribute, which rewrite kind)
//!     → resolver.rs (absolute URL, pass-through or unresolvable)
//!     → srcset.rs (per-candidate resolution for responsive lists)
//!     → links.rs (encode as /proxy?url=...&key=...)
//!     → serialized HTML with banner
//! ```
//!
//! # Design Decisions
//! - The rule table is static; nothing here holds per-request state beyond one call
//! - Rewriting is fail-soft: anything that does not resolve is left untouched

pub mod html;
pub mod links;
pub mod resolver;
pub mod rules;
pub mod srcset;

pub use html::{rewrite_document, DocumentRewriter, RewrittenDocument, POST_MARKER_FIELD};
pub use links::{LinkEncoder, GATEWAY_PATH};
pub use resolver::{resolve, Resolution};
pub use rules::{RewriteKind, RewriteRule, REWRITE_RULES};
pub use srcset::rewrite_srcset;
