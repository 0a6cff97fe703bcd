//! Static table of reference-bearing attributes.
//!
//! Every rewrite the document rewriter performs is driven from [`REWRITE_RULES`];
//! the kind tag decides how the attribute value is interpreted.

/// How an attribute value is rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteKind {
    /// The value is one URL.
    SingleUrlAttribute,
    /// Form submission target; an absent action means the current page.
    FormAction,
    /// Comma-separated `url descriptor` candidates.
    ResponsiveList,
}

/// A `(tag, attribute)` pair that carries references.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewriteRule {
    pub tag: &'static str,
    pub attribute: &'static str,
    pub kind: RewriteKind,
}

impl RewriteRule {
    const fn new(tag: &'static str, attribute: &'static str, kind: RewriteKind) -> Self {
        Self {
            tag,
            attribute,
            kind,
        }
    }

    /// CSS selector matching the elements this rule applies to.
    ///
    /// Form rules match every form since a missing action still gets rewritten.
    pub fn selector(&self) -> String {
        match self.kind {
            RewriteKind::FormAction => self.tag.to_string(),
            RewriteKind::SingleUrlAttribute | RewriteKind::ResponsiveList => {
                format!("{}[{}]", self.tag, self.attribute)
            }
        }
    }
}

use RewriteKind::*;

pub static REWRITE_RULES: &[RewriteRule] = &[
    RewriteRule::new("a", "href", SingleUrlAttribute),
    RewriteRule::new("img", "src", SingleUrlAttribute),
    RewriteRule::new("script", "src", SingleUrlAttribute),
    RewriteRule::new("link", "href", SingleUrlAttribute),
    RewriteRule::new("iframe", "src", SingleUrlAttribute),
    RewriteRule::new("source", "src", SingleUrlAttribute),
    RewriteRule::new("video", "src", SingleUrlAttribute),
    RewriteRule::new("audio", "src", SingleUrlAttribute),
    RewriteRule::new("embed", "src", SingleUrlAttribute),
    RewriteRule::new("object", "data", SingleUrlAttribute),
    RewriteRule::new("form", "action", FormAction),
    RewriteRule::new("img", "srcset", ResponsiveList),
    RewriteRule::new("source", "srcset", ResponsiveList),
];
