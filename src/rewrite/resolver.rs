//! Reference resolution against the document base.
//!
//! # Responsibilities
//! - Recognise references that must never leave the page (`javascript:`, `data:`,
//!   `mailto:`, in-page fragments)
//! - Resolve everything else against the post-redirect URL of the upstream response
//!
//! # Design Decisions
//! - Only [`Resolution::Absolute`] leads to a rewrite; the other outcomes leave the
//!   attribute exactly as the upstream wrote it
//! - Resolution follows WHATWG URL parsing (scheme-relative, absolute-path and
//!   relative forms) via the `url` crate

use url::Url;

/// Scheme prefixes that are kept verbatim, matched case-insensitively.
const PASS_THROUGH_PREFIXES: &[&str] = &["javascript:", "data:", "mailto:", "#"];

/// Outcome of resolving a single reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// A fetchable absolute URL.
    Absolute(Url),
    /// A reference that must be left untouched.
    PassThrough(&'a str),
    /// Empty or unparsable; left untouched.
    Unresolvable,
}

impl Resolution<'_> {
    pub fn into_absolute(self) -> Option<Url> {
        match self {
            Resolution::Absolute(url) => Some(url),
            Resolution::PassThrough(_) | Resolution::Unresolvable => None,
        }
    }
}

/// Resolve `reference` against `base`.
///
/// Leading and trailing ASCII whitespace is ignored, matching what URL parsing
/// strips, so `" #top"` stays an in-page fragment.
pub fn resolve<'a>(reference: &'a str, base: &Url) -> Resolution<'a> {
    let reference = reference.trim_matches(|c: char| c.is_ascii_whitespace());
    if reference.is_empty() {
        return Resolution::Unresolvable;
    }
    if is_pass_through(reference) {
        return Resolution::PassThrough(reference);
    }
    match base.join(reference) {
        Ok(url) => Resolution::Absolute(url),
        Err(_) => Resolution::Unresolvable,
    }
}

fn is_pass_through(reference: &str) -> bool {
    PASS_THROUGH_PREFIXES.iter().any(|prefix| {
        reference
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    })
}
