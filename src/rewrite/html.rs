//! Document rewriting.
//!
//! # Responsibilities
//! - Walk every element matched by the rule table and rewrite its reference
//! - Mark forms that originally submitted with POST
//! - Prepend the gateway banner to `<body>`
//!
//! # Design Decisions
//! - The whole document is in memory before rewriting starts and is serialized once
//! - `lol_html` is tolerant of malformed markup; a broken reference is left as-is
//! - Attribute values are entity-decoded before resolution; untouched attributes
//!   keep their original markup

use std::cell::Cell;

use lol_html::errors::RewritingError;
use lol_html::html_content::{ContentType, Element};
use lol_html::{element, HtmlRewriter, Settings};
use url::Url;

use crate::rewrite::links::LinkEncoder;
use crate::rewrite::resolver::resolve;
use crate::rewrite::rules::{RewriteKind, RewriteRule, REWRITE_RULES};
use crate::rewrite::srcset::rewrite_srcset;

type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Hidden field inserted at the start of forms whose method was POST.
pub const POST_MARKER_FIELD: &str =
    r#"<input type="hidden" name="_proxied_original_method" value="POST" />"#;

/// Result of rewriting one document.
#[derive(Debug)]
pub struct RewrittenDocument {
    pub html: String,
    /// Number of references turned into gateway links.
    pub links_rewritten: usize,
}

/// Rewrites the references of one document against its final URL.
pub struct DocumentRewriter<'a> {
    base: &'a Url,
    links: &'a LinkEncoder,
}

impl<'a> DocumentRewriter<'a> {
    pub fn new(base: &'a Url, links: &'a LinkEncoder) -> Self {
        Self { base, links }
    }

    /// Rewrite `html` and return the serialized result.
    pub fn rewrite(&self, html: &str) -> Result<RewrittenDocument, RewritingError> {
        let rewritten = Cell::new(0usize);
        let saw_body = Cell::new(false);
        let banner = self.banner();
        let mut output = Vec::with_capacity(html.len() + banner.len());

        {
            let mut handlers = Vec::with_capacity(REWRITE_RULES.len() + 1);
            for rule in REWRITE_RULES {
                let rewritten = &rewritten;
                handlers.push(element!(rule.selector(), move |el| {
                    rewritten.set(rewritten.get() + self.apply(rule, el)?);
                    Ok(())
                }));
            }
            handlers.push(element!("body", |el| {
                if !saw_body.get() {
                    saw_body.set(true);
                    el.prepend(&banner, ContentType::Html);
                }
                Ok(())
            }));

            let mut rewriter = HtmlRewriter::new(
                Settings {
                    element_content_handlers: handlers,
                    ..Settings::default()
                },
                |chunk: &[u8]| output.extend_from_slice(chunk),
            );
            rewriter.write(html.as_bytes())?;
            rewriter.end()?;
        }

        let mut html = String::from_utf8_lossy(&output).into_owned();
        if !saw_body.get() {
            html.insert_str(0, &banner);
        }

        Ok(RewrittenDocument {
            html,
            links_rewritten: rewritten.get(),
        })
    }

    /// Apply one rule to a matched element, returning how many links were rewritten.
    fn apply(&self, rule: &RewriteRule, el: &mut Element<'_, '_>) -> Result<usize, HandlerError> {
        match rule.kind {
            RewriteKind::SingleUrlAttribute => {
                let Some(value) = attribute_value(el, rule.attribute) else {
                    return Ok(0);
                };
                match resolve(&value, self.base).into_absolute() {
                    Some(absolute) => {
                        el.set_attribute(rule.attribute, &self.links.link(&absolute))?;
                        Ok(1)
                    }
                    None => Ok(0),
                }
            }
            RewriteKind::FormAction => {
                let action = attribute_value(el, rule.attribute).unwrap_or_default();
                let reference = if action.trim().is_empty() {
                    self.base.as_str()
                } else {
                    action.as_str()
                };
                let Some(absolute) = resolve(reference, self.base).into_absolute() else {
                    return Ok(0);
                };
                el.set_attribute(rule.attribute, &self.links.link(&absolute))?;

                let method = el.get_attribute("method").unwrap_or_else(|| "GET".to_string());
                if method.trim().eq_ignore_ascii_case("POST") {
                    el.prepend(POST_MARKER_FIELD, ContentType::Html);
                }
                Ok(1)
            }
            RewriteKind::ResponsiveList => {
                let Some(value) = attribute_value(el, rule.attribute) else {
                    return Ok(0);
                };
                let (rewritten, count) = rewrite_srcset(&value, self.base, self.links);
                if count > 0 {
                    el.set_attribute(rule.attribute, &rewritten)?;
                }
                Ok(count)
            }
        }
    }

    fn banner(&self) -> String {
        format!(
            concat!(
                r#"<div style="background:#f2f2f2;padding:6px 10px;border-bottom:1px solid #ddd;font-size:13px;">"#,
                r#"Proxied via navproxy &mdash; <a href="{}">Home</a>"#,
                "</div>"
            ),
            self.links.home_link()
        )
    }
}

/// Non-empty attribute value with character references decoded, i.e. the URL
/// the browser would request.
fn attribute_value(el: &Element<'_, '_>, name: &str) -> Option<String> {
    el.get_attribute(name)
        .filter(|raw| !raw.is_empty())
        .map(|raw| html_escape::decode_html_entities(&raw).into_owned())
}

/// Convenience wrapper around [`DocumentRewriter`].
pub fn rewrite_document(
    html: &str,
    base: &Url,
    links: &LinkEncoder,
) -> Result<RewrittenDocument, RewritingError> {
    DocumentRewriter::new(base, links).rewrite(html)
}
