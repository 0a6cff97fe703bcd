//! Responsive image candidate lists (`srcset`).

use url::Url;

use crate::rewrite::links::LinkEncoder;
use crate::rewrite::resolver::resolve;

/// Rewrite every resolvable candidate URL in a `srcset` value.
///
/// Candidates are trimmed and rejoined with `", "`. A candidate whose URL does not
/// resolve is kept verbatim. Returns the new value and the number of rewritten URLs.
///
/// Every comma separates candidates, including commas inside a URL. A `data:`
/// candidate with an inline payload is therefore split in two and its payload
/// half is treated as a relative reference.
pub fn rewrite_srcset(value: &str, base: &Url, links: &LinkEncoder) -> (String, usize) {
    let mut rewritten = 0;
    let candidates: Vec<String> = value
        .split(',')
        .map(str::trim)
        .map(|candidate| {
            let (url_part, descriptor) = split_candidate(candidate);
            match resolve(url_part, base).into_absolute() {
                Some(absolute) => {
                    rewritten += 1;
                    let link = links.link(&absolute);
                    if descriptor.is_empty() {
                        link
                    } else {
                        format!("{link} {descriptor}")
                    }
                }
                None => candidate.to_string(),
            }
        })
        .collect();
    (candidates.join(", "), rewritten)
}

/// Split on the first run of whitespace into `(url, descriptor)`.
fn split_candidate(candidate: &str) -> (&str, &str) {
    match candidate.split_once(char::is_whitespace) {
        Some((url, descriptor)) => (url, descriptor.trim()),
        None => (candidate, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/gallery/index.html").unwrap()
    }

    #[test]
    fn test_descriptors_and_order_preserved() {
        let links = LinkEncoder::new(Some("abc"));
        let (value, count) = rewrite_srcset("a.jpg 1x, b.jpg 2x", &base(), &links);
        assert_eq!(
            value,
            "/proxy?url=https%3A%2F%2Fexample.com%2Fgallery%2Fa.jpg&key=abc 1x, \
             /proxy?url=https%3A%2F%2Fexample.com%2Fgallery%2Fb.jpg&key=abc 2x"
        );
        assert_eq!(count, 2);
    }

    #[test]
    fn test_unresolvable_candidate_kept_verbatim() {
        let links = LinkEncoder::new(None);
        let (value, count) = rewrite_srcset("a.jpg 1x,http://[::1 2x", &base(), &links);
        assert_eq!(
            value,
            "/proxy?url=https%3A%2F%2Fexample.com%2Fgallery%2Fa.jpg 1x, http://[::1 2x"
        );
        assert_eq!(count, 1);
    }

    #[test]
    fn test_candidate_without_descriptor() {
        let links = LinkEncoder::new(None);
        let (value, _) = rewrite_srcset("  /wide.png  ", &base(), &links);
        assert_eq!(value, "/proxy?url=https%3A%2F%2Fexample.com%2Fwide.png");
    }

    #[test]
    fn test_extra_whitespace_between_url_and_descriptor() {
        let links = LinkEncoder::new(None);
        let (value, _) = rewrite_srcset("small.jpg \t 480w", &base(), &links);
        assert_eq!(
            value,
            "/proxy?url=https%3A%2F%2Fexample.com%2Fgallery%2Fsmall.jpg 480w"
        );
    }

    #[test]
    fn test_data_candidate_passes_through() {
        let links = LinkEncoder::new(None);
        let (value, count) = rewrite_srcset("data:image/gif;base64 1x", &base(), &links);
        assert_eq!(value, "data:image/gif;base64 1x");
        assert_eq!(count, 0);
    }

    #[test]
    fn test_comma_inside_data_candidate_splits_it() {
        let links = LinkEncoder::new(None);
        let (value, count) = rewrite_srcset("data:image/png;base64,AAAA 1x", &base(), &links);
        assert_eq!(
            value,
            "data:image/png;base64, /proxy?url=https%3A%2F%2Fexample.com%2Fgallery%2FAAAA 1x"
        );
        assert_eq!(count, 1);
    }
}
