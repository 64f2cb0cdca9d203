//! Anchor rewriting.
//!
//! Every link opens in a new tab. Links that resolve to the hosting page's
//! own origin point at documentation pages, so they are re-rooted at the
//! help center. Hrefs that cannot be parsed are left exactly as they were.

use tracing::{debug, trace};
use url::{Position, Url};

use docpreview_shared::SanitizerConfig;

use crate::dom::Document;
use crate::highlight::HighlightPatterns;

/// How a single href was classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    /// Resolves to the hosting page; carries the help-center href.
    SameOrigin(String),
    /// Points elsewhere; the href is kept.
    CrossOrigin,
    /// Could not be parsed as a URL; the href is kept untouched.
    Malformed,
}

/// Classify `href` relative to the hosting page.
///
/// Hosts are compared as the URL parser normalizes them, so the port and the
/// letter case of the configured page host do not matter.
pub fn classify_href(href: &str, page_origin: &Url, config: &SanitizerConfig) -> LinkOutcome {
    let resolved = match page_origin.join(href) {
        Ok(url) => url,
        Err(e) => {
            trace!(href, error = %e, "unparseable href");
            return LinkOutcome::Malformed;
        }
    };

    if resolved.host_str().is_some() && resolved.host_str() == page_origin.host_str() {
        let page_path = &resolved[Position::BeforePath..];
        LinkOutcome::SameOrigin(help_href(&config.help_base_url, page_path))
    } else {
        LinkOutcome::CrossOrigin
    }
}

/// Join a page path onto the help-center base with a single slash.
fn help_href(base: &str, page_path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        page_path.trim_start_matches('/')
    )
}

/// Rewrite the target and href of every anchor in the document.
pub(crate) fn rewrite_links(
    doc: &mut Document,
    config: &SanitizerConfig,
    patterns: &HighlightPatterns,
) {
    let Ok(page_origin) = Url::parse(&config.page_origin()) else {
        debug!(host = %config.page_host, "page origin unparseable, only setting link targets");
        for anchor in doc.elements_by_tag("a") {
            doc.set_attr(anchor, "target", "_blank");
        }
        return;
    };

    let (mut same, mut cross, mut malformed) = (0usize, 0usize, 0usize);

    for anchor in doc.elements_by_tag("a") {
        if !doc.set_attr(anchor, "target", "_blank") {
            continue;
        }

        let Some(href) = doc
            .element(anchor)
            .and_then(|el| el.attr("href"))
            .map(str::to_string)
        else {
            continue;
        };

        let rewritten = match classify_href(&href, &page_origin, config) {
            LinkOutcome::SameOrigin(help) => {
                same += 1;
                help
            }
            LinkOutcome::CrossOrigin => {
                cross += 1;
                href
            }
            LinkOutcome::Malformed => {
                malformed += 1;
                continue;
            }
        };

        doc.set_attr(anchor, "href", &patterns.strip_encoded(&rewritten));
    }

    debug!(same, cross, malformed, "links rewritten");
}
