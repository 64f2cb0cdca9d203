//! Search-highlight marker passes.
//!
//! The search service wraps every matched word in its own marker element.
//! These passes drop markers that leaked into code, coalesce multi-word
//! matches, and tone down matches that cover too little of the query.

use regex::Regex;
use tracing::debug;

use docpreview_shared::{DocPreviewError, Result};

use crate::dom::{Document, ElementData, NodeId};

/// Inline style applied to low-confidence markers.
const WEAK_MATCH_STYLE: &str = "background-color: unset;";

/// Regexes matching one highlight tag name in its textual forms.
#[derive(Debug, Clone)]
pub struct HighlightPatterns {
    tag: String,
    /// `<tag>` / `</tag>` appearing as literal text (escaped in the source HTML).
    literal: Regex,
    /// `%3Ctag%3E` / `%3C/tag%3E` inside URLs.
    encoded: Regex,
}

impl HighlightPatterns {
    pub fn new(tag: &str) -> Result<Self> {
        let tag = tag.to_ascii_lowercase();
        let escaped = regex::escape(&tag);

        let literal = Regex::new(&format!("(?i)</?{escaped}>"))
            .map_err(|e| DocPreviewError::config(format!("bad highlight tag '{tag}': {e}")))?;
        let encoded = Regex::new(&format!("(?i)%3C/?{escaped}%3E"))
            .map_err(|e| DocPreviewError::config(format!("bad highlight tag '{tag}': {e}")))?;

        Ok(Self {
            tag,
            literal,
            encoded,
        })
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Remove URL-encoded marker tags from `href`.
    pub fn strip_encoded(&self, href: &str) -> String {
        self.encoded.replace_all(href, "").into_owned()
    }

    /// Remove literal marker tags from `text`.
    pub fn strip_literal(&self, text: &str) -> String {
        self.literal.replace_all(text, "").into_owned()
    }
}

// ---------------------------------------------------------------------------
// Code blocks
// ---------------------------------------------------------------------------

/// Strip escaped marker tags from text inside every `code` element.
pub(crate) fn strip_in_code(doc: &mut Document, patterns: &HighlightPatterns) {
    let mut stripped = 0usize;
    for code in doc.elements_by_tag("code") {
        for node in doc.descendants(code) {
            let Some(text) = doc.text(node) else {
                continue;
            };
            let cleaned = patterns.strip_literal(text);
            if cleaned.len() != text.len() && doc.set_text(node, &cleaned) {
                stripped += 1;
            }
        }
    }
    debug!(stripped, "highlight tags removed from code");
}

// ---------------------------------------------------------------------------
// Adjacent markers
// ---------------------------------------------------------------------------

/// Whether `marker` is followed by a lone `" "` text node and then another marker.
fn continues_run(doc: &Document, marker: NodeId, tag: &str) -> bool {
    let Some(space) = doc.next_sibling(marker) else {
        return false;
    };
    if doc.text(space) != Some(" ") {
        return false;
    }
    doc.next_sibling(space)
        .is_some_and(|next| doc.is_element_named(next, tag))
}

/// Coalesce runs of space-separated markers into a single marker.
///
/// Every marker but the last in a run is removed; the last is replaced by a
/// fresh marker holding the run's words joined by single spaces.
pub(crate) fn merge_adjacent(doc: &mut Document, patterns: &HighlightPatterns) -> Result<()> {
    let tag = patterns.tag();
    let mut run: Vec<String> = Vec::new();
    let mut merged = 0usize;

    for marker in doc.elements_by_tag(tag) {
        let text = doc.text_content(marker);
        if text.is_empty() {
            run.clear();
            continue;
        }

        if continues_run(doc, marker, tag) {
            run.push(text);
            doc.detach(marker);
        } else if !run.is_empty() {
            run.push(text);
            let replacement = doc.create_element(ElementData::new(tag));
            doc.set_text_content(replacement, run.join(" "));
            doc.replace(marker, replacement)?;
            run.clear();
            merged += 1;
        }
    }

    debug!(merged, "adjacent highlights merged");
    Ok(())
}

// ---------------------------------------------------------------------------
// Weak matches
// ---------------------------------------------------------------------------

/// Clear the highlight styling of markers shorter than half the query.
pub(crate) fn suppress_weak(doc: &mut Document, patterns: &HighlightPatterns, query: &str) {
    let threshold = query.chars().count() / 2;
    let mut suppressed = 0usize;

    for marker in doc.elements_by_tag(patterns.tag()) {
        let len = doc.text_content(marker).chars().count();
        if len == 0 || len >= threshold {
            continue;
        }
        if doc.set_attr(marker, "style", WEAK_MATCH_STYLE) {
            suppressed += 1;
        }
    }

    debug!(suppressed, threshold, "weak highlights suppressed");
}
