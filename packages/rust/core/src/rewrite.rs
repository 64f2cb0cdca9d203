//! Structural rewrite of a rendered documentation page.
//!
//! Passes run in a fixed order over one [`Document`]:
//! 1. Demote `h1` to `h2`
//! 2. Inject the page title with a call-to-action link
//! 3. Strip highlight tags from code
//! 4. Rewrite links
//! 5. Merge adjacent highlights
//! 6. Suppress weak highlights

use tracing::{debug, instrument};

use docpreview_shared::{DocumentationItem, Result, SanitizerConfig};

use crate::dom::{Document, ElementData, NodeId};
use crate::highlight::{self, HighlightPatterns};
use crate::links;

/// CSS class carried by the call-to-action link.
pub const CTA_CLASS: &str = "documentation-cta";

/// Apply every rewrite pass to `doc`.
#[instrument(skip_all, fields(path = %item.path))]
pub fn rewrite(
    doc: &mut Document,
    item: &DocumentationItem,
    config: &SanitizerConfig,
    patterns: &HighlightPatterns,
) -> Result<()> {
    demote_headings(doc);
    inject_title(doc, item, config)?;
    highlight::strip_in_code(doc, patterns);
    links::rewrite_links(doc, config, patterns);
    highlight::merge_adjacent(doc, patterns)?;
    highlight::suppress_weak(doc, patterns, &item.query);
    Ok(())
}

// ---------------------------------------------------------------------------
// Pass 1: Headings
// ---------------------------------------------------------------------------

/// Turn every `h1` into an `h2`; the injected title is the only `h1` left.
pub(crate) fn demote_headings(doc: &mut Document) {
    let headings = doc.elements_by_tag("h1");
    for &h in &headings {
        doc.rename(h, "h2");
    }
    debug!(demoted = headings.len(), "headings demoted");
}

// ---------------------------------------------------------------------------
// Pass 2: Title
// ---------------------------------------------------------------------------

/// Build the href of the call-to-action link from an item path.
pub fn cta_href(path: &str, config: &SanitizerConfig) -> String {
    if config.cta_path_segment.is_empty() {
        return path.to_string();
    }
    path.replacen(&config.cta_path_segment, &config.help_base_url, 1)
}

fn create_cta(doc: &mut Document, item: &DocumentationItem, config: &SanitizerConfig) -> NodeId {
    let anchor = doc.create_element(
        ElementData::new("a")
            .with_attr("class", CTA_CLASS)
            .with_attr("href", cta_href(&item.path, config))
            .with_attr("target", "_blank"),
    );
    doc.set_text_content(anchor, config.cta_label.clone());
    anchor
}

/// Make the first body child an `h1` title and append the call-to-action link to it.
///
/// A first child whose text equals the item title is re-wrapped in place;
/// otherwise a new title heading is inserted in front of it. The trailing
/// space after the title leaves room for a line break before the link.
/// A body with no children is left empty.
pub(crate) fn inject_title(
    doc: &mut Document,
    item: &DocumentationItem,
    config: &SanitizerConfig,
) -> Result<()> {
    let Some(first) = doc.first_child(doc.body()) else {
        debug!("empty document, no title");
        return Ok(());
    };

    let title = doc.create_element(ElementData::new("h1"));
    if doc.element(first).is_some() && doc.text_content(first) == item.raw_title {
        doc.move_children(first, title);
        let space = doc.create_text(" ");
        doc.append(title, space);
        doc.replace(first, title)?;
        debug!("existing heading promoted to title");
    } else {
        doc.set_text_content(title, format!("{} ", item.raw_title));
        doc.insert_before(first, title)?;
        debug!("title inserted");
    }

    let cta = create_cta(doc, item, config);
    doc.append(title, cta);
    Ok(())
}
