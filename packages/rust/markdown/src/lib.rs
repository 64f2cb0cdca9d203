//! Markdown normalization and Markdown-to-HTML conversion.
//!
//! Documentation source arrives with authoring-toolchain leftovers (leading
//! description blocks, `{% ... %}` directives, hint blocks). This crate strips
//! them, then renders the remaining CommonMark to HTML with `pulldown-cmark`.

mod cleanup;

use pulldown_cmark::{Options, Parser, html};
use tracing::{debug, instrument};

pub use cleanup::strip_directives;

// ---------------------------------------------------------------------------
// Normalizer
// ---------------------------------------------------------------------------

/// Clean raw documentation source so it can be rendered as plain CommonMark.
///
/// Steps, in order:
/// 1. Remove a leading `---` block opened by a `description:` key
/// 2. Remove `{% ... %}` directives (hint open/close tags are kept for step 3)
/// 3. Replace the first hint open/close pair with code fences
///
/// Empty input yields an empty string.
pub fn normalize(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    cleanup::run_pipeline(raw)
}

/// Render Markdown to an HTML fragment.
///
/// Raw inline HTML (such as search highlight tags) passes through untouched.
pub fn to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(markdown, options);

    let mut html_output = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut html_output, parser);
    html_output
}

/// Normalize raw documentation source and render it to HTML.
#[instrument(skip(raw), fields(raw_len = raw.len()))]
pub fn render(raw: &str) -> String {
    let normalized = normalize(raw);
    if normalized.is_empty() {
        debug!("nothing left to render after normalization");
        return String::new();
    }

    let html = to_html(&normalized);
    debug!(
        normalized_len = normalized.len(),
        html_len = html.len(),
        "markdown rendered"
    );
    html
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_input_renders_nothing() {
        assert_eq!(normalize(""), "");
        assert_eq!(render(""), "");
    }

    #[test]
    fn renders_basic_markdown() {
        let html = render("# Table\n\nSome *emphasis*.");
        assert_eq!(html, "<h1>Table</h1>\n<p>Some <em>emphasis</em>.</p>\n");
    }

    #[test]
    fn hint_block_becomes_code_block() {
        let raw = "{% hint style=\"info\" %}\nRemember this\n{% endhint %}\n";
        let html = render(raw);
        assert!(html.contains("<pre><code>Remember this\n</code></pre>"), "{html}");
    }

    #[test]
    fn description_block_dropped() {
        let raw = "---\ndescription: Widget reference\n---\n\nBody text";
        assert_eq!(render(raw), "<p>Body text</p>\n");
    }

    #[test]
    fn highlight_tags_pass_through_as_inline_html() {
        let html = to_html("Use the <ais-highlight-0000000000>table</ais-highlight-0000000000> widget");
        assert!(html.contains("<ais-highlight-0000000000>table</ais-highlight-0000000000>"));
    }

    #[test]
    fn highlight_tags_in_code_are_escaped() {
        let html = to_html("`<ais-highlight-0000000000>x</ais-highlight-0000000000>`");
        assert!(html.contains("<code>&lt;ais-highlight-0000000000&gt;x"), "{html}");
    }

    #[test]
    fn tables_enabled() {
        let html = to_html("| a | b |\n| --- | --- |\n| 1 | 2 |\n");
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>1</td>"));
    }

    #[test]
    fn directives_removed_before_rendering() {
        let html = render("Intro {% embed url=\"https://youtu.be/x\" %}\n");
        assert!(html.starts_with("<p>Intro"));
        assert!(!html.contains("embed"));
    }
}
