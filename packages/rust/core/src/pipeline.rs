//! End-to-end preview pipeline: raw document → normalize → HTML → rewrite → preview.

use tracing::{debug, instrument, warn};

use docpreview_markdown as markdown;
use docpreview_shared::{DocumentationItem, Preview, Result, SanitizerConfig, validate_config};

use crate::dom::Document;
use crate::highlight::HighlightPatterns;
use crate::rewrite;

/// Renders documentation search results into preview HTML.
///
/// Holds the validated configuration and the highlight patterns compiled
/// from it, so one value can serve any number of items.
#[derive(Debug, Clone)]
pub struct Sanitizer {
    config: SanitizerConfig,
    patterns: HighlightPatterns,
}

impl Sanitizer {
    /// Validate `config` and compile its highlight patterns.
    pub fn new(config: SanitizerConfig) -> Result<Self> {
        validate_config(&config)?;
        let patterns = HighlightPatterns::new(&config.highlight_tag)?;
        Ok(Self { config, patterns })
    }

    /// Render one item, surfacing any failure.
    ///
    /// Returns `Ok(None)` when the item has no document.
    #[instrument(skip_all, fields(path = %item.path))]
    pub fn try_parse_documentation_content(
        &self,
        item: &DocumentationItem,
    ) -> Result<Option<String>> {
        if !item.has_document() {
            debug!("empty document, nothing to render");
            return Ok(None);
        }

        let html = markdown::render(&item.raw_document);
        let mut doc = Document::parse_fragment(&html);
        rewrite::rewrite(&mut doc, item, &self.config, &self.patterns)?;

        let body = doc.body_html();
        let content = markdown::strip_directives(&body).trim().to_string();
        debug!(content_len = content.len(), "preview rendered");

        Ok(Some(content))
    }

    /// Render one item; failures are logged and reported as `None`.
    pub fn parse_documentation_content(&self, item: &DocumentationItem) -> Option<String> {
        match self.try_parse_documentation_content(item) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %item.path, error = %e, "failed to render documentation preview");
                None
            }
        }
    }

    /// Render every item; items that fail or are empty get `html: None`.
    pub fn render_previews(&self, items: &[DocumentationItem]) -> Vec<Preview> {
        let previews: Vec<Preview> = items
            .iter()
            .map(|item| Preview {
                path: item.path.clone(),
                title: item.raw_title.clone(),
                html: self.parse_documentation_content(item),
            })
            .collect();

        let rendered = previews.iter().filter(|p| p.html.is_some()).count();
        debug!(total = items.len(), rendered, "previews rendered");
        previews
    }
}

/// Render one item with a one-off [`Sanitizer`].
///
/// An invalid configuration is logged and reported as `None`, like any other
/// rendering failure.
pub fn parse_documentation_content(
    item: &DocumentationItem,
    config: &SanitizerConfig,
) -> Option<String> {
    match Sanitizer::new(config.clone()) {
        Ok(sanitizer) => sanitizer.parse_documentation_content(item),
        Err(e) => {
            warn!(error = %e, "invalid sanitizer configuration");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_config_rejected_up_front() {
        let config = SanitizerConfig {
            highlight_tag: "not a tag".into(),
            ..SanitizerConfig::default()
        };
        assert!(Sanitizer::new(config).is_err());
    }

    #[test]
    fn invalid_config_yields_absent_content() {
        let config = SanitizerConfig {
            help_base_url: "::".into(),
            ..SanitizerConfig::default()
        };
        let item = DocumentationItem::new("master/a.md", "A", "text", "");
        assert_eq!(parse_documentation_content(&item, &config), None);
    }

    #[test]
    fn empty_document_is_absent_not_error() {
        let sanitizer = Sanitizer::new(SanitizerConfig::default()).unwrap();
        let item = DocumentationItem::new("master/a.md", "A", "", "a");
        assert!(matches!(sanitizer.try_parse_documentation_content(&item), Ok(None)));
    }

    #[test]
    fn batch_keeps_order_and_marks_empty_items() {
        let sanitizer = Sanitizer::new(SanitizerConfig::default()).unwrap();
        let items = vec![
            DocumentationItem::new("master/a.md", "A", "alpha", ""),
            DocumentationItem::new("master/b.md", "B", "", ""),
        ];
        let previews = sanitizer.render_previews(&items);
        assert_eq!(previews.len(), 2);
        assert_eq!(previews[0].title, "A");
        assert!(previews[0].html.as_deref().unwrap().contains("alpha"));
        assert_eq!(previews[1].html, None);
    }
}
