//! Core domain types for documentation previews.

use serde::{Deserialize, Serialize};

use crate::error::{DocPreviewError, Result};

// ---------------------------------------------------------------------------
// DocumentationItem
// ---------------------------------------------------------------------------

/// A single documentation search result, as delivered by the search layer.
///
/// Field names follow the search service's camelCase JSON so result payloads
/// can be deserialized directly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentationItem {
    /// Source location of the page (e.g., `master/core-concepts/widgets.md`).
    pub path: String,
    /// Page title as indexed by the search service.
    pub raw_title: String,
    /// Raw markdown/templated page body.
    #[serde(default)]
    pub raw_document: String,
    /// Search query that produced this result.
    #[serde(default)]
    pub query: String,
}

impl DocumentationItem {
    /// Build an item from its four parts.
    pub fn new(
        path: impl Into<String>,
        raw_title: impl Into<String>,
        raw_document: impl Into<String>,
        query: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            raw_title: raw_title.into(),
            raw_document: raw_document.into(),
            query: query.into(),
        }
    }

    /// Whether there is anything to render at all.
    pub fn has_document(&self) -> bool {
        !self.raw_document.is_empty()
    }

    /// Check the fields a caller must always supply.
    pub fn validate(&self) -> Result<()> {
        if self.raw_title.trim().is_empty() {
            return Err(DocPreviewError::validation(format!(
                "item '{}' has an empty rawTitle",
                self.path
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Preview
// ---------------------------------------------------------------------------

/// Rendered preview for one search result.
///
/// `html` is `None` when the document was empty or could not be rendered;
/// the display layer omits the preview for that result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preview {
    /// Path of the originating item.
    pub path: String,
    /// Title of the originating item.
    pub title: String,
    /// Sanitized HTML, if any.
    pub html: Option<String>,
}
