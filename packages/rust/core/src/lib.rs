//! Documentation preview rendering for docpreview.
//!
//! This crate turns documentation search results into sanitized, highlighted
//! HTML snippets: markdown is rendered, parsed into an owned [`dom::Document`],
//! rewritten by a fixed sequence of passes, and serialized back.

pub mod dom;
pub mod highlight;
pub mod links;
pub mod pipeline;
pub mod rewrite;

pub use pipeline::{Sanitizer, parse_documentation_content};
