//! Shared types, error model, and configuration for docpreview.
//!
//! This crate is the foundation depended on by all other docpreview crates.
//! It provides:
//! - [`DocPreviewError`] — the unified error type
//! - Domain types ([`DocumentationItem`], [`Preview`])
//! - Configuration ([`AppConfig`], [`SanitizerConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, HelpConfig, HighlightConfig, SanitizerConfig, config_dir, config_file_path,
    init_config, init_config_in, load_config, load_config_from, validate_config,
};
pub use error::{DocPreviewError, Result};
pub use types::{DocumentationItem, Preview};
