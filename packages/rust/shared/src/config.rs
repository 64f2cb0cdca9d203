//! Application configuration for docpreview.
//!
//! User config lives at `~/.docpreview/docpreview.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{DocPreviewError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "docpreview.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".docpreview";

// ---------------------------------------------------------------------------
// Config structs (matching docpreview.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Help-center settings.
    #[serde(default)]
    pub help: HelpConfig,

    /// Search highlight settings.
    #[serde(default)]
    pub highlight: HighlightConfig,
}

/// `[help]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelpConfig {
    /// Base URL of the help center. Same-origin links and the
    /// call-to-action link are rewritten against it.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Hostname of the page the previews are displayed on.
    #[serde(default = "default_page_host")]
    pub page_host: String,

    /// Path segment in an item's `path` that is swapped for `base_url`.
    #[serde(default = "default_cta_path_segment")]
    pub cta_path_segment: String,

    /// Text of the call-to-action link.
    #[serde(default = "default_cta_label")]
    pub cta_label: String,
}

impl Default for HelpConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            page_host: default_page_host(),
            cta_path_segment: default_cta_path_segment(),
            cta_label: default_cta_label(),
        }
    }
}

fn default_base_url() -> String {
    "https://docs.appsmith.com".into()
}
fn default_page_host() -> String {
    "app.appsmith.com".into()
}
fn default_cta_path_segment() -> String {
    "master".into()
}
fn default_cta_label() -> String {
    "Open Documentation".into()
}

/// `[highlight]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighlightConfig {
    /// Tag name the search service wraps matched substrings in.
    #[serde(default = "default_highlight_tag")]
    pub tag: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            tag: default_highlight_tag(),
        }
    }
}

fn default_highlight_tag() -> String {
    "ais-highlight-0000000000".into()
}

// ---------------------------------------------------------------------------
// Sanitizer config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime sanitizer configuration — merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct SanitizerConfig {
    /// Help-center base URL, without a trailing slash.
    pub help_base_url: String,
    /// Hostname of the page hosting the previews.
    pub page_host: String,
    /// Segment of `item.path` replaced by the base URL in the CTA href.
    pub cta_path_segment: String,
    /// Call-to-action link text.
    pub cta_label: String,
    /// Highlight marker tag name.
    pub highlight_tag: String,
}

impl SanitizerConfig {
    /// Origin of the hosting page, used to resolve relative hrefs.
    pub fn page_origin(&self) -> String {
        format!("https://{}/", self.page_host)
    }
}

impl Default for SanitizerConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for SanitizerConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            help_base_url: config.help.base_url.trim_end_matches('/').to_string(),
            page_host: config.help.page_host.clone(),
            cta_path_segment: config.help.cta_path_segment.clone(),
            cta_label: config.help.cta_label.clone(),
            highlight_tag: config.highlight.tag.to_ascii_lowercase(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.docpreview/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| DocPreviewError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.docpreview/docpreview.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| DocPreviewError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        DocPreviewError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    init_config_in(&dir)
}

/// Write a default config file into `dir`, creating it if needed.
pub fn init_config_in(dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| DocPreviewError::io(dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| DocPreviewError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| DocPreviewError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Check that the resolved configuration is usable by the sanitizer.
pub fn validate_config(config: &SanitizerConfig) -> Result<()> {
    static TAG_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9-]*$").expect("valid regex"));

    let base = Url::parse(&config.help_base_url).map_err(|e| {
        DocPreviewError::config(format!(
            "help base URL '{}' is not a valid URL: {e}",
            config.help_base_url
        ))
    })?;
    if !matches!(base.scheme(), "http" | "https") {
        return Err(DocPreviewError::config(format!(
            "help base URL must be http(s), got scheme '{}'",
            base.scheme()
        )));
    }

    if config.page_host.trim().is_empty() {
        return Err(DocPreviewError::config("page host must not be empty"));
    }
    if config.page_host.contains(['/', '?', '#', '@']) {
        return Err(DocPreviewError::config(format!(
            "page host '{}' must be a bare host name, not a URL",
            config.page_host
        )));
    }
    let origin = Url::parse(&config.page_origin()).map_err(|e| {
        DocPreviewError::config(format!("page host '{}' is not valid: {e}", config.page_host))
    })?;
    if origin.host_str().is_none_or(str::is_empty) {
        return Err(DocPreviewError::config(format!(
            "page host '{}' has no host name",
            config.page_host
        )));
    }

    if !TAG_RE.is_match(&config.highlight_tag) {
        return Err(DocPreviewError::config(format!(
            "highlight tag '{}' is not a valid element name",
            config.highlight_tag
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("base_url"));
        assert!(toml_str.contains("ais-highlight-0000000000"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.help.cta_path_segment, "master");
        assert_eq!(parsed.help.page_host, "app.appsmith.com");
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[help]
base_url = "https://help.example.com/"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.help.cta_label, "Open Documentation");
        assert_eq!(config.highlight.tag, "ais-highlight-0000000000");

        let sanitizer = SanitizerConfig::from(&config);
        assert_eq!(sanitizer.help_base_url, "https://help.example.com");
    }

    #[test]
    fn page_origin_uses_host() {
        let config = SanitizerConfig::default();
        assert_eq!(config.page_origin(), "https://app.appsmith.com/");
    }

    #[test]
    fn init_and_load_from_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = init_config_in(dir.path()).expect("init config");
        let loaded = load_config_from(&path).expect("load config");
        assert_eq!(loaded.help.base_url, "https://docs.appsmith.com");
    }

    #[test]
    fn load_rejects_malformed_toml() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("docpreview.toml");
        std::fs::write(&path, "[help\nbase_url = 1").expect("write");
        let err = load_config_from(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse"));
    }

    #[test]
    fn validation_accepts_defaults() {
        assert!(validate_config(&SanitizerConfig::default()).is_ok());
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut config = SanitizerConfig::default();
        config.help_base_url = "not a url".into();
        assert!(validate_config(&config).is_err());

        let mut config = SanitizerConfig::default();
        config.help_base_url = "ftp://docs.example.com".into();
        assert!(validate_config(&config).unwrap_err().to_string().contains("http(s)"));

        let mut config = SanitizerConfig::default();
        config.page_host = "  ".into();
        assert!(validate_config(&config).is_err());

        let mut config = SanitizerConfig::default();
        config.highlight_tag = "mark>".into();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn page_host_must_be_a_bare_host() {
        let mut config = SanitizerConfig::default();
        config.page_host = "app.example.com/docs".into();
        assert!(validate_config(&config).unwrap_err().to_string().contains("bare host"));

        config.page_host = "https://app.example.com".into();
        assert!(validate_config(&config).is_err());

        config.page_host = "app example.com".into();
        assert!(validate_config(&config).is_err());

        config.page_host = "LocalHost:8080".into();
        assert!(validate_config(&config).is_ok());
    }
}
