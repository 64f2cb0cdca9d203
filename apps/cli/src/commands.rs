//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use docpreview_core::Sanitizer;
use docpreview_shared::{
    AppConfig, DocumentationItem, SanitizerConfig, init_config, load_config, load_config_from,
};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// docpreview — render documentation search results as preview HTML.
#[derive(Parser)]
#[command(
    name = "docpreview",
    version,
    about = "Render documentation search results into sanitized, highlighted HTML previews.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.docpreview/docpreview.toml.
    #[arg(long, global = true, env = "DOCPREVIEW_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the help-center base URL.
    #[arg(long, global = true)]
    pub help_base_url: Option<String>,

    /// Override the hostname of the page showing the previews.
    #[arg(long, global = true)]
    pub page_host: Option<String>,

    /// Override the search highlight tag name.
    #[arg(long, global = true)]
    pub highlight_tag: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Render one markdown file as a preview.
    Render {
        /// Markdown file with the raw documentation source.
        file: PathBuf,

        /// Page title as shown in search results.
        #[arg(short, long)]
        title: String,

        /// Documentation path used for the call-to-action link.
        #[arg(short, long, default_value = "master/index.md")]
        path: String,

        /// Search query that produced the result.
        #[arg(short, long, default_value = "")]
        query: String,
    },

    /// Render a JSON array of search results into a JSON array of previews.
    Batch {
        /// JSON file holding `[{ path, rawTitle, rawDocument, query }, ...]`.
        file: PathBuf,

        /// Pretty-print the output JSON.
        #[arg(long)]
        pretty: bool,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Default filter for the `-v` count. `docpreview` matches the target prefix
/// shared by every workspace crate.
fn log_filter(cli: &Cli) -> &'static str {
    match cli.verbose {
        0 => "docpreview=warn",
        1 => "docpreview=info",
        2 => "docpreview=debug",
        _ => "docpreview=trace",
    }
}

/// Initialize tracing based on CLI flags. Logs go to stderr; stdout carries output.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_filter(cli)));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Command::Render {
            file,
            title,
            path,
            query,
        } => cmd_render(&cli, file, title, path, query),
        Command::Batch { file, pretty } => cmd_batch(&cli, file, *pretty),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(&cli),
        },
    }
}

// ---------------------------------------------------------------------------
// Config resolution
// ---------------------------------------------------------------------------

fn load_app_config(cli: &Cli) -> Result<AppConfig> {
    let config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    Ok(config)
}

/// Merge config file values with CLI overrides.
fn resolve_sanitizer_config(cli: &Cli) -> Result<SanitizerConfig> {
    let mut app = load_app_config(cli)?;

    if let Some(url) = &cli.help_base_url {
        app.help.base_url = url.clone();
    }
    if let Some(host) = &cli.page_host {
        app.help.page_host = host.clone();
    }
    if let Some(tag) = &cli.highlight_tag {
        app.highlight.tag = tag.clone();
    }

    Ok(SanitizerConfig::from(&app))
}

fn build_sanitizer(cli: &Cli) -> Result<Sanitizer> {
    let config = resolve_sanitizer_config(cli)?;
    Ok(Sanitizer::new(config)?)
}

fn read_input(file: &Path) -> Result<String> {
    std::fs::read_to_string(file).wrap_err_with(|| format!("failed to read {}", file.display()))
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_render(cli: &Cli, file: &Path, title: &str, path: &str, query: &str) -> Result<()> {
    let sanitizer = build_sanitizer(cli)?;
    let raw_document = read_input(file)?;
    let item = DocumentationItem::new(path, title, raw_document, query);
    item.validate()?;

    info!(file = %file.display(), "rendering preview");
    let html = sanitizer
        .try_parse_documentation_content(&item)?
        .ok_or_else(|| eyre!("{} has no content to render", file.display()))?;

    println!("{html}");
    Ok(())
}

fn cmd_batch(cli: &Cli, file: &Path, pretty: bool) -> Result<()> {
    let sanitizer = build_sanitizer(cli)?;
    let json = read_input(file)?;
    let items: Vec<DocumentationItem> = serde_json::from_str(&json)
        .wrap_err_with(|| format!("{} is not a JSON array of search results", file.display()))?;
    for (index, item) in items.iter().enumerate() {
        item.validate()
            .wrap_err_with(|| format!("search result {index} in {}", file.display()))?;
    }

    info!(count = items.len(), "rendering previews");
    let previews = sanitizer.render_previews(&items);

    let output = if pretty {
        serde_json::to_string_pretty(&previews)?
    } else {
        serde_json::to_string(&previews)?
    };
    println!("{output}");
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(cli: &Cli) -> Result<()> {
    let config = load_app_config(cli)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).expect("valid args")
    }

    #[test]
    fn render_args_parse() {
        let cli = parse(&["docpreview", "render", "doc.md", "--title", "Table", "-q", "tab"]);
        match cli.command {
            Command::Render {
                title, query, path, ..
            } => {
                assert_eq!(title, "Table");
                assert_eq!(query, "tab");
                assert_eq!(path, "master/index.md");
            }
            _ => panic!("expected render"),
        }
    }

    #[test]
    fn overrides_apply_over_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("docpreview.toml");
        std::fs::write(
            &config_path,
            "[help]\nbase_url = \"https://file.example.com\"\npage_host = \"app.file.example\"\n",
        )
        .unwrap();

        let cli = parse(&[
            "docpreview",
            "--config",
            config_path.to_str().unwrap(),
            "--help-base-url",
            "https://flag.example.com/",
            "batch",
            "items.json",
        ]);
        let config = resolve_sanitizer_config(&cli).unwrap();
        assert_eq!(config.help_base_url, "https://flag.example.com");
        assert_eq!(config.page_host, "app.file.example");
    }

    #[test]
    fn verbosity_filters_scope_the_workspace_crates() {
        for (flags, expected) in [
            (&["docpreview", "config", "show"][..], "docpreview=warn"),
            (&["docpreview", "-vv", "config", "show"][..], "docpreview=debug"),
            (&["docpreview", "-vvvv", "config", "show"][..], "docpreview=trace"),
        ] {
            assert_eq!(log_filter(&parse(flags)), expected);
        }
    }

    #[test]
    fn batch_rejects_result_without_title() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("docpreview.toml");
        std::fs::write(&config_path, "").unwrap();
        let items = dir.path().join("items.json");
        std::fs::write(
            &items,
            r##"[{"path": "master/a.md", "rawTitle": "", "rawDocument": "# A"}]"##,
        )
        .unwrap();

        let cli = parse(&[
            "docpreview",
            "--config",
            config_path.to_str().unwrap(),
            "batch",
            items.to_str().unwrap(),
        ]);
        let err = run(cli).unwrap_err();
        assert!(
            err.chain().any(|cause| cause.to_string().contains("empty rawTitle")),
            "{err:?}"
        );
    }

    #[test]
    fn render_writes_nothing_for_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("docpreview.toml");
        std::fs::write(&config_path, "").unwrap();
        let doc = dir.path().join("empty.md");
        std::fs::write(&doc, "").unwrap();

        let cli = parse(&[
            "docpreview",
            "--config",
            config_path.to_str().unwrap(),
            "render",
            doc.to_str().unwrap(),
            "--title",
            "Empty",
        ]);
        let err = run(cli).unwrap_err();
        assert!(err.to_string().contains("no content"));
    }
}
