//! docpreview CLI — render documentation search results as HTML previews.
//!
//! Reads raw documentation markdown (one file, or a JSON batch of search
//! results) and prints the sanitized, highlighted preview HTML.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
