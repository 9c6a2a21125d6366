//! Paperset - typeset markdown as a print-style paper.
//!
//! # Usage
//!
//! ```bash
//! paperset paper.md > paper.html
//! paperset --watch -o paper.html paper.md
//! paperset --json paper.md
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use paperset::app::{App, OutputFormat};
use paperset::config::{
    ConfigFlags, ThemeMode, clear_config_flags, global_config_path, load_config_flags,
    local_override_path, parse_flag_tokens, save_config_flags,
};
use paperset::document::ParseOptions;
use paperset::perf;

/// Typeset a markdown document as a print-style paper
#[derive(Parser, Debug)]
#[command(name = "paperset", version, about, long_about = None)]
struct Cli {
    /// Markdown file to typeset
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Watch the file and re-render on change
    #[arg(short, long)]
    watch: bool,

    /// Print the config, side-tables and body as JSON instead of HTML
    #[arg(long)]
    json: bool,

    /// Write output to a file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Levels added to markdown headings (`#` becomes `<h2>` with 1)
    #[arg(long, value_name = "N")]
    heading_offset: Option<u8>,

    /// Do not syntax highlight code blocks
    #[arg(long)]
    no_highlight: bool,

    /// Background the code highlighting theme is chosen for
    #[arg(long, value_enum)]
    theme: Option<ThemeMode>,

    /// Log timing of the render stages
    #[arg(long)]
    perf: bool,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

fn init_logging(perf_enabled: bool) -> Result<()> {
    let mut filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::WARN.into());
    if perf_enabled {
        filter = filter.add_directive(
            "paperset::perf=debug"
                .parse()
                .context("Invalid perf log directive")?,
        );
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    init_logging(effective.perf)?;
    perf::set_enabled(effective.perf);

    let colorfgbg = std::env::var("COLORFGBG").ok();
    let background = effective
        .theme
        .unwrap_or(ThemeMode::Auto)
        .background(colorfgbg.as_deref());

    if !cli.file.exists() {
        anyhow::bail!("File not found: {}", cli.file.display());
    }

    let parse_options = ParseOptions {
        heading_offset: effective
            .heading_offset
            .unwrap_or(ParseOptions::default().heading_offset),
        ..ParseOptions::default()
    };
    let format = if effective.json {
        OutputFormat::Json
    } else {
        OutputFormat::Html
    };

    App::new(cli.file)
        .with_watch(effective.watch)
        .with_format(format)
        .with_output(effective.output)
        .with_parse_options(parse_options)
        .with_highlighting(!effective.no_highlight)
        .with_background(background)
        .run()
        .context("Application error")
}
