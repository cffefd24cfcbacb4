//! md3pdf - Markdown to PDF through LaTeX
//!
//! A CLI tool that renders a Markdown file to LaTeX and compiles it with
//! an external TeX engine.

#![deny(unsafe_code)]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::all))]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::pedantic))]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(missing_docs))]
// Allow some pedantic lints that are too strict for this project
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use md3pdf::config::BuildConfig;
use md3pdf::ConvertOptions;

/// Main entry point for the md3pdf CLI application
fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    }
}

/// Run the CLI application
fn run() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let config = load_config(&cli)?;
    let options = ConvertOptions {
        output_dir: cli.output_dir.clone(),
        print_latex: cli.print_latex,
        latex_only: cli.latex_only,
    };

    let output = md3pdf::convert_file(&cli.input, &config, &options)
        .with_context(|| format!("Failed to convert {}", cli.input.display()))?;

    if cli.verbose {
        eprintln!("✓ Successfully wrote: {}", output.display());
    }

    Ok(())
}

/// Load the configuration and apply command-line overrides
fn load_config(cli: &Cli) -> Result<BuildConfig> {
    let mut config = BuildConfig::discover(cli.config.as_deref())
        .context("Failed to load configuration")?;

    if let Some(engine) = &cli.engine {
        config.engine.clone_from(engine);
    }
    if let Some(converter) = &cli.converter {
        config.converter.clone_from(converter);
    }
    if let Some(timeout) = cli.timeout {
        config.fetch_timeout_secs = timeout;
    }

    Ok(config)
}
