//! Command-line interface definitions for md3pdf

use clap::Parser;
use std::path::PathBuf;

/// CLI structure for the md3pdf application
#[derive(Parser, Debug)]
#[command(name = "md3pdf")]
#[command(version)]
#[command(about = "Convert Markdown to PDF via LaTeX", long_about = None)]
pub struct Cli {
    /// Markdown file to convert
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Directory the PDF is written to
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Configuration file (defaults to ./md3pdf.toml when present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// TeX engine command, overriding the configuration
    #[arg(long, value_name = "CMD")]
    pub engine: Option<String>,

    /// Raster converter command, overriding the configuration
    #[arg(long, value_name = "CMD")]
    pub converter: Option<String>,

    /// Figure download timeout in seconds, overriding the configuration
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Print the generated LaTeX to stdout
    #[arg(long)]
    pub print_latex: bool,

    /// Write <base>.tex to the output directory and skip the PDF build
    #[arg(long)]
    pub latex_only: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
