//! md3pdf - Markdown to PDF through LaTeX
//!
//! A document goes through three stages:
//! 1. [`syntax::parse`] builds a read-only tree from the Markdown source
//! 2. [`latex::render`] writes LaTeX for the tree and collects remote figures
//! 3. [`build::build`] fetches the figures and runs the TeX engine in a
//!    temporary workspace

#![deny(unsafe_code)]

pub mod build;
pub mod config;
pub mod figures;
pub mod latex;
pub mod syntax;

use build::{BuildError, BuildRequest};
use config::BuildConfig;
use latex::RenderError;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Options of a single conversion that are not build configuration
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Directory the output file is written to
    pub output_dir: PathBuf,

    /// Echo the LaTeX source to stdout before building
    pub print_latex: bool,

    /// Write `<base>.tex` to the output directory instead of building a PDF
    pub latex_only: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            print_latex: false,
            latex_only: false,
        }
    }
}

/// Errors from a whole conversion
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("couldn't read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("couldn't render {} to LaTeX", path.display())]
    Render {
        path: PathBuf,
        #[source]
        source: RenderError,
    },

    #[error("couldn't write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Build(#[from] BuildError),
}

/// Convert a Markdown file
///
/// # Parameters
/// * `input` - Markdown file to convert
/// * `config` - Build configuration
/// * `options` - Output location and mode
///
/// # Returns
/// * `Ok(PathBuf)` - The PDF, or the `.tex` file in LaTeX-only mode
/// * `Err(ConvertError)` - The stage that failed
pub fn convert_file(
    input: &Path,
    config: &BuildConfig,
    options: &ConvertOptions,
) -> Result<PathBuf, ConvertError> {
    let source = fs::read_to_string(input).map_err(|source| ConvertError::Read {
        path: input.to_path_buf(),
        source,
    })?;

    let tree = syntax::parse(&source);
    let rendered = latex::render_to_string(&tree).map_err(|source| ConvertError::Render {
        path: input.to_path_buf(),
        source,
    })?;
    log::info!(
        "Rendered {} ({} remote figures)",
        input.display(),
        rendered.figures.len()
    );

    if options.print_latex {
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(rendered.latex.as_bytes())
            .and_then(|()| stdout.flush())
            .map_err(|source| ConvertError::Write {
                path: PathBuf::from("<stdout>"),
                source,
            })?;
    }

    let base_name = build::base_name(input);

    if options.latex_only {
        let path = options.output_dir.join(format!("{base_name}.tex"));
        fs::create_dir_all(&options.output_dir)
            .and_then(|()| fs::write(&path, &rendered.latex))
            .map_err(|source| ConvertError::Write {
                path: path.clone(),
                source,
            })?;
        return Ok(path);
    }

    let request = BuildRequest {
        latex: rendered.latex,
        figures: rendered.figures,
        base_name,
        source_dir: Some(source_dir(input)),
        output_dir: options.output_dir.clone(),
    };

    Ok(build::build(&request, config)?)
}

/// Directory containing `input`; a bare file name lives in `.`
fn source_dir(input: &Path) -> PathBuf {
    match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
