//! PDF assembly
//!
//! A build runs in a fresh temporary workspace: the LaTeX source, the class
//! file and every figure are written there, the TeX engine is run inside it,
//! and the resulting PDF is copied to the output directory. The workspace is
//! removed however the build ends.

use crate::config::BuildConfig;
use crate::figures::{self, FigureError, ResolveOptions};
use crate::latex::CLASS_NAME;
use log::{debug, info, warn};
use std::borrow::Cow;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use std::time::Duration;
use tempfile::TempDir;
use thiserror::Error;

/// The bundled document class
const CLASS_SOURCE: &str = include_str!("../assets/md3pdf.cls");

/// Prefix of every workspace directory
const WORKSPACE_PREFIX: &str = "md3pdf-";

/// Base name used when the input file name has nothing before its first dot
const FALLBACK_BASE_NAME: &str = "document";

/// Build errors
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("couldn't create build workspace")]
    Workspace(#[source] std::io::Error),

    #[error("couldn't write {}", path.display())]
    WriteSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("class file {} is missing or unreadable", path.display())]
    AssetMissing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Figure(#[from] FigureError),

    #[error("couldn't run {engine}")]
    Spawn {
        engine: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{engine} exited with {status}{}", diagnostics_suffix(.diagnostics))]
    Compile {
        engine: String,
        status: ExitStatus,
        /// Error lines (those starting with `!`) from the engine output
        diagnostics: Vec<String>,
    },

    #[error("engine reported success but {} was not produced", path.display())]
    MissingOutput { path: PathBuf },

    #[error("couldn't copy the PDF to {}", path.display())]
    CopyOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn diagnostics_suffix(diagnostics: &[String]) -> String {
    if diagnostics.is_empty() {
        String::new()
    } else {
        format!(":\n{}", diagnostics.join("\n"))
    }
}

/// Everything a build needs besides configuration
#[derive(Debug, Clone)]
pub struct BuildRequest {
    /// Complete LaTeX source
    pub latex: String,

    /// Figure references to place in the workspace, in document order
    pub figures: Vec<String>,

    /// Name of the `.tex` and `.pdf` files, without extension
    pub base_name: String,

    /// Directory of the Markdown source; local images are found relative to it
    pub source_dir: Option<PathBuf>,

    /// Directory the PDF is copied to
    pub output_dir: PathBuf,
}

/// The part of an input file name before its first `.`
///
/// `docs/notes.v2.md` gives `notes`.
pub fn base_name(input: &Path) -> String {
    input
        .file_name()
        .map(|name| name.to_string_lossy())
        .and_then(|name| name.split('.').next().map(str::to_string))
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| FALLBACK_BASE_NAME.to_string())
}

/// Build a PDF from LaTeX source
///
/// # Parameters
/// * `request` - Source, figures and output location
/// * `config` - Engine, converter and workspace settings
///
/// # Returns
/// * `Ok(PathBuf)` - Path of the PDF in the output directory
/// * `Err(BuildError)` - First step that failed; nothing is copied out
pub fn build(request: &BuildRequest, config: &BuildConfig) -> Result<PathBuf, BuildError> {
    let workspace = create_workspace(config)?;
    let dir = workspace.path();
    info!("Building {} in {}", request.base_name, dir.display());

    let tex_name = format!("{}.tex", request.base_name);
    write_file(&dir.join(&tex_name), request.latex.as_bytes())?;
    write_class(dir, config)?;

    let resolve_options = ResolveOptions {
        timeout: Duration::from_secs(config.fetch_timeout_secs),
        converter: config.converter.clone(),
        converter_args: config.converter_args.clone(),
        base_dir: request.source_dir.clone(),
    };
    figures::resolve(dir, &request.figures, &resolve_options)?;

    compile(dir, &tex_name, request.source_dir.as_deref(), config)?;
    let output = copy_output(dir, request)?;

    workspace.close().map_err(BuildError::Workspace)?;
    Ok(output)
}

fn create_workspace(config: &BuildConfig) -> Result<TempDir, BuildError> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(WORKSPACE_PREFIX);

    match &config.workspace_root {
        Some(root) => builder.tempdir_in(root),
        None => builder.tempdir(),
    }
    .map_err(BuildError::Workspace)
}

fn write_file(path: &Path, contents: &[u8]) -> Result<(), BuildError> {
    fs::write(path, contents).map_err(|source| BuildError::WriteSource {
        path: path.to_path_buf(),
        source,
    })
}

/// Write the configured class file, or the bundled one
fn write_class(dir: &Path, config: &BuildConfig) -> Result<(), BuildError> {
    let contents: Cow<'_, [u8]> = match &config.class_file {
        Some(path) => Cow::Owned(fs::read(path).map_err(|source| BuildError::AssetMissing {
            path: path.clone(),
            source,
        })?),
        None => Cow::Borrowed(CLASS_SOURCE.as_bytes()),
    };

    write_file(&dir.join(format!("{CLASS_NAME}.cls")), &contents)
}

/// Value for TEXINPUTS: the source directory, then the engine's defaults
fn tex_inputs(source_dir: &Path) -> Option<OsString> {
    let absolute = match std::path::absolute(source_dir) {
        Ok(path) => path,
        Err(e) => {
            warn!("Couldn't resolve {}: {}", source_dir.display(), e);
            return None;
        }
    };

    // The trailing empty entry keeps the engine's default search path
    match std::env::join_paths([absolute.as_path(), Path::new("")]) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Can't add {} to TEXINPUTS: {}", absolute.display(), e);
            None
        }
    }
}

/// Run the TeX engine on `tex_name` inside `dir`
fn compile(
    dir: &Path,
    tex_name: &str,
    source_dir: Option<&Path>,
    config: &BuildConfig,
) -> Result<(), BuildError> {
    let mut command = Command::new(&config.engine);
    command.args(&config.engine_args).arg(tex_name).current_dir(dir);
    if let Some(value) = source_dir.and_then(tex_inputs) {
        command.env("TEXINPUTS", value);
    }

    info!("Running {} on {}", config.engine, tex_name);
    let output = command.output().map_err(|source| BuildError::Spawn {
        engine: config.engine.clone(),
        source,
    })?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    debug!("{} output:\n{}", config.engine, stdout);

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let diagnostics = stdout
            .lines()
            .chain(stderr.lines())
            .filter(|line| line.starts_with('!'))
            .map(str::to_string)
            .collect();

        return Err(BuildError::Compile {
            engine: config.engine.clone(),
            status: output.status,
            diagnostics,
        });
    }

    Ok(())
}

/// Copy `<base>.pdf` from the workspace into the output directory
fn copy_output(dir: &Path, request: &BuildRequest) -> Result<PathBuf, BuildError> {
    let pdf_name = format!("{}.pdf", request.base_name);
    let built = dir.join(&pdf_name);
    if !built.is_file() {
        return Err(BuildError::MissingOutput { path: built });
    }

    let output = request.output_dir.join(&pdf_name);
    fs::create_dir_all(&request.output_dir)
        .and_then(|()| fs::copy(&built, &output))
        .map_err(|source| BuildError::CopyOutput {
            path: output.clone(),
            source,
        })?;

    info!("Wrote {}", output.display());
    Ok(output)
}
