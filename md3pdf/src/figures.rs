//! Figure acquisition
//!
//! Images referenced by a document are either local files or remote URLs.
//! The renderer uses [`classify`] to decide how to reference an image, and
//! the build calls [`resolve`] to place every remote figure in its
//! workspace and produce a PNG rendition next to it.

use log::{debug, info};
use percent_encoding::percent_decode_str;
use reqwest::Url;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;
use thiserror::Error;

/// Default timeout for a single figure download, in seconds
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

/// Redirects followed before a download is abandoned
const MAX_REDIRECTS: usize = 10;

/// Default raster converter (ImageMagick 7)
pub const DEFAULT_CONVERTER: &str = "magick";

/// Where an image reference points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FigureLocation {
    /// A path on the local filesystem
    Local,
    /// An absolute URL with a host
    Remote(Url),
}

/// Classify an image destination
///
/// A destination is remote when it parses as an absolute URL that has a
/// host. Relative paths, `file:` URLs and anything else unparsable are local.
pub fn classify(destination: &str) -> FigureLocation {
    match Url::parse(destination) {
        Ok(url) if url.has_host() => FigureLocation::Remote(url),
        _ => FigureLocation::Local,
    }
}

/// The percent-decoded last path segment of a URL
///
/// `None` when the segment is empty, is not UTF-8 once decoded, or decodes
/// to something that can't be a single file name referenced from LaTeX
/// (a path separator or a `%`, which would start a TeX comment).
pub fn remote_file_name(url: &Url) -> Option<String> {
    let segment = url.path_segments()?.next_back()?;
    let name = percent_decode_str(segment).decode_utf8().ok()?;

    if name.is_empty() || name.contains(['/', '\\', '%']) {
        return None;
    }
    Some(name.into_owned())
}

/// Name a figure gets inside the build workspace
pub fn figure_file_name(figure: &str) -> Option<String> {
    match classify(figure) {
        FigureLocation::Remote(url) => remote_file_name(&url),
        FigureLocation::Local => Path::new(figure)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned()),
    }
}

/// Whether a file name has an `.svg` extension, in any case
pub fn is_svg(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"))
}

/// Figure acquisition errors
#[derive(Error, Debug)]
pub enum FigureError {
    #[error("failed to fetch figure {figure}: {reason}")]
    Fetch { figure: String, reason: String },

    #[error("failed to copy figure {figure}")]
    Copy {
        figure: String,
        #[source]
        source: std::io::Error,
    },

    #[error("figure {figure} has no file name")]
    NoFileName { figure: String },

    #[error("failed to convert figure {figure}: {reason}")]
    Conversion { figure: String, reason: String },
}

/// How figures are fetched and converted
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Timeout applied to each download
    pub timeout: Duration,

    /// Raster converter command
    pub converter: String,

    /// Arguments placed before the input and output file names
    pub converter_args: Vec<String>,

    /// Directory relative local figure paths are resolved against
    pub base_dir: Option<PathBuf>,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            converter: DEFAULT_CONVERTER.to_string(),
            converter_args: Vec::new(),
            base_dir: None,
        }
    }
}

/// Place every figure in `workspace`, then convert each one to PNG
///
/// # Parameters
/// * `workspace` - Build directory the figures are written into
/// * `figures` - Figure references in document order
/// * `opts` - Download and conversion settings
///
/// # Returns
/// * `Ok(())` - Every figure was placed and converted
/// * `Err(FigureError)` - The first figure that could not be placed or converted
pub fn resolve(
    workspace: &Path,
    figures: &[String],
    opts: &ResolveOptions,
) -> Result<(), FigureError> {
    let mut placed = Vec::with_capacity(figures.len());

    for figure in figures {
        let name = place(workspace, figure, opts)?;
        info!("Placed figure {} as {}", figure, name);
        placed.push((figure, name));
    }

    for (figure, name) in placed {
        convert(workspace, figure, &name, opts)?;
    }

    Ok(())
}

/// Copy or download one figure into the workspace, returning its file name
fn place(workspace: &Path, figure: &str, opts: &ResolveOptions) -> Result<String, FigureError> {
    let name = figure_file_name(figure).ok_or_else(|| FigureError::NoFileName {
        figure: figure.to_string(),
    })?;
    let target = workspace.join(&name);

    match classify(figure) {
        FigureLocation::Remote(url) => fetch(url, figure, &target, opts.timeout)?,
        FigureLocation::Local => {
            let source = match &opts.base_dir {
                Some(base) => base.join(figure),
                None => PathBuf::from(figure),
            };
            fs::copy(&source, &target).map_err(|source| FigureError::Copy {
                figure: figure.to_string(),
                source,
            })?;
        }
    }

    Ok(name)
}

/// One GET, no retries; any non-2xx status is a failure
fn fetch(url: Url, figure: &str, target: &Path, timeout: Duration) -> Result<(), FigureError> {
    let fetch_error = |reason: String| FigureError::Fetch {
        figure: figure.to_string(),
        reason,
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .build()
        .map_err(|e| fetch_error(e.to_string()))?;

    let response = client.get(url).send().map_err(|e| {
        if e.is_timeout() {
            fetch_error(format!("timed out after {}s", timeout.as_secs()))
        } else {
            fetch_error(e.to_string())
        }
    })?;

    if !response.status().is_success() {
        return Err(fetch_error(format!("HTTP {}", response.status())));
    }

    let bytes = response.bytes().map_err(|e| fetch_error(e.to_string()))?;
    fs::write(target, &bytes).map_err(|source| FigureError::Copy {
        figure: figure.to_string(),
        source,
    })?;

    debug!("Fetched {} bytes into {}", bytes.len(), target.display());
    Ok(())
}

/// Run `<converter> <args…> <name> <name>.png` inside the workspace
fn convert(
    workspace: &Path,
    figure: &str,
    name: &str,
    opts: &ResolveOptions,
) -> Result<(), FigureError> {
    let conversion_error = |reason: String| FigureError::Conversion {
        figure: figure.to_string(),
        reason,
    };

    let output = Command::new(&opts.converter)
        .args(&opts.converter_args)
        .arg(name)
        .arg(format!("{name}.png"))
        .current_dir(workspace)
        .output()
        .map_err(|e| conversion_error(format!("couldn't run {}: {}", opts.converter, e)))?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.trim().is_empty() {
        debug!("{}: {}", opts.converter, stdout.trim_end());
    }

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(conversion_error(format!(
            "{} exited with {}: {}",
            opts.converter,
            output.status,
            stderr.trim()
        )));
    }

    info!("Converted {} to {}.png", name, name);
    Ok(())
}
