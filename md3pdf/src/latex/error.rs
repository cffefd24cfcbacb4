//! Error types for LaTeX rendering

use thiserror::Error;

/// Errors that can occur while rendering a syntax tree to LaTeX
#[derive(Error, Debug)]
pub enum RenderError {
    /// The tree contains a node kind (or kind/level pair) with no LaTeX form
    #[error("unsupported node kind: {kind}")]
    UnsupportedNodeKind {
        /// Description of the offending kind, e.g. "heading level 7"
        kind: String,
    },

    /// A remote image URL has no usable file name to reference from LaTeX
    #[error("figure {destination} has no usable file name in its path")]
    FigureName {
        /// The image destination as written
        destination: String,
    },

    /// A table row has more cells than the table declares columns
    #[error("table row has {found} cells but the table declares {declared} columns")]
    ColumnCount {
        /// Number of column alignments declared by the table
        declared: usize,
        /// Number of cells in the offending row
        found: usize,
    },

    /// The output sink failed
    #[error("failed to write LaTeX output")]
    Write(#[from] std::io::Error),

    /// A failure inside a specific element of the tree
    #[error("couldn't render {element}")]
    Context {
        /// The node kind or table element being rendered
        element: String,
        #[source]
        source: Box<RenderError>,
    },
}

impl RenderError {
    pub(crate) fn unsupported(kind: impl Into<String>) -> Self {
        RenderError::UnsupportedNodeKind { kind: kind.into() }
    }

    /// The innermost error of a context chain
    pub fn root_cause(&self) -> &RenderError {
        match self {
            RenderError::Context { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Attach element context to a render result
pub(crate) trait RenderContextExt<T> {
    fn context(self, element: impl Into<String>) -> Result<T, RenderError>;
}

impl<T, E: Into<RenderError>> RenderContextExt<T> for Result<T, E> {
    fn context(self, element: impl Into<String>) -> Result<T, RenderError> {
        self.map_err(|e| RenderError::Context {
            element: element.into(),
            source: Box::new(e.into()),
        })
    }
}
