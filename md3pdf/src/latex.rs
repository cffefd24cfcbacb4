//! Markdown syntax tree to LaTeX rendering
//!
//! The renderer walks a [`crate::syntax::Node`] tree and writes LaTeX that
//! targets the bundled `md3pdf` document class. Remote images met along the
//! way are collected so the build can fetch them into its workspace.

// Submodules
mod block;
mod error;
mod escape;
mod inline;
mod renderer;
mod writer;

// Re-export public types
pub use error::RenderError;
pub use escape::escape;
pub use renderer::{render, render_to_string, RenderState, Rendered};
pub use writer::LatexWriter;

/// Name of the document class every rendered document loads
pub const CLASS_NAME: &str = "md3pdf";
